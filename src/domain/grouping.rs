//! Grouping of instances by definition name.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{Definition, Instance};

/// A grouped instance. Holds the id and the shared definition, never the
/// instance's children.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub id: String,
    pub definition: Arc<Definition>,
}

impl Member {
    pub fn new(id: impl Into<String>, definition: Arc<Definition>) -> Self {
        Self {
            id: id.into(),
            definition,
        }
    }

    /// Member view of `instance`; `None` without a named definition.
    pub fn of(instance: &Instance) -> Option<Self> {
        let definition = instance.definition.as_ref()?;
        definition.group_key()?;
        Some(Self::new(instance.id.clone(), Arc::clone(definition)))
    }

    pub fn name(&self) -> Option<&str> {
        self.definition.group_key()
    }
}

/// Instances sharing one definition name.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    pub members: Vec<Member>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Definition name → instances, iterated in insertion (discovery) order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupMapping {
    groups: Vec<Group>,
    index: HashMap<String, usize>,
}

impl GroupMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `member` to the group `name`, creating the group on first use.
    pub fn push(&mut self, name: &str, member: Member) {
        match self.index.get(name) {
            Some(&pos) => self.groups[pos].members.push(member),
            None => {
                self.index.insert(name.to_string(), self.groups.len());
                self.groups.push(Group {
                    name: name.to_string(),
                    members: vec![member],
                });
            }
        }
    }

    /// Insert a whole group, replacing any group with the same name in place.
    pub fn insert(&mut self, group: Group) {
        match self.index.get(&group.name) {
            Some(&pos) => self.groups[pos] = group,
            None => {
                self.index.insert(group.name.clone(), self.groups.len());
                self.groups.push(group);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Group> {
        self.index.get(name).map(|&pos| &self.groups[pos])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Group> {
        self.groups.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.name.as_str())
    }

    /// Ids of all members, in group order then member order.
    pub fn object_ids(&self) -> Vec<String> {
        self.groups
            .iter()
            .flat_map(|g| g.members.iter().map(|m| m.id.clone()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a GroupMapping {
    type Item = &'a Group;
    type IntoIter = std::slice::Iter<'a, Group>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Group> for GroupMapping {
    fn from_iter<T: IntoIterator<Item = Group>>(iter: T) -> Self {
        let mut mapping = GroupMapping::new();
        for group in iter {
            mapping.insert(group);
        }
        mapping
    }
}

/// Group instances by definition name.
///
/// Instances without a definition, or whose definition has no name, are
/// skipped: they take part in neither class.
pub fn group_by_definition<'a, I>(instances: I) -> GroupMapping
where
    I: IntoIterator<Item = &'a Instance>,
{
    let mut mapping = GroupMapping::new();
    for instance in instances {
        if let (Some(name), Some(member)) = (instance.definition_name(), Member::of(instance)) {
            mapping.push(name, member);
        }
    }
    mapping
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::entities::{Node, SceneRoot};
    use crate::domain::traversal::find_instances;

    #[test]
    fn given_instances_when_grouping_then_keys_in_discovery_order() {
        let fin = Arc::new(Definition::named("Fin"));
        let door = Arc::new(Definition::named("Door"));
        let instances = [
            Instance::new("1", Some(Arc::clone(&door))),
            Instance::new("2", Some(Arc::clone(&fin))),
            Instance::new("3", Some(Arc::clone(&door))),
        ];

        let mapping = group_by_definition(&instances);

        assert_eq!(mapping.names().collect::<Vec<_>>(), vec!["Door", "Fin"]);
        assert_eq!(mapping.get("Door").map(Group::len), Some(2));
        assert_eq!(mapping.object_ids(), vec!["1", "3", "2"]);
    }

    #[test]
    fn given_missing_or_unnamed_definition_when_grouping_then_excluded() {
        let instances = [
            Instance::new("1", None),
            Instance::new("2", Some(Arc::new(Definition::default()))),
            Instance::new("3", Some(Arc::new(Definition::named("Fin")))),
        ];

        let mapping = group_by_definition(&instances);

        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.object_ids(), vec!["3"]);
    }

    #[test]
    fn given_grouped_instances_when_grouping_then_definition_shared_not_copied() {
        let fin = Arc::new(Definition::named("Fin"));
        let instances = [
            Instance::new("1", Some(Arc::clone(&fin))),
            Instance::new("2", Some(Arc::clone(&fin))),
        ];

        let mapping = group_by_definition(&instances);

        let group = mapping.get("Fin").expect("group");
        assert!(Arc::ptr_eq(&group.members[0].definition, &fin));
    }

    #[test]
    fn given_nested_instances_when_grouping_then_children_not_retained() {
        // chain of 50 instances of one definition, each nested in the previous
        let fin = Arc::new(Definition::named("Fin"));
        let mut node = Instance::new("49", Some(Arc::clone(&fin)));
        for i in (0..49).rev() {
            node = Instance::new(i.to_string(), Some(Arc::clone(&fin)))
                .with_elements(vec![node.into()]);
        }
        let root = SceneRoot::Node(Node::container("root", vec![node.into()]));

        let found = find_instances(&root);
        let mapping = group_by_definition(found.iter().copied());

        let group = mapping.get("Fin").expect("group");
        assert_eq!(group.len(), 50);
        assert_eq!(group.members[0], Member::new("0", Arc::clone(&fin)));
        let expected: Vec<String> = (0..50).map(|i| i.to_string()).collect();
        assert_eq!(mapping.object_ids(), expected);
    }
}
