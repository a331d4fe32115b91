//! Depth-first discovery of block instances in a scene graph.

use crate::domain::entities::{Instance, Node, SceneRoot};

/// Collect every instance reachable from `root`, in depth-first pre-order.
///
/// Instances are recorded and then their own elements are explored, so nested
/// instances are found as well. A single root node is never counted itself,
/// only its elements are searched. The scene is assumed to be acyclic.
pub fn find_instances(root: &SceneRoot) -> Vec<&Instance> {
    let mut found = Vec::new();
    match root {
        SceneRoot::Sequence(nodes) => visit(nodes, &mut found),
        SceneRoot::Node(node) => {
            if let Some(elements) = node.elements() {
                visit(elements, &mut found);
            }
        }
    }
    found
}

fn visit<'a>(nodes: &'a [Node], found: &mut Vec<&'a Instance>) {
    for node in nodes {
        match node {
            Node::Leaf { .. } => {}
            Node::Container { elements, .. } => visit(elements, found),
            Node::Instance(instance) => {
                found.push(instance);
                if let Some(elements) = &instance.elements {
                    visit(elements, found);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::entities::Definition;

    fn instance(id: &str, def: &Arc<Definition>) -> Instance {
        Instance::new(id, Some(Arc::clone(def)))
    }

    fn ids(found: &[&Instance]) -> Vec<String> {
        found.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn given_empty_scene_when_traversing_then_finds_nothing() {
        assert!(find_instances(&SceneRoot::empty()).is_empty());
        assert!(find_instances(&SceneRoot::Node(Node::leaf("root"))).is_empty());
    }

    #[test]
    fn given_nested_instances_when_traversing_then_preorder_per_branch() {
        let def = Arc::new(Definition::named("Fin"));
        let root = SceneRoot::Node(Node::container(
            "root",
            vec![
                instance("a", &def)
                    .with_elements(vec![
                        instance("a1", &def).into(),
                        Node::container("box", vec![instance("a2", &def).into()]),
                    ])
                    .into(),
                Node::leaf("wall"),
                instance("b", &def).into(),
            ],
        ));

        let found = find_instances(&root);

        assert_eq!(ids(&found), vec!["a", "a1", "a2", "b"]);
    }

    #[test]
    fn given_root_instance_when_traversing_then_root_not_counted() {
        let def = Arc::new(Definition::named("Fin"));
        let root = SceneRoot::Node(
            instance("root", &def)
                .with_elements(vec![instance("child", &def).into()])
                .into(),
        );

        assert_eq!(ids(&find_instances(&root)), vec!["child"]);
    }

    #[test]
    fn given_instances_in_root_sequence_when_traversing_then_each_counted_once() {
        let def = Arc::new(Definition::named("Fin"));
        let root = SceneRoot::Sequence(vec![
            instance("a", &def).with_elements(vec![]).into(),
            instance("b", &def).into(),
        ]);

        assert_eq!(ids(&find_instances(&root)), vec!["a", "b"]);
    }
}
