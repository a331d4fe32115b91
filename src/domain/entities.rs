//! Domain entities: core data structures

use std::sync::Arc;

/// Shared template instantiated by block instances.
///
/// Instances hold an `Arc<Definition>`; one definition is never duplicated per instance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Definition {
    /// Host identifier of the definition, if the host provided one
    pub id: Option<String>,
    /// Name used as the grouping key (may be absent)
    pub name: Option<String>,
}

impl Definition {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }

    /// Name usable as a group key. Empty names count as absent.
    pub fn group_key(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}

/// A repeated-component instance: a node that references a shared definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub id: String,
    pub definition: Option<Arc<Definition>>,
    /// Nested elements; `None` when the node exposes no child collection
    pub elements: Option<Vec<Node>>,
}

impl Instance {
    pub fn new(id: impl Into<String>, definition: Option<Arc<Definition>>) -> Self {
        Self {
            id: id.into(),
            definition,
            elements: None,
        }
    }

    pub fn with_elements(mut self, elements: Vec<Node>) -> Self {
        self.elements = Some(elements);
        self
    }

    /// Definition name, if the definition is present and named.
    pub fn definition_name(&self) -> Option<&str> {
        self.definition.as_deref().and_then(Definition::group_key)
    }
}

/// Element of a scene graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Node without a child collection
    Leaf { id: String },
    /// Generic node exposing a child collection
    Container { id: String, elements: Vec<Node> },
    /// Repeated-component instance
    Instance(Instance),
}

impl Node {
    pub fn leaf(id: impl Into<String>) -> Self {
        Node::Leaf { id: id.into() }
    }

    pub fn container(id: impl Into<String>, elements: Vec<Node>) -> Self {
        Node::Container {
            id: id.into(),
            elements,
        }
    }

    /// Child collection, if this node exposes one.
    pub fn elements(&self) -> Option<&[Node]> {
        match self {
            Node::Leaf { .. } => None,
            Node::Container { elements, .. } => Some(elements),
            Node::Instance(instance) => instance.elements.as_deref(),
        }
    }
}

impl From<Instance> for Node {
    fn from(instance: Instance) -> Self {
        Node::Instance(instance)
    }
}

/// Root of a received scene: a single node or an ordered sequence of nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneRoot {
    Node(Node),
    Sequence(Vec<Node>),
}

impl SceneRoot {
    pub fn empty() -> Self {
        SceneRoot::Sequence(Vec::new())
    }
}
