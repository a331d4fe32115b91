//! JSON scene files
//!
//! Decodes the host's object JSON into the domain `SceneRoot`. A scene is a
//! single object or an array of objects:
//!
//! ```json
//! { "id": "root", "speckle_type": "Base",
//!   "elements": [
//!     { "id": "a1", "speckle_type": "Objects.Other.BlockInstance",
//!       "definition": { "id": "d1", "name": "Fin A" } } ] }
//! ```

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::{Definition, Instance, Node, SceneRoot};
use crate::infrastructure::traits::{FileSystem, TreeSource};

/// Default type marker for block instances.
pub const DEFAULT_INSTANCE_TYPE: &str = "Objects.Other.BlockInstance";

#[derive(Debug, Deserialize)]
struct RawNode {
    id: Option<String>,
    #[serde(default)]
    speckle_type: Option<String>,
    #[serde(default, alias = "@elements")]
    elements: Option<Vec<RawNode>>,
    #[serde(default, alias = "@definition")]
    definition: Option<RawDefinition>,
}

#[derive(Debug, Deserialize)]
struct RawDefinition {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Error while decoding a scene document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{location}: {message}")]
pub struct SceneFormatError {
    /// JSON path of the offending node, e.g. `$.elements[2]`
    pub location: String,
    pub message: String,
}

impl From<SceneFormatError> for io::Error {
    fn from(e: SceneFormatError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, e)
    }
}

/// Converts raw JSON nodes into domain nodes.
///
/// Definitions carrying an `id` are interned, so every instance that
/// references the same id shares one `Arc<Definition>`.
pub struct SceneDecoder {
    instance_type: String,
    definitions: HashMap<String, Arc<Definition>>,
}

impl SceneDecoder {
    pub fn new(instance_type: impl Into<String>) -> Self {
        Self {
            instance_type: instance_type.into(),
            definitions: HashMap::new(),
        }
    }

    /// Decode a scene from JSON text.
    pub fn decode_str(&mut self, content: &str) -> Result<SceneRoot, SceneFormatError> {
        let value: Value = serde_json::from_str(content).map_err(|e| SceneFormatError {
            location: "$".to_string(),
            message: e.to_string(),
        })?;
        self.decode_value(value)
    }

    /// Decode a scene from an already parsed JSON value.
    pub fn decode_value(&mut self, value: Value) -> Result<SceneRoot, SceneFormatError> {
        match value {
            Value::Array(items) => {
                let mut nodes = Vec::with_capacity(items.len());
                for (i, item) in items.into_iter().enumerate() {
                    let location = format!("$[{i}]");
                    let raw = parse_raw(item, &location)?;
                    nodes.push(self.convert(raw, &location)?);
                }
                Ok(SceneRoot::Sequence(nodes))
            }
            other => {
                let raw = parse_raw(other, "$")?;
                Ok(SceneRoot::Node(self.convert(raw, "$")?))
            }
        }
    }

    /// Whether a `speckle_type` chain names the configured instance type.
    ///
    /// Chains are `:`-separated, base type first, so subtypes match too.
    pub fn is_instance_type(&self, speckle_type: &str) -> bool {
        speckle_type.split(':').any(|t| t == self.instance_type)
    }

    fn convert(&mut self, raw: RawNode, location: &str) -> Result<Node, SceneFormatError> {
        let id = raw.id.ok_or_else(|| SceneFormatError {
            location: location.to_string(),
            message: "node has no id".to_string(),
        })?;

        let elements = match raw.elements {
            Some(children) => {
                let mut nodes = Vec::with_capacity(children.len());
                for (i, child) in children.into_iter().enumerate() {
                    nodes.push(self.convert(child, &format!("{location}.elements[{i}]"))?);
                }
                Some(nodes)
            }
            None => None,
        };

        let is_instance = raw
            .speckle_type
            .as_deref()
            .is_some_and(|t| self.is_instance_type(t));

        let node = if is_instance {
            let definition = raw.definition.map(|d| self.intern(d));
            Node::Instance(Instance {
                id,
                definition,
                elements,
            })
        } else {
            match elements {
                Some(elements) => Node::Container { id, elements },
                None => Node::Leaf { id },
            }
        };
        Ok(node)
    }

    fn intern(&mut self, raw: RawDefinition) -> Arc<Definition> {
        let definition = Definition {
            id: raw.id,
            name: raw.name,
        };
        match definition.id.clone() {
            // first occurrence of an id wins
            Some(id) => Arc::clone(
                self.definitions
                    .entry(id)
                    .or_insert_with(|| Arc::new(definition)),
            ),
            None => Arc::new(definition),
        }
    }
}

fn parse_raw(value: Value, location: &str) -> Result<RawNode, SceneFormatError> {
    serde_json::from_value(value).map_err(|e| SceneFormatError {
        location: location.to_string(),
        message: e.to_string(),
    })
}

/// Reads the scene from a JSON file.
pub struct JsonFileSource {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    instance_type: String,
}

impl JsonFileSource {
    pub fn new(fs: Arc<dyn FileSystem>, path: &Path, instance_type: impl Into<String>) -> Self {
        Self {
            fs,
            path: path.to_path_buf(),
            instance_type: instance_type.into(),
        }
    }
}

impl TreeSource for JsonFileSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn receive(&self) -> io::Result<SceneRoot> {
        if !self.fs.exists(&self.path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("scene file not found: {}", self.path.display()),
            ));
        }
        let content = self.fs.read_to_string(&self.path)?;
        debug!("receive: read {} bytes", content.len());
        let mut decoder = SceneDecoder::new(self.instance_type.clone());
        Ok(decoder.decode_str(&content)?)
    }
}

/// In-memory scene, for tests and embedding.
pub struct StaticSource {
    root: SceneRoot,
}

impl StaticSource {
    pub fn new(root: SceneRoot) -> Self {
        Self { root }
    }
}

impl TreeSource for StaticSource {
    fn receive(&self) -> io::Result<SceneRoot> {
        Ok(self.root.clone())
    }
}
