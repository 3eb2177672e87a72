//! # Serialized Form
//!
//! The JSON shape documents are stored in:
//!
//! ```text
//! {"root":{"children":[ node, ... ]}}
//!
//! node = {"type": "<name>", "version": 1, ...kind fields, "children": [ node, ... ]}
//! ```
//!
//! Leaves (`text`, `image`, `video`, `linebreak`) carry no `children` key.
//! Reading is lenient: nodes that are not objects or have no string `type`
//! are skipped, and every other key lands in [`SerializedNode::fields`].

use crate::CodecError;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

/// Version written for every node kind this crate knows
pub const CURRENT_VERSION: u64 = 1;

/// Serialized minimum document: a root holding one empty paragraph
pub const CANONICAL_EMPTY_DOCUMENT: &str =
    r#"{"root":{"children":[{"type":"paragraph","version":1,"children":[]}]}}"#;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SerializedDocument {
    pub root: SerializedRoot,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SerializedRoot {
    pub children: Vec<SerializedNode>,
}

/// One node of the serialized form
///
/// Field order on output is `type`, `version`, the kind fields, then
/// `children`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SerializedNode {
    #[serde(rename = "type")]
    pub node_type: String,
    pub version: u64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<SerializedNode>>,
}

impl SerializedDocument {
    pub fn new(children: Vec<SerializedNode>) -> Self {
        Self {
            root: SerializedRoot { children },
        }
    }

    /// The minimum valid document
    pub fn minimum() -> Self {
        Self::new(vec![SerializedNode::new("paragraph").with_children(Vec::new())])
    }

    /// Parse the JSON envelope
    pub fn parse(input: &str) -> Result<Self, CodecError> {
        if input.trim().is_empty() {
            return Err(CodecError::Empty);
        }
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, CodecError> {
        let object = value
            .as_object()
            .ok_or_else(|| CodecError::InvalidEnvelope("document is not an object".to_string()))?;
        let root = object
            .get("root")
            .and_then(Value::as_object)
            .ok_or_else(|| CodecError::InvalidEnvelope("missing root object".to_string()))?;
        let children = root
            .get("children")
            .and_then(Value::as_array)
            .ok_or_else(|| CodecError::InvalidEnvelope("root has no children array".to_string()))?;

        Ok(Self::new(SerializedNode::from_values(children)))
    }

    pub fn to_json(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl SerializedNode {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            version: CURRENT_VERSION,
            fields: Map::new(),
            children: None,
        }
    }

    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<SerializedNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// Read one node; `None` when the value is not an object with a string `type`
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let node_type = object.get("type")?.as_str()?.to_string();

        let version = object
            .get("version")
            .and_then(Value::as_u64)
            .unwrap_or(CURRENT_VERSION);

        let children = match object.get("children") {
            Some(Value::Array(values)) => Some(Self::from_values(values)),
            Some(_) => {
                warn!(node_type = %node_type, "Ignoring non-array children");
                Some(Vec::new())
            }
            None => None,
        };

        let fields = object
            .iter()
            .filter(|(key, _)| !matches!(key.as_str(), "type" | "version" | "children"))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Some(Self {
            node_type,
            version,
            fields,
            children,
        })
    }

    /// Read a list of nodes, skipping entries that are not nodes
    pub fn from_values(values: &[Value]) -> Vec<Self> {
        values
            .iter()
            .filter_map(|value| {
                let node = Self::from_value(value);
                if node.is_none() {
                    warn!("Skipping child that is not a typed object");
                }
                node
            })
            .collect()
    }

    pub fn children(&self) -> &[SerializedNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn field_u64(&self, name: &str) -> Option<u64> {
        self.fields.get(name).and_then(Value::as_u64)
    }

    pub fn field_bool(&self, name: &str) -> Option<bool> {
        self.fields.get(name).and_then(Value::as_bool)
    }
}
