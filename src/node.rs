//! Document tree model
//!
//! Configuration documents are modelled as an owned tree of `ConfigNode`s:
//! either a `Mapping` (insertion-ordered, string-keyed) or a `Scalar`
//! (any non-mapping YAML value, held opaquely). The split makes the
//! flatten/merge/prune contracts exhaustive: every algorithm matches on
//! exactly these two cases.

use indexmap::IndexMap;
use serde_yaml::Value;

/// Ordered children of a mapping node
pub type Children = IndexMap<String, ConfigNode>;

/// A node in a configuration document tree
///
/// Scalars carry the raw YAML value (string, number, bool, sequence,
/// null) and are compared by deep equality. `serde_yaml` numbers keep
/// their integer/float distinction, so `1` and `1.0` never compare equal.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigNode {
    /// Nested mapping; key order is insertion order
    Mapping(Children),
    /// Opaque leaf value (never a mapping)
    Scalar(Value),
}

impl ConfigNode {
    /// Create an empty mapping node
    pub fn empty_mapping() -> Self {
        ConfigNode::Mapping(Children::new())
    }

    /// True if this node is a mapping
    pub fn is_mapping(&self) -> bool {
        matches!(self, ConfigNode::Mapping(_))
    }

    /// Borrow the children of a mapping node
    pub fn as_mapping(&self) -> Option<&Children> {
        match self {
            ConfigNode::Mapping(children) => Some(children),
            ConfigNode::Scalar(_) => None,
        }
    }

    /// Build a tree from a parsed YAML value.
    ///
    /// Mapping keys are stringified: YAML allows non-string keys, but the
    /// document model is string-keyed like the values files it serves.
    /// A duplicate stringified key keeps the last occurrence.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Mapping(mapping) => {
                let mut children = Children::new();
                for (key, child) in mapping {
                    children.insert(key_to_string(&key), ConfigNode::from_value(child));
                }
                ConfigNode::Mapping(children)
            }
            scalar => ConfigNode::Scalar(scalar),
        }
    }

    /// Convert back to a YAML value, preserving key order
    pub fn to_value(&self) -> Value {
        match self {
            ConfigNode::Mapping(children) => {
                let mut mapping = serde_yaml::Mapping::new();
                for (key, child) in children {
                    mapping.insert(Value::String(key.clone()), child.to_value());
                }
                Value::Mapping(mapping)
            }
            ConfigNode::Scalar(value) => value.clone(),
        }
    }
}

fn key_to_string(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
