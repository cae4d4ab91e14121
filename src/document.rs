//! YAML document I/O
//!
//! Strict load/save primitives. The pipeline decides how to degrade:
//! load failures become empty documents there, not here.
//!
//! Only data values round-trip; comments, anchors and quoting styles are
//! not preserved. Key order is insertion order on both ends.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::node::ConfigNode;

/// Errors while reading or writing a document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("document root is not a mapping")]
    NotAMapping,
}

/// Load a YAML document as a mapping tree.
///
/// An empty or null document loads as an empty mapping; any other
/// non-mapping root is rejected.
pub fn load_document(path: &Path) -> Result<ConfigNode, DocumentError> {
    let text = fs::read_to_string(path)?;
    if text.trim().is_empty() {
        return Ok(ConfigNode::empty_mapping());
    }

    let value: serde_yaml::Value = serde_yaml::from_str(&text)?;
    match ConfigNode::from_value(value) {
        node @ ConfigNode::Mapping(_) => Ok(node),
        ConfigNode::Scalar(serde_yaml::Value::Null) => Ok(ConfigNode::empty_mapping()),
        ConfigNode::Scalar(_) => Err(DocumentError::NotAMapping),
    }
}

/// Write a mapping tree back as YAML, keys in insertion order.
pub fn save_document(path: &Path, document: &ConfigNode) -> Result<(), DocumentError> {
    let text = serde_yaml::to_string(&document.to_value())?;
    fs::write(path, text)?;
    Ok(())
}
