//! Path flattening and reconstruction
//!
//! Turns a nested document into a flat `dotted-path -> scalar` map and
//! back. Flat paths join key segments with a reserved separator; the
//! default `___` is chosen to be unlikely in real configuration keys.
//!
//! A key that itself contains the separator cannot be addressed
//! unambiguously. Such keys are reported as conflicts and their entries
//! are left out of the flat map entirely, so they are never hoisted and
//! never pruned.

use indexmap::IndexMap;
use serde_yaml::Value;

use crate::node::{Children, ConfigNode};

/// Default path separator between key segments
pub const DEFAULT_SEPARATOR: &str = "___";

/// Dotted path addressing one location in a document tree
pub type FlatPath = String;

/// Flat view of one document: path -> leaf value, in document order
pub type FlatMap = IndexMap<FlatPath, Value>;

/// A structural ambiguity met while flattening or unflattening.
///
/// None of these are fatal; they are surfaced as warnings and resolved
/// by a fixed precedence rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathConflict {
    /// A mapping key contains the separator; its subtree was skipped
    SeparatorInKey { key: String, path: FlatPath },
    /// An intermediate scalar was replaced by an empty mapping to make
    /// room for a longer path
    ScalarReplacedByMapping { path: FlatPath },
    /// A scalar assignment was skipped because the target already holds
    /// a mapping built from a longer path (mapping wins)
    ScalarSkippedForMapping { path: FlatPath },
}

impl std::fmt::Display for PathConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathConflict::SeparatorInKey { key, path } => {
                write!(f, "key '{}' at '{}' contains the separator; subtree skipped", key, path)
            }
            PathConflict::ScalarReplacedByMapping { path } => {
                write!(f, "scalar at '{}' replaced by a mapping", path)
            }
            PathConflict::ScalarSkippedForMapping { path } => {
                write!(f, "scalar for '{}' skipped; a mapping already occupies it", path)
            }
        }
    }
}

/// Flattens and unflattens document trees with a fixed separator
#[derive(Debug, Clone)]
pub struct Flattener {
    separator: String,
}

impl Default for Flattener {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl Flattener {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Flatten a tree into path -> scalar entries.
    ///
    /// Empty mappings contribute no entries. Keys containing the
    /// separator are reported and skipped together with their subtrees.
    pub fn flatten(&self, tree: &ConfigNode) -> (FlatMap, Vec<PathConflict>) {
        let mut flat = FlatMap::new();
        let mut conflicts = Vec::new();
        if let ConfigNode::Mapping(children) = tree {
            self.flatten_into(children, "", &mut flat, &mut conflicts);
        }
        (flat, conflicts)
    }

    fn flatten_into(
        &self,
        children: &Children,
        prefix: &str,
        flat: &mut FlatMap,
        conflicts: &mut Vec<PathConflict>,
    ) {
        for (key, child) in children {
            if key.contains(&self.separator) {
                conflicts.push(PathConflict::SeparatorInKey {
                    key: key.clone(),
                    path: prefix.to_string(),
                });
                continue;
            }
            let path = self.join(prefix, key);
            match child {
                ConfigNode::Mapping(nested) => {
                    self.flatten_into(nested, &path, flat, conflicts);
                }
                ConfigNode::Scalar(value) => {
                    flat.insert(path, value.clone());
                }
            }
        }
    }

    /// Rebuild a nested tree from flat entries, in insertion order.
    ///
    /// Conflict precedence, applied per entry:
    /// - an intermediate segment holding a scalar is overwritten with an
    ///   empty mapping so the longer path can continue;
    /// - if the final segment already holds a mapping and the incoming
    ///   value is a scalar, the scalar is skipped (mapping wins);
    /// - if the final segment holds a scalar and the incoming value is a
    ///   mapping, the mapping overwrites.
    pub fn unflatten(&self, flat: &FlatMap) -> (ConfigNode, Vec<PathConflict>) {
        let mut root = Children::new();
        let mut conflicts = Vec::new();

        for (path, value) in flat {
            let segments: Vec<&str> = path.split(&self.separator).collect();
            let (last, parents) = match segments.split_last() {
                Some(split) => split,
                None => continue,
            };

            let mut current = &mut root;
            let mut walked = String::new();
            for segment in parents {
                if !walked.is_empty() {
                    walked.push_str(&self.separator);
                }
                walked.push_str(segment);

                let slot = current
                    .entry(segment.to_string())
                    .or_insert_with(ConfigNode::empty_mapping);
                if !slot.is_mapping() {
                    conflicts.push(PathConflict::ScalarReplacedByMapping {
                        path: walked.clone(),
                    });
                    *slot = ConfigNode::empty_mapping();
                }
                current = match slot {
                    ConfigNode::Mapping(children) => children,
                    ConfigNode::Scalar(_) => unreachable!("slot was just made a mapping"),
                };
            }

            let incoming = ConfigNode::from_value(value.clone());
            let occupied_by_mapping =
                matches!(current.get(*last), Some(ConfigNode::Mapping(_)));
            let occupied_by_scalar =
                matches!(current.get(*last), Some(ConfigNode::Scalar(_)));
            if occupied_by_mapping && !incoming.is_mapping() {
                conflicts.push(PathConflict::ScalarSkippedForMapping { path: path.clone() });
                continue;
            }
            if occupied_by_scalar && incoming.is_mapping() {
                conflicts.push(PathConflict::ScalarReplacedByMapping { path: path.clone() });
            }
            current.insert((*last).to_string(), incoming);
        }

        (ConfigNode::Mapping(root), conflicts)
    }

    fn join(&self, prefix: &str, key: &str) -> FlatPath {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}{}{}", prefix, self.separator, key)
        }
    }
}
