//! Deep merge of document trees
//!
//! Merge semantics:
//! - Mapping x Mapping: deep-merge by key (recursive)
//! - anything else: overlay wins (including a mapping replacing a
//!   scalar or the other way around)
//!
//! Keys only in the base are kept in place, keys only in the overlay are
//! appended, so the merged mapping keeps the base's key order followed
//! by overlay-only keys in overlay order. The base is borrowed and never
//! mutated.

use crate::node::ConfigNode;

/// Deep merge two trees, returning a new tree.
pub fn deep_merge(base: &ConfigNode, overlay: &ConfigNode) -> ConfigNode {
    match (base, overlay) {
        (ConfigNode::Mapping(base_map), ConfigNode::Mapping(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, overlay_value) in overlay_map {
                let value = match merged.get(key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value.clone(),
                };
                // insert on an existing key keeps its position
                merged.insert(key.clone(), value);
            }
            ConfigNode::Mapping(merged)
        }
        (_, overlay) => overlay.clone(),
    }
}
