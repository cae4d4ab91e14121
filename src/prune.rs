//! Deep removal of hoisted paths
//!
//! Rebuilds a document tree without the keys whose cumulative flat path
//! is in the removal set. Removal takes the whole subtree at the path,
//! whatever its kind. A mapping left empty after descent is dropped from
//! its parent, so the output never accumulates empty shells.
//!
//! Keys containing the separator are unaddressable by flat paths and are
//! kept verbatim, mirroring the flattener's skip rule.

use std::collections::HashSet;

use crate::flatten::FlatPath;
use crate::node::{Children, ConfigNode};

/// Return a copy of `tree` with every path in `paths` removed.
pub fn prune_paths(tree: &ConfigNode, paths: &HashSet<FlatPath>, separator: &str) -> ConfigNode {
    match tree {
        ConfigNode::Mapping(children) => {
            ConfigNode::Mapping(prune_children(children, paths, separator, ""))
        }
        ConfigNode::Scalar(value) => ConfigNode::Scalar(value.clone()),
    }
}

fn prune_children(
    children: &Children,
    paths: &HashSet<FlatPath>,
    separator: &str,
    prefix: &str,
) -> Children {
    let mut kept = Children::new();

    for (key, child) in children {
        if key.contains(separator) {
            kept.insert(key.clone(), child.clone());
            continue;
        }

        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}{}{}", prefix, separator, key)
        };
        if paths.contains(&path) {
            continue;
        }

        match child {
            ConfigNode::Mapping(nested) => {
                let pruned = prune_children(nested, paths, separator, &path);
                if !pruned.is_empty() {
                    kept.insert(key.clone(), ConfigNode::Mapping(pruned));
                }
            }
            ConfigNode::Scalar(value) => {
                kept.insert(key.clone(), ConfigNode::Scalar(value.clone()));
            }
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::DEFAULT_SEPARATOR;

    fn tree(text: &str) -> ConfigNode {
        ConfigNode::from_value(serde_yaml::from_str(text).unwrap())
    }

    fn paths(list: &[&str]) -> HashSet<FlatPath> {
        list.iter().map(|p| p.to_string()).collect()
    }

    fn prune(node: &ConfigNode, list: &[&str]) -> ConfigNode {
        prune_paths(node, &paths(list), DEFAULT_SEPARATOR)
    }

    #[test]
    fn test_prune_scalar_leaf() {
        let result = prune(&tree("a:\n  b: 1\n  c: 2\n"), &["a___b"]);
        assert_eq!(result, tree("a:\n  c: 2\n"));
    }

    #[test]
    fn test_prune_whole_subtree() {
        let result = prune(&tree("a:\n  b: 1\nkeep: 2\n"), &["a"]);
        assert_eq!(result, tree("keep: 2\n"));
    }

    #[test]
    fn test_empty_parent_collapses() {
        let result = prune(&tree("x:\n  y: 1\n"), &["x___y"]);
        assert_eq!(result, ConfigNode::empty_mapping());
    }

    #[test]
    fn test_deeply_nested_collapse() {
        let result = prune(&tree("a:\n  b:\n    c: 1\nother: 2\n"), &["a___b___c"]);
        assert_eq!(result, tree("other: 2\n"));
    }

    #[test]
    fn test_unmatched_paths_leave_tree_unchanged_except_empties() {
        let result = prune(&tree("a:\n  b: 1\n"), &["nope"]);
        assert_eq!(result, tree("a:\n  b: 1\n"));
    }

    #[test]
    fn test_preexisting_empty_mapping_dropped() {
        let result = prune(&tree("a: {}\nb: 1\n"), &[]);
        assert_eq!(result, tree("b: 1\n"));
    }

    #[test]
    fn test_sequences_never_descended() {
        let result = prune(&tree("l:\n  - a: 1\nkeep: 2\n"), &["l___a"]);
        assert_eq!(result, tree("l:\n  - a: 1\nkeep: 2\n"));
    }

    #[test]
    fn test_separator_key_is_never_pruned() {
        // A literal "a___b" key must not match the flat path a -> b.
        let result = prune(&tree("a___b: 1\n"), &["a___b"]);
        assert_eq!(result, tree("a___b: 1\n"));
    }
}
