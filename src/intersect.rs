//! Intersection of flattened documents
//!
//! Finds the path/value pairs present with an identical value in every
//! document of a layer. Equality is deep and type-strict: `1` and `1.0`
//! do not match, nor do `"true"` and `true`.

use crate::flatten::FlatMap;

/// Compute the pairs common to all given flat maps.
///
/// The first map is the candidate set; a pair survives only if every
/// other map contains the same path with an equal value. Output order
/// follows the first map's key order. Fewer than two maps yield an
/// empty result: a single document shares nothing worth hoisting.
pub fn common_pairs(maps: &[FlatMap]) -> FlatMap {
    let (first, rest) = match maps.split_first() {
        Some(split) => split,
        None => return FlatMap::new(),
    };
    if rest.is_empty() {
        return FlatMap::new();
    }

    let mut common = FlatMap::new();
    for (path, value) in first {
        if rest.iter().all(|map| map.get(path) == Some(value)) {
            common.insert(path.clone(), value.clone());
        }
    }
    common
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::Flattener;
    use crate::node::ConfigNode;

    fn flat(text: &str) -> FlatMap {
        let tree = ConfigNode::from_value(serde_yaml::from_str(text).unwrap());
        Flattener::default().flatten(&tree).0
    }

    #[test]
    fn test_empty_input() {
        assert!(common_pairs(&[]).is_empty());
    }

    #[test]
    fn test_single_document_shares_nothing() {
        assert!(common_pairs(&[flat("a: 1\n")]).is_empty());
    }

    #[test]
    fn test_common_subset() {
        let maps = [
            flat("a:\n  b: 1\n  c: 2\n"),
            flat("a:\n  b: 1\n  c: 3\n"),
            flat("a:\n  b: 1\n  c: 4\n"),
        ];
        let common = common_pairs(&maps);

        assert_eq!(common.len(), 1);
        assert_eq!(common["a___b"], serde_yaml::Value::from(1));
    }

    #[test]
    fn test_missing_path_excludes_pair() {
        let maps = [flat("a: 1\nb: 2\n"), flat("a: 1\n")];
        let common = common_pairs(&maps);

        assert_eq!(common.len(), 1);
        assert!(common.contains_key("a"));
    }

    #[test]
    fn test_no_common_pairs_is_empty_not_error() {
        let maps = [flat("a: 1\n"), flat("a: 2\n")];
        assert!(common_pairs(&maps).is_empty());
    }

    #[test]
    fn test_integer_float_mismatch() {
        let maps = [flat("v: 1\n"), flat("v: 1.0\n")];
        assert!(common_pairs(&maps).is_empty());
    }

    #[test]
    fn test_sequence_deep_equality() {
        let maps = [flat("l: [1, 2]\n"), flat("l: [1, 2]\n")];
        assert_eq!(common_pairs(&maps).len(), 1);

        let maps = [flat("l: [1, 2]\n"), flat("l: [2, 1]\n")];
        assert!(common_pairs(&maps).is_empty());
    }

    #[test]
    fn test_output_order_follows_first_document() {
        let maps = [flat("z: 1\nm: 2\na: 3\n"), flat("a: 3\nz: 1\nm: 2\n")];
        let common = common_pairs(&maps);
        let order: Vec<&String> = common.keys().collect();
        assert_eq!(order, ["z", "m", "a"]);
    }

    #[test]
    fn test_permutation_invariant_as_set() {
        let a = flat("x: 1\ny: 2\nz: 9\n");
        let b = flat("y: 2\nx: 1\nz: 8\n");

        let forward = common_pairs(&[a.clone(), b.clone()]);
        let backward = common_pairs(&[b, a]);

        let mut forward_pairs: Vec<_> = forward.into_iter().collect();
        let mut backward_pairs: Vec<_> = backward.into_iter().collect();
        forward_pairs.sort_by(|l, r| l.0.cmp(&r.0));
        backward_pairs.sort_by(|l, r| l.0.cmp(&r.0));
        assert_eq!(forward_pairs, backward_pairs);
    }
}
