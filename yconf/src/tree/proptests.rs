//! Property-based tests for the path tree.

use super::{PathTree, Value};
use proptest::prelude::*;

// Strategy for generating single key segments
fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

// Strategy for generating dotted paths of one to four segments
fn path_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment_strategy(), 1..=4)
}

// Strategy for generating scalar leaves
fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::from),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        max_shrink_iters: 2000,
        .. ProptestConfig::default()
    })]

    // A value written at a dotted path reads back unchanged
    #[test]
    fn set_then_get_round_trips(path in path_strategy(), leaf in leaf_strategy()) {
        let tree = PathTree::new();
        let dotted = path.join(".");
        tree.set(&dotted, leaf.clone());

        prop_assert_eq!(tree.get(&dotted), Some(leaf.clone()));
        prop_assert_eq!(tree.lookup(&path), Some(leaf));
    }

    // Stored keys never contain the separator
    #[test]
    fn stored_keys_are_single_segments(paths in prop::collection::vec(path_strategy(), 1..8)) {
        let tree = PathTree::new();
        for path in &paths {
            tree.set(&path.join("."), 1);
        }

        let mut pending = vec![tree];
        while let Some(current) = pending.pop() {
            for (key, value) in current.items() {
                prop_assert!(!key.contains('.'));
                if let Value::Tree(child) = value {
                    pending.push(child);
                }
            }
        }
    }

    // Merging trees with disjoint top-level keys keeps every entry
    #[test]
    fn disjoint_merge_is_union(
        left in prop::collection::btree_map("[a-m]{1,4}", leaf_strategy(), 0..6),
        right in prop::collection::btree_map("[n-z]{1,4}", leaf_strategy(), 0..6),
    ) {
        let tree = PathTree::from_entries(left.clone());
        tree.merge(&PathTree::from_entries(right.clone()));

        prop_assert_eq!(tree.len(), left.len() + right.len());
        for (key, value) in left.iter().chain(right.iter()) {
            prop_assert_eq!(tree.get(key), Some(value.clone()));
        }
    }

    // A scalar written over a subtree discards the subtree entirely
    #[test]
    fn scalar_replaces_subtree(
        head in segment_strategy(),
        tail in path_strategy(),
        leaf in leaf_strategy(),
    ) {
        let tree = PathTree::new();
        tree.set(&format!("{head}.{}", tail.join(".")), "nested");
        tree.set(&head, leaf.clone());

        prop_assert_eq!(tree.get(&head), Some(leaf));
        prop_assert_eq!(tree.get(&format!("{head}.{}", tail[0])), None);
    }

    // Merging a tree into itself changes nothing
    #[test]
    fn self_merge_is_identity(paths in prop::collection::vec(path_strategy(), 0..6)) {
        let tree = PathTree::new();
        for (index, path) in paths.iter().enumerate() {
            tree.set(&path.join("."), index as i64);
        }
        let before = tree.to_mapping();
        tree.merge(&tree.clone());
        prop_assert_eq!(tree.to_mapping(), before);
    }
}
