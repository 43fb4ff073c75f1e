//! Integration tests for the AVL tree: balancing, removal, traversal

use std::collections::BTreeSet;

use proptest::prelude::*;
use proptest::strategy::ValueTree;
use proptest::test_runner::TestRunner;
use rstest::rstest;

use addrbook::domain::{AvlTree, ContactId, Node};
use addrbook::util::testing::{init_test_setup, sample_contact, tree_from_ids};

/// Parenthesised shape: `(left id right)`, leaves bare, missing children as `.`.
fn shape(node: Option<&Node>) -> String {
    match node {
        None => ".".to_string(),
        Some(n) if n.left().is_none() && n.right().is_none() => n.contact().id.to_string(),
        Some(n) => format!(
            "({} {} {})",
            shape(n.left()),
            n.contact().id,
            shape(n.right())
        ),
    }
}

/// Ids `0..count` in an order shuffled by a deterministic runner.
fn shuffled_distinct_ids(count: ContactId) -> Vec<ContactId> {
    let mut runner = TestRunner::deterministic();
    Just((0..count).collect::<Vec<_>>())
        .prop_shuffle()
        .new_tree(&mut runner)
        .expect("generate ids")
        .current()
}

// ============================================================
// Insertion
// ============================================================

#[rstest]
#[case::ascending(&[10, 20, 30])]
#[case::descending(&[30, 20, 10])]
#[case::left_right(&[30, 10, 20])]
#[case::right_left(&[10, 30, 20])]
fn given_three_keys_in_any_order_when_inserting_then_middle_key_is_root(
    #[case] ids: &[ContactId],
) {
    init_test_setup();

    // Act
    let tree = tree_from_ids(ids);

    // Assert
    assert_eq!(shape(tree.root()), "(10 20 30)");
    assert_eq!(tree.height(), 2);
    tree.check_invariants().unwrap();
}

#[test]
fn given_seven_ascending_keys_when_inserting_then_tree_is_perfect() {
    // Act
    let tree = tree_from_ids(&[1, 2, 3, 4, 5, 6, 7]);

    // Assert
    assert_eq!(shape(tree.root()), "((1 2 3) 4 (5 6 7))");
    assert_eq!(tree.height(), 3);
}

#[test]
fn given_existing_id_when_inserting_again_then_tree_unchanged() {
    // Arrange
    let mut tree = tree_from_ids(&[5, 3, 8]);
    let before = tree.clone();
    let mut replacement = sample_contact(3);
    replacement.name = "Someone Else".to_string();

    // Act
    let inserted = tree.insert(replacement);

    // Assert
    assert!(!inserted);
    assert_eq!(tree, before);
    assert_eq!(tree.get(3).unwrap().name, "Person 3");
}

#[test]
fn given_negative_and_zero_ids_when_inserting_then_ordered_correctly() {
    let tree = tree_from_ids(&[0, -5, 7, -1]);

    assert_eq!(tree.ids(), vec![-5, -1, 0, 7]);
    tree.check_invariants().unwrap();
}

#[test]
fn given_many_random_keys_when_inserting_then_height_is_logarithmic() {
    init_test_setup();

    // Arrange
    let ids = shuffled_distinct_ids(10_000);
    let mut tree = AvlTree::new();

    // Act
    for &id in &ids {
        assert!(tree.insert(sample_contact(id)));
    }

    // Assert
    let n = tree.len() as f64;
    let bound = 1.44 * (n + 2.0).log2();
    assert_eq!(tree.len(), 10_000);
    assert!(
        f64::from(tree.height()) <= bound,
        "height {} exceeds {}",
        tree.height(),
        bound
    );
    tree.check_invariants().unwrap();
    let keys: BTreeSet<ContactId> = ids.into_iter().collect();
    assert_eq!(tree.ids(), keys.into_iter().collect::<Vec<_>>());
}

// ============================================================
// Search
// ============================================================

#[test]
fn given_populated_tree_when_searching_then_finds_present_and_misses_absent() {
    let tree = tree_from_ids(&[50, 30, 70, 20, 40, 60, 80]);

    let node = tree.search(60).expect("60 present");
    assert_eq!(node.contact(), &sample_contact(60));
    assert!(tree.search(65).is_none());
    assert!(AvlTree::new().search(1).is_none());
}

// ============================================================
// Removal
// ============================================================

#[test]
fn given_seven_node_tree_when_removing_root_then_successor_takes_its_place() {
    // Arrange
    let mut tree = tree_from_ids(&[1, 2, 3, 4, 5, 6, 7]);

    // Act
    let removed = tree.remove(4);

    // Assert
    assert_eq!(removed, Some(sample_contact(4)));
    assert_eq!(shape(tree.root()), "((1 2 3) 5 (. 6 7))");
    assert_eq!(tree.root().unwrap().contact(), &sample_contact(5));
    tree.check_invariants().unwrap();
}

#[rstest]
#[case::leaf(&[2, 1, 3], 3, "(1 2 .)")]
#[case::single_child(&[2, 1, 3, 4], 3, "(1 2 4)")]
#[case::triggers_rotation(&[2, 1, 3, 4], 1, "(2 3 4)")]
fn given_tree_when_removing_then_expected_shape(
    #[case] ids: &[ContactId],
    #[case] victim: ContactId,
    #[case] expected: &str,
) {
    let mut tree = tree_from_ids(ids);

    assert!(tree.remove(victim).is_some());

    assert_eq!(shape(tree.root()), expected);
    tree.check_invariants().unwrap();
}

#[test]
fn given_absent_id_when_removing_then_returns_none_and_tree_unchanged() {
    let mut tree = tree_from_ids(&[5, 3, 8]);
    let before = tree.clone();

    assert_eq!(tree.remove(4), None);
    assert_eq!(tree, before);
}

#[test]
fn given_all_ids_when_removing_each_then_tree_ends_empty() {
    let ids: Vec<ContactId> = (1..=64).collect();
    let mut tree = tree_from_ids(&ids);

    for id in ids.iter().rev().step_by(2).chain(ids.iter().step_by(2)) {
        assert!(tree.remove(*id).is_some(), "id {id} should be present");
        tree.check_invariants().unwrap();
    }

    assert!(tree.is_empty());
    assert_eq!(tree.height(), 0);
    assert!(tree.root().is_none());
}

// ============================================================
// Traversal
// ============================================================

#[test]
fn given_unordered_inserts_when_traversing_then_visits_in_ascending_order() {
    let tree = tree_from_ids(&[42, 7, 19, 3, 88, 61, 25]);
    let mut seen = Vec::new();

    tree.traverse_in_order(|c| seen.push(c.id));

    assert_eq!(seen, vec![3, 7, 19, 25, 42, 61, 88]);
    assert_eq!(
        tree.in_order().iter().map(|c| c.id).collect::<Vec<_>>(),
        seen
    );
}

#[test]
fn given_empty_tree_when_traversing_then_visits_nothing() {
    let tree = AvlTree::new();
    let mut count = 0;

    tree.traverse_in_order(|_| count += 1);

    assert_eq!(count, 0);
}

// ============================================================
// Random operation sequences
// ============================================================

#[derive(Debug, Clone)]
enum Op {
    Insert(ContactId),
    Remove(ContactId),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-50i64..50).prop_map(Op::Insert),
        (-50i64..50).prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn random_operations_keep_tree_balanced_and_consistent(ops in prop::collection::vec(op(), 0..200)) {
        let mut tree = AvlTree::new();
        let mut model = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(id) => {
                    prop_assert_eq!(tree.insert(sample_contact(id)), model.insert(id));
                }
                Op::Remove(id) => {
                    let removed = tree.remove(id);
                    prop_assert_eq!(removed.is_some(), model.remove(&id));
                    if let Some(contact) = removed {
                        prop_assert_eq!(contact, sample_contact(id));
                    }
                    prop_assert!(!tree.contains(id));
                }
            }
            prop_assert!(tree.check_invariants().is_ok());
        }

        prop_assert_eq!(tree.len(), model.len());
        prop_assert_eq!(tree.ids(), model.iter().copied().collect::<Vec<_>>());
        for id in &model {
            prop_assert_eq!(tree.get(*id).cloned(), Some(sample_contact(*id)));
        }
    }
}
