//! Tests for the tree-shape analytics

use rstest::rstest;

use ranktree::analytics::RankAnalytics;
use ranktree::errors::TreeError;
use ranktree::member::Member;
use ranktree::tree::BalancedIndex;

fn member(name: &str, rank: f64) -> Member {
    Member::new(name, rank)
}

fn seed(ranks: &[f64]) -> BalancedIndex {
    let mut tree = BalancedIndex::new();
    for &rank in ranks {
        tree.insert(member(&format!("m{rank}"), rank));
    }
    tree
}

// Shape under test (inserted without rotations):
//
//         50
//       /    \
//      30     70
//     /  \
//    20    40
fn five_member_tree() -> BalancedIndex {
    seed(&[50.0, 30.0, 70.0, 20.0, 40.0])
}

// ============================================================
// Dual containment
// ============================================================

#[rstest]
#[case::split_under_inner_node(20.0, 40.0, 30.0)]
#[case::split_across_root(20.0, 70.0, 50.0)]
#[case::one_is_ancestor_of_other(30.0, 40.0, 30.0)]
#[case::same_member_twice(40.0, 40.0, 40.0)]
fn given_two_members_when_querying_dual_containment_then_deepest_container_wins(
    #[case] x: f64,
    #[case] y: f64,
    #[case] expected: f64,
) {
    let tree = five_member_tree();
    let analytics = RankAnalytics::new(&tree);

    let found = analytics
        .dual_containment(&member("", x), &member("", y))
        .unwrap();

    assert_eq!(found.rank, expected);
}

#[test]
fn given_absent_member_when_querying_dual_containment_then_not_found() {
    let tree = five_member_tree();
    let analytics = RankAnalytics::new(&tree);

    let result = analytics.dual_containment(&member("", 20.0), &member("", 99.0));

    assert!(matches!(result, Err(TreeError::NotFound(_))));
}

#[test]
fn given_empty_tree_when_querying_dual_containment_then_not_found() {
    let tree = BalancedIndex::new();
    let analytics = RankAnalytics::new(&tree);

    let result = analytics.dual_containment(&member("", 1.0), &member("", 2.0));

    assert!(matches!(result, Err(TreeError::NotFound(_))));
}

// ============================================================
// Same-depth siblings
// ============================================================

#[test]
fn given_root_target_when_querying_same_depth_then_only_root_returns() {
    let tree = seed(&[10.0, 20.0, 30.0]); // balances to root 20

    let analytics = RankAnalytics::new(&tree);
    let peers = analytics.same_depth_siblings(&member("", 20.0)).unwrap();

    let ranks: Vec<f64> = peers.iter().map(|m| m.rank).collect();
    assert_eq!(ranks, vec![20.0]);
}

#[test]
fn given_deep_target_when_querying_same_depth_then_peers_come_left_to_right() {
    let tree = five_member_tree();

    let analytics = RankAnalytics::new(&tree);
    let peers = analytics.same_depth_siblings(&member("", 40.0)).unwrap();

    let ranks: Vec<f64> = peers.iter().map(|m| m.rank).collect();
    assert_eq!(ranks, vec![20.0, 40.0]);
}

#[test]
fn given_any_present_target_when_querying_same_depth_then_target_is_included() {
    let tree = five_member_tree();
    let analytics = RankAnalytics::new(&tree);

    for m in tree.in_order() {
        let peers = analytics.same_depth_siblings(m).unwrap();
        assert!(peers.contains(m), "peers of {m} must include {m}");
    }
}

#[test]
fn given_absent_target_when_querying_same_depth_then_not_found() {
    let tree = five_member_tree();
    let analytics = RankAnalytics::new(&tree);

    let result = analytics.same_depth_siblings(&member("", 99.0));

    assert!(matches!(result, Err(TreeError::NotFound(_))));
}

// ============================================================
// Leaf-closure partition
// ============================================================

#[rstest]
#[case::empty(&[], 0)]
#[case::single(&[10.0], 1)]
#[case::three_balanced(&[10.0, 20.0, 30.0], 2)]
#[case::one_child_chain(&[10.0, 20.0], 1)]
#[case::five_members(&[50.0, 30.0, 70.0, 20.0, 40.0], 3)]
// perfect 7-member tree: four leaves plus the root close as units
#[case::seven_perfect(&[40.0, 20.0, 60.0, 10.0, 30.0, 50.0, 70.0], 5)]
fn given_tree_shape_when_partitioning_then_unit_count_matches(
    #[case] ranks: &[f64],
    #[case] expected: usize,
) {
    let tree = seed(ranks);
    let analytics = RankAnalytics::new(&tree);

    assert_eq!(analytics.leaf_closure_partition(), expected);
}

// ============================================================
// In-order dump
// ============================================================

#[test]
fn given_populated_tree_when_dumping_then_ascending_and_restartable() {
    let tree = five_member_tree();
    let analytics = RankAnalytics::new(&tree);

    let first: Vec<f64> = analytics.in_order_dump().map(|m| m.rank).collect();
    let second: Vec<f64> = analytics.in_order_dump().map(|m| m.rank).collect();

    assert_eq!(first, vec![20.0, 30.0, 40.0, 50.0, 70.0]);
    assert_eq!(first, second);
}

#[test]
fn given_empty_tree_when_dumping_then_iterator_is_immediately_done() {
    let tree = BalancedIndex::new();
    let analytics = RankAnalytics::new(&tree);

    assert_eq!(analytics.in_order_dump().count(), 0);
}
