//! Traversal, metric and shape-predicate properties over whole trees

use itertools::Itertools;
use rstest::rstest;

use weakside::domain::{Node, NodeId, Placement, Record, Side, Tree, TreeBuilder};
use weakside::util::testing::{grown_tree, init_test_setup, sample_records};

fn sample_tree() -> Tree<Record<i64, &'static str>> {
    TreeBuilder::<i64>::default().build(sample_records()).unwrap()
}

fn labels<'a, I>(walk: I) -> Vec<&'static str>
where
    I: Iterator<Item = (NodeId, &'a Node<Record<i64, &'static str>>)>,
{
    walk.map(|(_, n)| n.value.payload).collect()
}

// ============================================================
// Traversal orders
// ============================================================

#[test]
fn given_sample_tree_when_walking_then_orders_match() {
    // Arrange
    init_test_setup();
    let tree = sample_tree();
    let root = tree.root();

    // Act
    let pre = labels(tree.iter_preorder(root));
    let ino = labels(tree.iter_inorder(root));
    let post = labels(tree.iter_postorder(root));

    // Assert
    assert_eq!(pre, vec!["A", "B", "C", "D", "G", "H", "E", "F"]);
    assert_eq!(ino, vec!["B", "A", "G", "D", "H", "C", "F", "E"]);
    assert_eq!(post, vec!["B", "G", "H", "D", "F", "E", "C", "A"]);
}

#[test]
fn given_sample_tree_when_walking_level_order_then_gaps_are_reported() {
    let tree = sample_tree();

    let slots: Vec<Option<&str>> = tree
        .iter_level_order(tree.root())
        .map(|slot| slot.map(|(_, n)| n.value.payload))
        .collect();

    assert_eq!(
        slots,
        vec![
            Some("A"),
            Some("B"),
            Some("C"),
            None,
            None,
            Some("D"),
            Some("E"),
            Some("G"),
            Some("H"),
            Some("F"),
            None,
            None,
            None,
            None,
            None,
            None,
            None,
        ]
    );
}

#[rstest]
#[case(1)]
#[case(4)]
#[case(9)]
#[case(16)]
fn given_grown_tree_when_walking_then_every_order_visits_same_nodes(#[case] count: usize) {
    let tree = grown_tree(count, Placement::Natural);
    let root = tree.root();

    let pre: Vec<usize> = tree.iter_preorder(root).map(|(_, n)| n.value).sorted().collect();
    let ino: Vec<usize> = tree.iter_inorder(root).map(|(_, n)| n.value).sorted().collect();
    let post: Vec<usize> = tree.iter_postorder(root).map(|(_, n)| n.value).sorted().collect();
    let level: Vec<usize> = tree
        .iter_level_order(root)
        .flatten()
        .map(|(_, n)| n.value)
        .sorted()
        .collect();

    let expected: Vec<usize> = (1..=count).collect();
    assert_eq!(pre, expected);
    assert_eq!(ino, expected);
    assert_eq!(post, expected);
    assert_eq!(level, expected);
}

#[test]
fn given_visitor_wrappers_then_they_agree_with_iterators() {
    let tree = sample_tree();
    let root = tree.root();

    let mut pre = Vec::new();
    tree.preorder(root, |_, n| pre.push(n.value.payload));
    let mut post = Vec::new();
    tree.postorder(root, |_, n| post.push(n.value.payload));
    let mut gaps = 0;
    tree.level_order(root, |slot| {
        if slot.is_none() {
            gaps += 1;
        }
    });

    assert_eq!(pre, labels(tree.iter_preorder(root)));
    assert_eq!(post, labels(tree.iter_postorder(root)));
    // every present node contributes two slots, one per child
    assert_eq!(gaps, 2 * tree.len() - (tree.len() - 1));
}

#[test]
fn given_subtree_start_when_walking_then_only_subtree_is_visited() {
    let tree = sample_tree();
    let c = tree.position(|r| r.payload == "C");

    assert_eq!(labels(tree.iter_preorder(c)), vec!["C", "D", "G", "H", "E", "F"]);
    assert_eq!(tree.size(c), 6);
}

#[test]
fn given_absent_start_when_walking_then_nothing_is_visited() {
    let tree = sample_tree();

    assert_eq!(tree.iter_preorder(None).count(), 0);
    assert_eq!(tree.iter_level_order(None).count(), 0);
}

// ============================================================
// Metrics
// ============================================================

#[rstest]
#[case(1, 1, 1)]
#[case(3, 2, 2)]
#[case(4, 3, 2)]
#[case(7, 3, 3)]
#[case(12, 4, 3)]
fn given_natural_tree_then_heights_match_size(
    #[case] count: usize,
    #[case] height: usize,
    #[case] min_height: usize,
) {
    let tree = grown_tree(count, Placement::Natural);
    let root = tree.root();

    assert_eq!(tree.height(root), height);
    assert_eq!(tree.min_height(root), min_height);
    assert!(tree.height(root) >= tree.min_height(root));
}

#[test]
fn given_deep_chain_when_measuring_then_heights_do_not_exhaust_stack() {
    // Arrange: every record is the only child of the previous one
    const DEPTH: i64 = 100_000;
    let records: Vec<Record<i64, ()>> = (1..=DEPTH).map(|id| Record::new(id, id - 1, ())).collect();
    let tree = TreeBuilder::<i64>::default().build(records).unwrap();
    let root = tree.root();

    // Act
    let height = tree.height(root);
    let min_height = tree.min_height(root);

    // Assert
    assert_eq!(height, DEPTH as usize);
    // the empty right slot of the root ends the shortest path
    assert_eq!(min_height, 1);
    assert!(!tree.is_full(root));
    let deepest = tree.iter_preorder(root).last().map(|(idx, _)| idx);
    assert_eq!(tree.depth(deepest), DEPTH as usize);
}

#[test]
fn given_sample_tree_then_depth_counts_nodes_to_root() {
    let tree = sample_tree();

    let depths: Vec<(&str, usize)> = tree
        .iter_preorder(tree.root())
        .map(|(idx, n)| (n.value.payload, tree.depth(Some(idx))))
        .collect();

    assert_eq!(
        depths,
        vec![
            ("A", 1),
            ("B", 2),
            ("C", 2),
            ("D", 3),
            ("G", 4),
            ("H", 4),
            ("E", 3),
            ("F", 4),
        ]
    );
    assert_eq!(tree.depth(None), 0);
}

// ============================================================
// Fullness and completeness
// ============================================================

#[rstest]
#[case(1, true)]
#[case(2, false)]
#[case(3, true)]
#[case(5, false)]
#[case(7, true)]
#[case(15, true)]
fn given_natural_tree_then_full_only_at_perfect_sizes(#[case] count: usize, #[case] full: bool) {
    let tree = grown_tree(count, Placement::Natural);

    assert_eq!(tree.is_full(tree.root()), full);
}

#[rstest]
#[case(Placement::Natural, 20)]
#[case(Placement::WeakRegion, 10)]
fn given_grown_trees_then_full_implies_complete(
    #[case] placement: Placement,
    #[case] max: usize,
) {
    for count in 1..=max {
        let tree = grown_tree(count, placement);
        let root = tree.root();
        let complete = tree.is_complete(root, |_| {});

        if tree.is_full(root) {
            assert!(complete, "{} nodes: full but not complete", count);
        }
        if placement.is_natural() {
            assert!(complete, "{} nodes: breadth-first tree must be complete", count);
        }
    }
}

#[test]
fn given_complete_but_not_full_tree_then_predicates_differ() {
    let tree = grown_tree(5, Placement::Natural);
    let root = tree.root();

    assert!(!tree.is_full(root));
    assert!(tree.is_complete(root, |_| {}));
}

#[test]
fn given_gap_before_node_then_tree_is_not_complete() {
    // Arrange: 1 with only a right child
    let mut tree = Tree::new();
    let root = tree.branch(1).unwrap();
    tree.attach_at(root, Side::Right, 2).unwrap();

    // Act
    let complete = tree.is_complete(Some(root), |_| {});

    // Assert
    assert!(!complete);
    assert!(!tree.is_full(Some(root)));
}

#[test]
fn given_sample_tree_then_it_is_neither_full_nor_complete() {
    let tree = sample_tree();
    let root = tree.root();

    assert!(!tree.is_full(root));
    assert!(!tree.is_complete(root, |_| {}));
    // B is the first node in preorder without a left child
    let check = tree.full_check(root);
    assert_eq!(check.attach_parent, root);
}
