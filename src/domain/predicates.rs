//! Fullness and completeness checks.

use tracing::{instrument, trace};

use crate::domain::arena::{Node, NodeId, Tree};

/// Outcome of [`Tree::full_check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullCheck {
    pub full: bool,
    /// Parent of the first node (preorder) without a left child; None when full.
    pub attach_parent: Option<NodeId>,
}

/// Size of a perfect binary tree of `height`, None if it does not fit a usize.
fn perfect_size(height: usize) -> Option<usize> {
    u32::try_from(height)
        .ok()
        .and_then(|h| 1usize.checked_shl(h))
        .map(|size| size - 1)
}

impl<T> Tree<T> {
    /// True when the subtree is a perfect binary tree of its height.
    ///
    /// An absent node is trivially full.
    pub fn is_full(&self, node: Option<NodeId>) -> bool {
        self.full_check(node).full
    }

    #[instrument(level = "trace", skip(self))]
    pub fn full_check(&self, node: Option<NodeId>) -> FullCheck {
        let mut count = 0usize;
        let mut open_parent: Option<Option<NodeId>> = None;
        for (_, n) in self.iter_preorder(node) {
            count += 1;
            if open_parent.is_none() && n.left.is_none() {
                open_parent = Some(n.parent);
            }
        }
        let full = perfect_size(self.height(node)) == Some(count);
        FullCheck {
            full,
            attach_parent: if full { None } else { open_parent.flatten() },
        }
    }

    /// Level-order completeness check that also reports the break node.
    ///
    /// `on_break` is called exactly once with the break node, present or not.
    pub fn is_complete<F>(&self, node: Option<NodeId>, on_break: F) -> bool
    where
        F: FnOnce(Option<NodeId>),
    {
        let (complete, break_node) = self.break_node(node);
        on_break(break_node);
        complete
    }

    /// Completeness verdict and break node of the subtree at `node`.
    ///
    /// Once an empty slot has been seen in level order, any later node breaks
    /// completeness. Until then every visited node refreshes the break node
    /// candidate (see [`Tree::break_candidate`]).
    #[instrument(level = "trace", skip(self))]
    pub fn break_node(&self, node: Option<NodeId>) -> (bool, Option<NodeId>) {
        let mut gap_seen = false;
        let mut complete = true;
        let mut break_node = None;

        for slot in self.iter_level_order(node) {
            match slot {
                None => gap_seen = true,
                Some(_) if gap_seen => complete = false,
                Some((idx, n)) => {
                    if let Some(candidate) = self.break_candidate(idx, n) {
                        break_node = candidate;
                    }
                }
            }
        }
        trace!(complete, ?break_node, "completeness scan done");
        (complete, break_node)
    }

    /// Next attachment point suggested by a node seen before any gap.
    ///
    /// `Some(candidate)` replaces the running break node, `None` keeps it.
    fn break_candidate(&self, idx: NodeId, n: &Node<T>) -> Option<Option<NodeId>> {
        let Some(parent) = n.parent.and_then(|p| self.node(p)) else {
            return Some(None);
        };
        if parent.right.is_none() {
            return Some(n.parent);
        }
        match parent.parent.and_then(|g| self.node(g)) {
            None => Some(Some(idx)),
            Some(grandparent) => grandparent.right.map(Some),
        }
    }
}
