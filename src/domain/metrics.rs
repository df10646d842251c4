//! Depth, height and min-height of nodes.
//!
//! All measures are recomputed on every call; absent nodes measure 0.

use std::collections::HashMap;

use tracing::instrument;

use crate::domain::arena::{NodeId, Tree};

impl<T> Tree<T> {
    /// Number of nodes from `node` up to the root, both included. The root has depth 1.
    #[instrument(level = "trace", skip(self))]
    pub fn depth(&self, node: Option<NodeId>) -> usize {
        let mut depth = 0;
        let mut current = node.filter(|&idx| self.contains(idx));
        while let Some(idx) = current {
            depth += 1;
            current = self.parent(Some(idx));
        }
        depth
    }

    /// Nodes on the longest downward path. A single node has height 1.
    #[instrument(level = "trace", skip(self))]
    pub fn height(&self, node: Option<NodeId>) -> usize {
        self.calculate_height(node, usize::max)
    }

    /// Nodes on the shortest downward path, counting an empty slot as a path end.
    #[instrument(level = "trace", skip(self))]
    pub fn min_height(&self, node: Option<NodeId>) -> usize {
        self.calculate_height(node, usize::min)
    }

    /// Number of nodes in the subtree rooted at `node`.
    pub fn size(&self, node: Option<NodeId>) -> usize {
        self.iter_preorder(node).count()
    }

    /// Bottom-up over a postorder walk; a child's result is dropped once its parent used it.
    fn calculate_height(&self, node: Option<NodeId>, pick: fn(usize, usize) -> usize) -> usize {
        let mut heights: HashMap<NodeId, usize> = HashMap::new();
        for (idx, n) in self.iter_postorder(node) {
            let left = n.left.and_then(|c| heights.remove(&c)).unwrap_or(0);
            let right = n.right.and_then(|c| heights.remove(&c)).unwrap_or(0);
            heights.insert(idx, 1 + pick(left, right));
        }
        node.and_then(|idx| heights.remove(&idx)).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::arena::{Side, Tree};

    #[test]
    fn test_metrics_on_empty_tree() {
        let tree: Tree<()> = Tree::new();
        assert_eq!(tree.depth(None), 0);
        assert_eq!(tree.height(None), 0);
        assert_eq!(tree.min_height(None), 0);
        assert_eq!(tree.size(None), 0);
    }

    #[test]
    fn test_single_node_measures_one() {
        let mut tree = Tree::new();
        let root = tree.branch("solo").unwrap();
        assert_eq!(tree.depth(Some(root)), 1);
        assert_eq!(tree.height(Some(root)), 1);
        assert_eq!(tree.min_height(Some(root)), 1);
    }

    #[test]
    fn test_lopsided_tree() {
        // root -> left -> left.right
        let mut tree = Tree::new();
        let root = tree.branch(0).unwrap();
        let left = tree.attach_at(root, Side::Left, 1).unwrap();
        let deep = tree.attach_at(left, Side::Right, 2).unwrap();

        assert_eq!(tree.depth(Some(deep)), 3);
        assert_eq!(tree.height(Some(root)), 3);
        // the empty right slot of root ends the shortest path
        assert_eq!(tree.min_height(Some(root)), 1);
        assert_eq!(tree.size(Some(left)), 2);
    }
}
