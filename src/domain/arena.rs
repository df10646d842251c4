use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};

/// Stable handle to a node inside a [`Tree`].
pub type NodeId = Index;

/// Child slot of a binary node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Tree node in the arena-based binary hierarchy.
#[derive(Debug)]
pub struct Node<T> {
    /// Payload, read-only once placed
    pub value: T,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl<T> Node<T> {
    fn new(value: T, parent: Option<NodeId>) -> Self {
        Self {
            value,
            parent,
            left: None,
            right: None,
        }
    }

    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// First empty child slot, left before right.
    pub fn free_side(&self) -> Option<Side> {
        if self.left.is_none() {
            Some(Side::Left)
        } else if self.right.is_none() {
            Some(Side::Right)
        } else {
            None
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Arena-based binary tree.
///
/// Children are owned through the arena and referenced by handle; `parent` is a
/// non-owning back-reference. `current` is the construction cursor used by
/// [`Tree::branch`], [`Tree::leaf`] and [`Tree::end`].
#[derive(Debug)]
pub struct Tree<T> {
    arena: Arena<Node<T>>,
    root: Option<NodeId>,
    current: Option<NodeId>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            current: None,
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// The construction cursor; meaningless outside building.
    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.arena.get(id)
    }

    pub fn value(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(|n| &n.value)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn left(&self, id: Option<NodeId>) -> Option<NodeId> {
        id.and_then(|id| self.node(id)).and_then(|n| n.left)
    }

    pub fn right(&self, id: Option<NodeId>) -> Option<NodeId> {
        id.and_then(|id| self.node(id)).and_then(|n| n.right)
    }

    pub fn parent(&self, id: Option<NodeId>) -> Option<NodeId> {
        id.and_then(|id| self.node(id)).and_then(|n| n.parent)
    }

    /// Which slot of its parent `id` occupies, None for the root.
    pub fn side_of(&self, id: NodeId) -> Option<Side> {
        let parent = self.node(self.node(id)?.parent?)?;
        if parent.left == Some(id) {
            Some(Side::Left)
        } else if parent.right == Some(id) {
            Some(Side::Right)
        } else {
            None
        }
    }

    /// First node in preorder whose value matches `predicate`.
    pub fn position<P>(&self, mut predicate: P) -> Option<NodeId>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter_preorder(self.root)
            .find(|(_, node)| predicate(&node.value))
            .map(|(id, _)| id)
    }

    /// Creates a parentless node and makes it the root.
    ///
    /// Any previous root is kept in the arena but detached from the hierarchy;
    /// callers only do this on an empty tree.
    pub(crate) fn set_root(&mut self, value: T) -> NodeId {
        let idx = self.arena.insert(Node::new(value, None));
        self.root = Some(idx);
        idx
    }

    /// Attaches a new node under `parent`, filling left before right.
    ///
    /// Fails without touching the tree when both slots are taken.
    #[instrument(level = "trace", skip(self, value))]
    pub fn attach_new(&mut self, parent: NodeId, value: T) -> DomainResult<(NodeId, Side)> {
        let side = self
            .node(parent)
            .ok_or(DomainError::UnknownNode(parent))?
            .free_side()
            .ok_or(DomainError::StructuralOverflow(parent))?;
        let idx = self.attach_at(parent, side, value)?;
        Ok((idx, side))
    }

    /// Attaches a new node into a specific slot of `parent`.
    #[instrument(level = "trace", skip(self, value))]
    pub fn attach_at(&mut self, parent: NodeId, side: Side, value: T) -> DomainResult<NodeId> {
        let parent_node = self.node(parent).ok_or(DomainError::UnknownNode(parent))?;
        if parent_node.child(side).is_some() {
            return Err(DomainError::SlotTaken { parent, side });
        }

        let idx = self.arena.insert(Node::new(value, Some(parent)));
        if let Some(parent_node) = self.arena.get_mut(parent) {
            match side {
                Side::Left => parent_node.left = Some(idx),
                Side::Right => parent_node.right = Some(idx),
            }
        }
        Ok(idx)
    }

    /// Adds a node under the cursor and moves the cursor onto it.
    ///
    /// On an empty tree (or without a cursor) the node becomes root and cursor.
    #[instrument(level = "trace", skip(self, value))]
    pub fn branch(&mut self, value: T) -> DomainResult<NodeId> {
        let idx = match (self.root, self.current) {
            (Some(_), Some(current)) => self.attach_new(current, value)?.0,
            (None, _) => self.set_root(value),
            (Some(root), None) => {
                debug!("cursor unset, restarting at root");
                self.current = Some(root);
                return self.branch(value);
            }
        };
        self.current = Some(idx);
        Ok(idx)
    }

    /// Adds a node under the cursor without moving it.
    ///
    /// Behaves like [`Tree::branch`] while there is no root or cursor yet.
    #[instrument(level = "trace", skip(self, value))]
    pub fn leaf(&mut self, value: T) -> DomainResult<NodeId> {
        match (self.root, self.current) {
            (Some(_), Some(current)) => Ok(self.attach_new(current, value)?.0),
            _ => self.branch(value),
        }
    }

    /// Moves the cursor to its parent; the root stays put.
    pub fn end(&mut self) -> Option<NodeId> {
        if let Some(parent) = self.parent(self.current) {
            self.current = Some(parent);
        }
        self.current
    }

    /// Drops the construction cursor.
    pub fn reset_cursor(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_fills_left_then_right_then_overflows() {
        let mut tree = Tree::new();
        let root = tree.branch("root").unwrap();

        let (left, left_side) = tree.attach_new(root, "l").unwrap();
        let (right, right_side) = tree.attach_new(root, "r").unwrap();

        assert_eq!(left_side, Side::Left);
        assert_eq!(right_side, Side::Right);
        assert_eq!(tree.side_of(left), Some(Side::Left));
        assert_eq!(tree.side_of(right), Some(Side::Right));
        assert_eq!(tree.parent(Some(left)), Some(root));
        assert_eq!(
            tree.attach_new(root, "third"),
            Err(DomainError::StructuralOverflow(root))
        );
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_attach_at_rejects_taken_slot() {
        let mut tree = Tree::new();
        let root = tree.branch(0).unwrap();
        let right = tree.attach_at(root, Side::Right, 2).unwrap();

        assert_eq!(tree.left(Some(root)), None);
        assert_eq!(tree.right(Some(root)), Some(right));
        assert_eq!(
            tree.attach_at(root, Side::Right, 3),
            Err(DomainError::SlotTaken {
                parent: root,
                side: Side::Right
            })
        );
        // free_side still offers the left slot
        let (left, side) = tree.attach_new(root, 1).unwrap();
        assert_eq!(side, Side::Left);
        assert_eq!(tree.left(Some(root)), Some(left));
    }

    #[test]
    fn test_cursor_branch_leaf_end() {
        let mut tree = Tree::new();
        let a = tree.branch('A').unwrap();
        let b = tree.leaf('B').unwrap();
        let c = tree.branch('C').unwrap();
        assert_eq!(tree.current(), Some(c));

        let d = tree.leaf('D').unwrap();
        assert_eq!(tree.end(), Some(a));
        assert_eq!(tree.end(), Some(a), "root stays root");

        assert_eq!(tree.left(Some(a)), Some(b));
        assert_eq!(tree.right(Some(a)), Some(c));
        assert_eq!(tree.left(Some(c)), Some(d));
        assert!(tree.node(d).unwrap().is_leaf());
    }

    #[test]
    fn test_leaf_on_empty_tree_becomes_root() {
        let mut tree = Tree::new();
        let idx = tree.leaf(1).unwrap();
        assert_eq!(tree.root(), Some(idx));
        assert_eq!(tree.current(), Some(idx));
        assert_eq!(tree.side_of(idx), None);
    }

    #[test]
    fn test_accessors_on_absent_nodes_are_none() {
        let tree: Tree<u8> = Tree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.left(None), None);
        assert_eq!(tree.right(None), None);
        assert_eq!(tree.parent(None), None);
        assert_eq!(tree.position(|_| true), None);
    }
}
