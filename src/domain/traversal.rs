//! Preorder, inorder, postorder and level-order walks.
//!
//! Every walk is a lazy iterator with an explicit stack or queue, so callers can
//! stop early and deep trees do not grow the call stack. The visitor-style
//! methods on [`Tree`] are thin wrappers over the iterators.

use std::collections::VecDeque;

use tracing::instrument;

use crate::domain::arena::{Node, NodeId, Tree};

/// A level-order slot: a present node, or `None` for an empty child slot.
pub type Slot<'a, T> = Option<(NodeId, &'a Node<T>)>;

pub struct PreOrderIterator<'a, T> {
    tree: &'a Tree<T>,
    stack: Vec<NodeId>,
}

impl<'a, T> PreOrderIterator<'a, T> {
    fn new(tree: &'a Tree<T>, start: Option<NodeId>) -> Self {
        Self {
            tree,
            stack: start.into_iter().collect(),
        }
    }
}

impl<'a, T> Iterator for PreOrderIterator<'a, T> {
    type Item = (NodeId, &'a Node<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.node(current_idx) {
                // right first so left pops first
                self.stack.extend(node.right);
                self.stack.extend(node.left);
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct InOrderIterator<'a, T> {
    tree: &'a Tree<T>,
    stack: Vec<NodeId>,
    descend: Option<NodeId>,
}

impl<'a, T> InOrderIterator<'a, T> {
    fn new(tree: &'a Tree<T>, start: Option<NodeId>) -> Self {
        Self {
            tree,
            stack: Vec::new(),
            descend: start,
        }
    }
}

impl<'a, T> Iterator for InOrderIterator<'a, T> {
    type Item = (NodeId, &'a Node<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(idx) = self.descend.take() {
            if let Some(node) = self.tree.node(idx) {
                self.stack.push(idx);
                self.descend = node.left;
            }
        }
        let current_idx = self.stack.pop()?;
        let node = self.tree.node(current_idx)?;
        self.descend = node.right;
        Some((current_idx, node))
    }
}

pub struct PostOrderIterator<'a, T> {
    tree: &'a Tree<T>,
    stack: Vec<(NodeId, bool)>,
}

impl<'a, T> PostOrderIterator<'a, T> {
    fn new(tree: &'a Tree<T>, start: Option<NodeId>) -> Self {
        Self {
            tree,
            stack: start.map(|idx| (idx, false)).into_iter().collect(),
        }
    }
}

impl<'a, T> Iterator for PostOrderIterator<'a, T> {
    type Item = (NodeId, &'a Node<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.node(current_idx) {
                if visited {
                    return Some((current_idx, node));
                }
                self.stack.push((current_idx, true));
                if let Some(right) = node.right {
                    self.stack.push((right, false));
                }
                if let Some(left) = node.left {
                    self.stack.push((left, false));
                }
            }
        }
        None
    }
}

/// Breadth-first walk that also reports empty child slots.
///
/// The start node is yielded once; every expanded node then yields its left and
/// its right slot, present or not. Only present children are queued for
/// expansion.
pub struct LevelOrderIterator<'a, T> {
    tree: &'a Tree<T>,
    queue: VecDeque<NodeId>,
    pending: VecDeque<Slot<'a, T>>,
}

impl<'a, T> LevelOrderIterator<'a, T> {
    fn new(tree: &'a Tree<T>, start: Option<NodeId>) -> Self {
        let mut queue = VecDeque::new();
        let mut pending = VecDeque::new();
        if let Some((idx, node)) = start.and_then(|idx| tree.node(idx).map(|n| (idx, n))) {
            pending.push_back(Some((idx, node)));
            queue.push_back(idx);
        }
        Self {
            tree,
            queue,
            pending,
        }
    }

    fn slot(&self, idx: Option<NodeId>) -> Slot<'a, T> {
        let tree = self.tree;
        idx.and_then(|idx| tree.node(idx).map(|n| (idx, n)))
    }
}

impl<'a, T> Iterator for LevelOrderIterator<'a, T> {
    type Item = Slot<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(slot) = self.pending.pop_front() {
                return Some(slot);
            }
            let parent = self.queue.pop_front()?;
            let Some(node) = self.tree.node(parent) else {
                continue;
            };
            for child in [node.left, node.right] {
                let slot = self.slot(child);
                if let Some((idx, _)) = slot {
                    self.queue.push_back(idx);
                }
                self.pending.push_back(slot);
            }
        }
    }
}

impl<T> Tree<T> {
    pub fn iter_preorder(&self, start: Option<NodeId>) -> PreOrderIterator<'_, T> {
        PreOrderIterator::new(self, start)
    }

    pub fn iter_inorder(&self, start: Option<NodeId>) -> InOrderIterator<'_, T> {
        InOrderIterator::new(self, start)
    }

    pub fn iter_postorder(&self, start: Option<NodeId>) -> PostOrderIterator<'_, T> {
        PostOrderIterator::new(self, start)
    }

    pub fn iter_level_order(&self, start: Option<NodeId>) -> LevelOrderIterator<'_, T> {
        LevelOrderIterator::new(self, start)
    }

    #[instrument(level = "trace", skip(self, visit))]
    pub fn preorder<F>(&self, start: Option<NodeId>, mut visit: F)
    where
        F: FnMut(NodeId, &Node<T>),
    {
        self.iter_preorder(start).for_each(|(idx, node)| visit(idx, node));
    }

    #[instrument(level = "trace", skip(self, visit))]
    pub fn inorder<F>(&self, start: Option<NodeId>, mut visit: F)
    where
        F: FnMut(NodeId, &Node<T>),
    {
        self.iter_inorder(start).for_each(|(idx, node)| visit(idx, node));
    }

    #[instrument(level = "trace", skip(self, visit))]
    pub fn postorder<F>(&self, start: Option<NodeId>, mut visit: F)
    where
        F: FnMut(NodeId, &Node<T>),
    {
        self.iter_postorder(start).for_each(|(idx, node)| visit(idx, node));
    }

    /// Visits the start node, then both child slots of every expanded node.
    #[instrument(level = "trace", skip(self, visit))]
    pub fn level_order<F>(&self, start: Option<NodeId>, mut visit: F)
    where
        F: FnMut(Slot<'_, T>),
    {
        self.iter_level_order(start).for_each(|slot| visit(slot));
    }
}
