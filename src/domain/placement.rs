//! Choosing where a new member joins the hierarchy.
//!
//! Two policies exist. [`Placement::Natural`] fills the tree breadth-first,
//! left before right, by following the shallowest branch. [`Placement::WeakRegion`]
//! follows the lower side and, once the two halves under the starting node have
//! equal height, spills new members into the half that is already full.

use std::fmt;

use tracing::{debug, instrument};

use crate::domain::arena::{NodeId, Tree};
use crate::domain::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Breadth-first, leftmost-first filling
    Natural,
    /// Prefer the weaker (shallower or less filled) region
    #[default]
    WeakRegion,
}

impl Placement {
    pub fn from_natural(natural: bool) -> Self {
        if natural {
            Self::Natural
        } else {
            Self::WeakRegion
        }
    }

    pub fn is_natural(self) -> bool {
        self == Self::Natural
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Natural => write!(f, "natural"),
            Self::WeakRegion => write!(f, "weak-region"),
        }
    }
}

impl<T> Tree<T> {
    /// Node that should receive the next child, or None for an empty tree.
    ///
    /// The caller attaches to whichever of `left`/`right` is free. Descent starts
    /// at `node`, which also serves as the root context for spillover.
    #[instrument(level = "debug", skip(self))]
    pub fn insertable(&self, node: Option<NodeId>, placement: Placement) -> Option<NodeId> {
        let root_context = node.filter(|&idx| self.contains(idx))?;
        let mut current = root_context;

        loop {
            let n = self.node(current)?;
            let (left_metric, right_metric) = match placement {
                Placement::Natural => (self.min_height(n.left), self.min_height(n.right)),
                Placement::WeakRegion => (self.height(n.left), self.height(n.right)),
            };

            if right_metric < left_metric {
                match n.right {
                    Some(right) => current = right,
                    None => return Some(current),
                }
                continue;
            }

            match n.left {
                Some(left) => current = left,
                None => {
                    if placement == Placement::WeakRegion {
                        if let Some(spill) = self.spillover(root_context) {
                            debug!(?spill, "spilling into the full side of the root context");
                            return Some(spill);
                        }
                    }
                    return Some(current);
                }
            }
        }
    }

    /// Break node of the side to fill when the root context is balanced but not full.
    fn spillover(&self, root_context: NodeId) -> Option<NodeId> {
        let ctx = self.node(root_context)?;
        if self.is_full(Some(root_context)) || self.height(ctx.left) != self.height(ctx.right) {
            return None;
        }

        let scanned = if self.is_full(ctx.left) {
            ctx.right
        } else {
            ctx.left
        };
        let mut candidate = None;
        let complete = self.is_complete(scanned, |break_node| candidate = break_node);
        candidate.filter(|_| complete)
    }

    /// Places `value` according to `placement`, starting the search at `at`
    /// (the root when None). On an empty tree the value becomes the root.
    pub fn insert(
        &mut self,
        value: T,
        at: Option<NodeId>,
        placement: Placement,
    ) -> DomainResult<NodeId> {
        self.insert_with(at, placement, |_| value)
    }

    /// Like [`Tree::insert`], but builds the value once the parent is known.
    #[instrument(level = "debug", skip(self, make))]
    pub fn insert_with<F>(
        &mut self,
        at: Option<NodeId>,
        placement: Placement,
        make: F,
    ) -> DomainResult<NodeId>
    where
        F: FnOnce(Option<&T>) -> T,
    {
        if let Some(idx) = at {
            if !self.contains(idx) {
                return Err(DomainError::UnknownNode(idx));
            }
        }

        match self.insertable(at.or(self.root()), placement) {
            None => {
                let idx = self.set_root(make(None));
                debug!(?idx, "inserted as root");
                Ok(idx)
            }
            Some(parent) => {
                let parent_node = self.node(parent).ok_or(DomainError::UnknownNode(parent))?;
                if parent_node.free_side().is_none() {
                    return Err(DomainError::StructuralOverflow(parent));
                }
                let value = make(Some(&parent_node.value));
                let (idx, side) = self.attach_new(parent, value)?;
                debug!(?idx, ?parent, ?side, "inserted");
                Ok(idx)
            }
        }
    }
}
