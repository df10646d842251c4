//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::{NodeId, Side};

/// Domain errors represent structural violations of the binary hierarchy.
/// Empty inputs and queries on absent nodes are not errors; they resolve to base cases.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node already has two children: {0:?}")]
    StructuralOverflow(NodeId),

    #[error("{side:?} slot of {parent:?} is already taken")]
    SlotTaken { parent: NodeId, side: Side },

    #[error("record {record} has no free slot under its parent")]
    RecordOverflow { record: String },

    #[error("unknown node: {0:?}")]
    UnknownNode(NodeId),

    #[error("invalid ascend mode: {0} (expected 'single' or 'to_level')")]
    InvalidAscendMode(String),
}

/// Result type for tree operations.
pub type DomainResult<T> = Result<T, DomainError>;
