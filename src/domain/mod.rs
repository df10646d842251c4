//! Domain layer: the binary hierarchy and its algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod error;
pub mod metrics;
pub mod placement;
pub mod predicates;
pub mod record;
pub mod traversal;

pub use arena::{Node, NodeId, Side, Tree};
pub use builder::{flatten, level_sort, FlatEntry, Flattened, TreeBuilder};
pub use error::{DomainError, DomainResult};
pub use placement::Placement;
pub use predicates::FullCheck;
pub use record::{AscendMode, BuildOptions, Record};
pub use traversal::Slot;
