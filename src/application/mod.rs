//! Application layer: record loading, rendering and the hierarchy service
//!
//! This layer orchestrates domain logic and owns all file access.

pub mod error;
pub mod error_ext;
pub mod records;
pub mod render;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::ResultExt;
pub use records::{MemberRecord, MemberTree, RecordFields};
pub use render::TreeRender;
