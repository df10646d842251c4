//! Application services

pub mod hierarchy;

pub use hierarchy::{Hierarchy, HierarchyService, Insertion, TreeStats, WalkOrder};
