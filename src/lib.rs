//! Binary hierarchies built from flat, parent-referencing records.
//!
//! Records are flattened in preorder and replayed through a cursor into an
//! arena-backed binary [`Tree`](domain::Tree). New members are placed either
//! breadth-first ("natural") or by weak-side preference, which favours the
//! shallower or less filled region of the hierarchy.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
