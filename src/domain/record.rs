//! Flat input records and the options steering tree construction.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

/// A flat, parent-referencing input record.
///
/// `parent_id` shares the domain of `id`; the value configured as
/// [`BuildOptions::starting_parent_id`] marks top-level records.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<K, T> {
    pub id: K,
    pub parent_id: K,
    pub payload: T,
}

impl<K, T> Record<K, T> {
    pub fn new(id: K, parent_id: K, payload: T) -> Self {
        Self {
            id,
            parent_id,
            payload,
        }
    }
}

impl<K: fmt::Display, T> fmt::Display for Record<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (parent {})", self.id, self.parent_id)
    }
}

/// How far the build cursor climbs when the nesting level drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AscendMode {
    /// One step per flattened entry, regardless of how far the level drops.
    #[default]
    Single,
    /// Climb until the cursor sits at the parent level of the next entry.
    ToLevel,
}

impl FromStr for AscendMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "to_level" | "to-level" => Ok(Self::ToLevel),
            other => Err(DomainError::InvalidAscendMode(other.to_string())),
        }
    }
}

impl fmt::Display for AscendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::ToLevel => write!(f, "to_level"),
        }
    }
}

/// Options for flattening and building.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions<K> {
    /// Parent id denoting top-level records
    pub starting_parent_id: K,
    /// Sort records ascending by id before flattening
    pub sort_first: bool,
    pub ascend: AscendMode,
}

impl<K: Default> Default for BuildOptions<K> {
    fn default() -> Self {
        Self {
            starting_parent_id: K::default(),
            sort_first: true,
            ascend: AscendMode::default(),
        }
    }
}
