//! How a catalog read was answered
//!
//! The index is a cache that can be stale. These types record whether an
//! answer came straight through the index or needed a store scan and a
//! rebuild, so callers and tests can tell the two apart.

use crate::index::IndexLoad;

/// Path an operation took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The index answered and the store agreed (or the index had no entry)
    Indexed,
    /// The index disagreed with the store; the store was scanned and the
    /// index rebuilt
    Rebuilt,
}

/// A value plus the path taken to produce it
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub resolution: Resolution,
}

impl<T> Resolved<T> {
    pub fn indexed(value: T) -> Self {
        Self {
            value,
            resolution: Resolution::Indexed,
        }
    }

    pub fn rebuilt(value: T) -> Self {
        Self {
            value,
            resolution: Resolution::Rebuilt,
        }
    }

    /// True if the index had to be rebuilt
    pub fn was_rebuilt(&self) -> bool {
        self.resolution == Resolution::Rebuilt
    }

    /// Drops the resolution
    pub fn into_value(self) -> T {
        self.value
    }
}

/// What happened to the index when the catalog opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Startup {
    /// Outcome of reading the index file
    pub load: IndexLoad,
    /// Whether the index was rebuilt from the store before first use
    pub rebuilt: bool,
}
