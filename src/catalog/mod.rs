//! Catalog: the record store and its hash index, kept consistent
//!
//! Writes consult the index first to reject duplicate keys, then touch the
//! store, then record the resulting position in the index. Reads go through
//! the index, check the position against the store, and on any mismatch
//! scan the store and rebuild the index.
//!
//! All operations take `&mut self`, so an index/store operation pair can
//! never interleave with another one.

mod errors;
mod manager;
mod resolution;

pub use errors::{CatalogError, CatalogResult};
pub use manager::{Catalog, GameCatalog};
pub use resolution::{Resolution, Resolved, Startup};
