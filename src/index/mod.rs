//! Hash index subsystem for gameshelf
//!
//! A persisted, fixed-size, separately chained hash table from record key to
//! the record's position in the store. It is a cache over the store and may
//! go stale; callers verify positions against the store and rebuild on any
//! mismatch.
//!
//! # Invariants
//!
//! - A key only ever lives in the bucket it hashes to
//! - Lookups return the first entry for a key in chain order
//! - Chains keep insertion order
//! - Every mutation rewrites the index file in full
//! - A rebuild always rescans the entire store

mod errors;
mod format;
mod hash;
mod stats;
mod table;

pub use errors::{IndexError, IndexErrorCode, IndexResult};
pub use format::{BucketRecord, EntryRecord, IndexFile};
pub use hash::bucket_of;
pub use stats::IndexStatistics;
pub use table::{HashIndex, IndexEntry, IndexLoad, DEFAULT_TABLE_SIZE};
