//! Record storage subsystem for gameshelf
//!
//! The inventory file is the source of truth. The hash index only caches
//! positions into it and is rebuilt from it whenever the two disagree.
//!
//! # Position contract
//!
//! - `append` returns the length before the append
//! - `swap_remove_last(p)` moves the last record into `p`, then pops
//! - every mutation is a whole-file rewrite

mod errors;
mod game;
mod store;

pub use errors::{Severity, StorageError, StorageErrorCode, StorageResult};
pub use game::{Game, NewGame, ValidationError, DATE_FORMAT};
pub use store::{JsonFileStore, Keyed, RecordStore, SwapRemoval};

pub(crate) use store::to_pretty_json;
