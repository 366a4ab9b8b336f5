//! # Cover Images
//!
//! Content-addressed storage for cover images. A cover is saved under the
//! SHA-256 of its bytes, so uploading the same image twice stores it once.

mod errors;
mod store;

pub use errors::{CoverError, CoverResult};
pub use store::{CoverStore, DEFAULT_COVERS_DIR};
