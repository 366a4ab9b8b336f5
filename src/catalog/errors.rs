//! # Catalog Errors

use std::io;

use thiserror::Error;

use crate::covers::CoverError;
use crate::index::IndexError;
use crate::storage::{StorageError, ValidationError};

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog errors
///
/// A stale or corrupt index is never one of these; the catalog repairs it.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Cover(#[from] CoverError),

    #[error("Invalid record: {0}")]
    Validation(#[from] ValidationError),

    #[error("Record already exists: {0}")]
    Duplicate(String),

    #[error("Key appears more than once in the new dataset: {0}")]
    DuplicateInDataset(String),

    #[error("Cover store not configured")]
    CoversUnavailable,

    #[error("Invalid import file {path}: {reason}")]
    InvalidImport { path: String, reason: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl CatalogError {
    /// Stable error code for responses
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::Index(e) => e.code().code(),
            CatalogError::Storage(e) => e.code().code(),
            CatalogError::Cover(e) => e.code(),
            CatalogError::Validation(_) => "SHELF_VALIDATION_FAILED",
            CatalogError::Duplicate(_) => "SHELF_DUPLICATE_KEY",
            CatalogError::DuplicateInDataset(_) => "SHELF_DUPLICATE_KEY",
            CatalogError::CoversUnavailable => "SHELF_COVERS_UNAVAILABLE",
            CatalogError::InvalidImport { .. } => "SHELF_INVALID_IMPORT",
            CatalogError::Io { .. } => "SHELF_IO_ERROR",
        }
    }
}
