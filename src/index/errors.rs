//! Index error types
//!
//! Error codes:
//! - SHELF_INDEX_INVALID_KEY (ERROR)
//! - SHELF_INDEX_INVALID_CONFIG (ERROR)
//! - SHELF_INDEX_PERSIST_FAILED (ERROR)
//! - SHELF_INDEX_READ_FAILED (ERROR)
//! - SHELF_INDEX_BUILD_FAILED (ERROR)
//!
//! A corrupt index file has no code; loading resets to an empty table.

use std::fmt;
use std::io;

/// Severity levels for index errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The operation fails, the process continues
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Index-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexErrorCode {
    /// Empty key passed to insert
    ShelfIndexInvalidKey,
    /// Table size of zero
    ShelfIndexInvalidConfig,
    /// Index file could not be written
    ShelfIndexPersistFailed,
    /// Index file exists but could not be read from disk
    ShelfIndexReadFailed,
    /// Rebuild could not read the record store
    ShelfIndexBuildFailed,
}

impl IndexErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            IndexErrorCode::ShelfIndexInvalidKey => "SHELF_INDEX_INVALID_KEY",
            IndexErrorCode::ShelfIndexInvalidConfig => "SHELF_INDEX_INVALID_CONFIG",
            IndexErrorCode::ShelfIndexPersistFailed => "SHELF_INDEX_PERSIST_FAILED",
            IndexErrorCode::ShelfIndexReadFailed => "SHELF_INDEX_READ_FAILED",
            IndexErrorCode::ShelfIndexBuildFailed => "SHELF_INDEX_BUILD_FAILED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for IndexErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Index error type with full context
#[derive(Debug)]
pub struct IndexError {
    /// Error code
    code: IndexErrorCode,
    /// Human-readable message
    message: String,
    /// Underlying IO error if applicable
    source: Option<io::Error>,
}

impl IndexError {
    /// Create an invalid key error
    pub fn invalid_key(reason: impl Into<String>) -> Self {
        Self {
            code: IndexErrorCode::ShelfIndexInvalidKey,
            message: reason.into(),
            source: None,
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self {
            code: IndexErrorCode::ShelfIndexInvalidConfig,
            message: reason.into(),
            source: None,
        }
    }

    /// Create a persistence failure error
    pub fn persist_failed(reason: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: IndexErrorCode::ShelfIndexPersistFailed,
            message: reason.into(),
            source: Some(source),
        }
    }

    /// Create a persistence failure that did not originate in the OS
    pub fn persist_failed_no_source(reason: impl Into<String>) -> Self {
        Self {
            code: IndexErrorCode::ShelfIndexPersistFailed,
            message: reason.into(),
            source: None,
        }
    }

    /// Create a read failure error
    pub fn read_failed(reason: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: IndexErrorCode::ShelfIndexReadFailed,
            message: reason.into(),
            source: Some(source),
        }
    }

    /// Create an index build failed error
    pub fn build_failed(reason: impl Into<String>) -> Self {
        Self {
            code: IndexErrorCode::ShelfIndexBuildFailed,
            message: reason.into(),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> IndexErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for IndexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;
