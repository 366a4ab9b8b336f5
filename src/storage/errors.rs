//! Storage error types
//!
//! Error codes:
//! - SHELF_STORAGE_IO_ERROR (ERROR severity)
//! - SHELF_STORAGE_WRITE_FAILED (ERROR severity)
//! - SHELF_STORAGE_READ_FAILED (ERROR severity)
//! - SHELF_DATA_CORRUPTION (FATAL severity)
//! - SHELF_STORAGE_OUT_OF_RANGE (ERROR severity)

use std::fmt;
use std::io;

/// Severity levels for storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, process continues
    Error,
    /// The inventory file cannot be trusted; nothing may be written over it
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Storage-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Disk I/O failure while preparing the store
    ShelfStorageIoError,
    /// Inventory rewrite failed
    ShelfStorageWriteFailed,
    /// Inventory read failed
    ShelfStorageReadFailed,
    /// Inventory file is not a JSON array of records
    ShelfDataCorruption,
    /// Position past the end of the inventory
    ShelfStorageOutOfRange,
}

impl StorageErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::ShelfStorageIoError => "SHELF_STORAGE_IO_ERROR",
            StorageErrorCode::ShelfStorageWriteFailed => "SHELF_STORAGE_WRITE_FAILED",
            StorageErrorCode::ShelfStorageReadFailed => "SHELF_STORAGE_READ_FAILED",
            StorageErrorCode::ShelfDataCorruption => "SHELF_DATA_CORRUPTION",
            StorageErrorCode::ShelfStorageOutOfRange => "SHELF_STORAGE_OUT_OF_RANGE",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StorageErrorCode::ShelfDataCorruption => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Storage error type with full context
#[derive(Debug)]
pub struct StorageError {
    /// Error code
    code: StorageErrorCode,
    /// Human-readable message
    message: String,
    /// Optional details about the error context
    details: Option<String>,
    /// Underlying IO error if applicable
    source: Option<io::Error>,
}

impl StorageError {
    /// Create a new storage I/O error
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::ShelfStorageIoError,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a new storage write failed error
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::ShelfStorageWriteFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a storage write failed error without IO source
    pub fn write_failed_no_source(message: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::ShelfStorageWriteFailed,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Create a new storage read failed error
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::ShelfStorageReadFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a data corruption error naming the file
    pub fn data_corruption(path: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::ShelfDataCorruption,
            message: reason.into(),
            details: Some(format!("file: {}", path)),
            source: None,
        }
    }

    /// Create an out-of-range error
    pub fn out_of_range(position: usize, len: usize) -> Self {
        Self {
            code: StorageErrorCode::ShelfStorageOutOfRange,
            message: format!("position {} past end of inventory", position),
            details: Some(format!("len: {}", len)),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StorageErrorCode {
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

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns whether this error is fatal
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
