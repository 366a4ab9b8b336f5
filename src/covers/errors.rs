//! # Cover Store Errors

use thiserror::Error;

/// Result type for cover operations
pub type CoverResult<T> = Result<T, CoverError>;

/// Cover store errors
#[derive(Debug, Clone, Error)]
pub enum CoverError {
    #[error("I/O error: {0}")]
    IoError(String),
}

impl CoverError {
    /// Stable error code for responses
    pub fn code(&self) -> &'static str {
        match self {
            CoverError::IoError(_) => "SHELF_COVER_IO_ERROR",
        }
    }
}
