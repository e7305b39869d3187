//! Errors raised by the development tools.

use roster_core::error::RosterError;
use thiserror::Error;

/// Errors that can occur while loading data files.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    Io {
        /// Path to the file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a RON file.
    #[error("Failed to parse RON file '{path}': {source}")]
    Parse {
        /// Path to the file.
        path: String,
        /// Underlying parse error.
        #[source]
        source: ron::error::SpannedError,
    },

    /// Army book validation failed.
    #[error("Validation failed for army book '{book}': {errors:?}")]
    Validation {
        /// Army book that failed validation.
        book: String,
        /// List of validation errors.
        errors: Vec<String>,
    },

    /// Engine error (duplicate army book, malformed save record).
    #[error(transparent)]
    Roster(#[from] RosterError),
}

/// Result type for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;
