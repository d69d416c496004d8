//! Error handling for cohort-flow.

use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use thiserror::Error;

/// Specialized error type for encounter loading, classification and reporting
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid query parameters (inverted range, unknown level, metric or dimension value)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed encounter input
    #[error("Data error at row {row}: {message}")]
    Data {
        /// Index of the offending record in loader order
        row: usize,
        /// What is wrong with the record
        message: String,
    },

    /// A required column is missing or has an unusable type
    #[error("Schema error: {0}")]
    Schema(String),

    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error in an Arrow compute kernel
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// A blocking load task failed to complete
    #[error("Task error: {0}")]
    Task(String),
}

impl Error {
    /// Shorthand for a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Shorthand for a data error at a given row
    pub fn data(row: usize, message: impl Into<String>) -> Self {
        Self::Data {
            row,
            message: message.into(),
        }
    }

    /// Whether this error was caused by invalid query parameters
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether this error was caused by malformed input records
    #[must_use]
    pub const fn is_data(&self) -> bool {
        matches!(self, Self::Data { .. })
    }
}

/// Result type for cohort-flow operations
pub type Result<T> = std::result::Result<T, Error>;
