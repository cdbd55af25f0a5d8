//! Error types for data loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading input tables.
#[derive(Debug, Error)]
pub enum DataError {
    /// Input file could not be opened
    #[error("Failed to open {path}: {source}")]
    Open {
        /// File being opened
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// CSV decoding error without file context
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// CSV decoding error while reading a named input file
    #[error("Failed to read {path}: {source}")]
    Read {
        /// File being read
        path: PathBuf,
        /// Underlying CSV error
        source: csv::Error,
    },

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),
}
