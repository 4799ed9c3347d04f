//! Error types for cloudstream

use std::collections::TryReserveError;
use thiserror::Error;

/// Main error type for cloudstream operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("Visualization error: {0}")]
    Visualization(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for cloudstream operations
pub type Result<T> = std::result::Result<T, Error>;
