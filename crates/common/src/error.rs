//! Error types

use thiserror::Error;

/// Main error type for Review Pulse
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid date range: {0}")]
    InvalidRange(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
