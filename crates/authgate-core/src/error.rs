//! Core error types.

use thiserror::Error;

/// Core authentication errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage layer error.
    #[error("store error: {0}")]
    Store(#[from] sled::Error),

    /// A bounded store operation did not complete in time.
    #[error("store operation timed out")]
    Timeout,

    /// Token signing or verification error.
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// A stored value was not valid UTF-8.
    #[error("invalid stored value for key {0:?}")]
    InvalidValue(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
