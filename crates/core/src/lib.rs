//! Shared primitives for all Rust crates in the Zuper connector.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Result type used across connector crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common connector error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client or connector could not be constructed from its configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Upstream API answered with a non-success status.
    #[error("upstream error (status {status}): {title}: {message}")]
    Upstream {
        /// HTTP status code returned by the upstream API.
        status: u16,
        /// Upstream error `type` field.
        kind: String,
        /// Upstream error `title` field.
        title: String,
        /// Upstream error `message` field, or the raw body when it did not parse.
        message: String,
    },

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller cancelled the operation.
    #[error("cancelled: {0}")]
    Cancelled(String),

    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// A continuation token could not be decoded.
    #[error("invalid page token: {0}")]
    InvalidPageToken(String),

    /// Network-level failure talking to the upstream API.
    #[error("transport error: {0}")]
    Transport(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns true when the error means the requested record does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Upstream { status: 404, .. })
    }

    /// Returns true when the error was produced by caller cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}
