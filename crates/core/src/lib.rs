//! Shared primitives for all Rust crates in storesync.

#![forbid(unsafe_code)]

/// Client group labels shared across crates.
pub mod group;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use group::{GroupLabel, UNASSIGNED_GROUP};

/// Result type used across storesync crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Backend could not be reached.
    #[error("transport error: {0}")]
    Transport(String),

    /// Backend did not answer within the maximum wait.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Backend answered a request with a non-success status.
    #[error("{message}")]
    Rejected {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Best available human-readable message.
        message: String,
    },

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns whether the error means the backend was never heard from.
    #[must_use]
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }
}
