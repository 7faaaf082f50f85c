//! Application error types
//!
//! [`ApiError`] classifies everything that can go wrong while talking
//! to the backend; [`SessionError`] covers the local session store.

use thiserror::Error;

use crate::ports::StorageError;

/// Errors surfaced by marketplace API operations.
///
/// Transport adapters map HTTP failures onto this taxonomy so callers
/// can branch on the kind of failure without inspecting status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed: connection refused, DNS failure,
    /// timeout or a dropped connection.
    #[error("network error: {0}")]
    Network(String),

    /// A request URL could not be constructed.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// A request body could not be encoded.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// The backend rejected the credential or the sign-in attempt (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The requested entity does not exist (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The backend rejected the request as invalid (other 4xx).
    #[error("request rejected ({status}): {message}")]
    Validation {
        /// HTTP status code of the rejection.
        status: u16,
        /// Human-readable reason extracted from the response body.
        message: String,
    },

    /// The backend failed to process the request (5xx).
    #[error("backend error ({status}): {message}")]
    Backend {
        /// HTTP status code of the failure.
        status: u16,
        /// Human-readable reason extracted from the response body.
        message: String,
    },

    /// A response arrived but its body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The operation succeeded on the wire but the resulting session
    /// could not be persisted locally.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Classifies a non-success HTTP status with its extracted message.
    #[must_use]
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => Self::Unauthorized(message),
            404 => Self::NotFound(message),
            400..=499 => Self::Validation { status, message },
            _ => Self::Backend { status, message },
        }
    }

    /// Returns true when the backend rejected the credential.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Returns true when the failure happened before any response
    /// arrived, so reads may be retried safely.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Errors surfaced by the local session store.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Durable storage failed underneath the store.
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),

    /// The identity could not be encoded for storage.
    #[error("failed to encode identity: {0}")]
    Serialize(String),
}
