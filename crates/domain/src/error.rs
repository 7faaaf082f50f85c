//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An access credential is empty or otherwise unusable.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// A username does not satisfy the marketplace naming rules.
    #[error("invalid username: {0}")]
    InvalidUsername(String),

    /// An email address is structurally invalid.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// A password is shorter than the required minimum.
    #[error("password must be at least {minimum} characters")]
    PasswordTooShort {
        /// The minimum accepted password length.
        minimum: usize,
    },

    /// A role string does not name a known marketplace role.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
