//! Client construction errors.

use agora_application::{SessionError, StorageError};

/// Errors raised while building or starting a client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The backend base URL could not be parsed.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// No usable session storage location on this system.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The stored session could not be restored.
    #[error(transparent)]
    Session(#[from] SessionError),
}
