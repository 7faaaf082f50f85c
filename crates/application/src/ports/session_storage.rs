//! Session storage port
//!
//! Defines the interface for keeping the signed-in session across
//! process restarts. The store persists two entries: the raw access
//! token and the serialized identity. They are always written and
//! removed together.

use async_trait::async_trait;

/// Errors that can occur while reading or writing stored sessions.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No usable storage location exists on this system.
    #[error("no storage directory available")]
    NoStorageDir,
}

/// What a storage adapter found on disk.
///
/// Entries are independent strings on purpose: a crashed process may
/// leave one half behind, and the session store treats any incomplete
/// pair as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredEntries {
    /// The raw access token, if present.
    pub credential: Option<String>,

    /// The serialized identity, if present.
    pub identity_json: Option<String>,
}

impl StoredEntries {
    /// Returns the pair when both halves are present.
    #[must_use]
    pub fn complete(self) -> Option<(String, String)> {
        match (self.credential, self.identity_json) {
            (Some(credential), Some(identity_json)) => Some((credential, identity_json)),
            _ => None,
        }
    }

    /// Returns true when nothing is stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.credential.is_none() && self.identity_json.is_none()
    }
}

/// Durable storage for the signed-in session.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Reads whatever is currently stored.
    ///
    /// Missing entries are reported as `None`, not as errors.
    ///
    /// # Errors
    /// Returns `StorageError::Io` when the entries exist but cannot be
    /// read.
    async fn read(&self) -> Result<StoredEntries, StorageError>;

    /// Writes both entries, replacing any previous pair.
    ///
    /// # Errors
    /// Returns an error when either entry cannot be written.
    async fn write(&self, credential: &str, identity_json: &str) -> Result<(), StorageError>;

    /// Removes both entries. Removing an absent pair is not an error.
    ///
    /// # Errors
    /// Returns `StorageError::Io` when an existing entry cannot be
    /// removed.
    async fn clear(&self) -> Result<(), StorageError>;
}
