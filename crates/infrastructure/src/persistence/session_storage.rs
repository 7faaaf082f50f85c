//! File-backed session persistence.
//!
//! Stores the two halves of a session as sibling files in one
//! directory: the raw access token and the identity profile as JSON.
//! Reads treat missing files as absent entries rather than errors, so
//! a fresh installation and a signed-out one look the same.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

use agora_application::{SessionStorage, StorageError, StoredEntries};

const CREDENTIAL_FILE: &str = "access_token";
const IDENTITY_FILE: &str = "user.json";

/// Session storage backed by two files in a private directory.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    dir: PathBuf,
}

impl FileSessionStorage {
    /// Creates a storage rooted at `dir`.
    ///
    /// The directory is created on the first write, not here.
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Creates a storage under the platform configuration directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NoStorageDir`] when the platform
    /// exposes no configuration directory.
    pub fn in_config_dir() -> Result<Self, StorageError> {
        default_dir()
            .map(Self::new)
            .ok_or(StorageError::NoStorageDir)
    }

    /// The directory the session files live in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn credential_path(&self) -> PathBuf {
        self.dir.join(CREDENTIAL_FILE)
    }

    fn identity_path(&self) -> PathBuf {
        self.dir.join(IDENTITY_FILE)
    }
}

/// Platform configuration directory for stored sessions.
#[must_use]
pub fn default_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("agora"))
}

async fn read_optional(path: &Path) -> Result<Option<String>, StorageError> {
    match fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StorageError::Io(e)),
    }
}

async fn remove_if_present(path: &Path) -> Result<(), StorageError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StorageError::Io(e)),
    }
}

#[async_trait::async_trait]
impl SessionStorage for FileSessionStorage {
    async fn read(&self) -> Result<StoredEntries, StorageError> {
        let credential = read_optional(&self.credential_path()).await?;
        let identity_json = read_optional(&self.identity_path()).await?;
        Ok(StoredEntries {
            credential,
            identity_json,
        })
    }

    async fn write(&self, credential: &str, identity_json: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).await?;
        fs::write(self.credential_path(), credential).await?;
        fs::write(self.identity_path(), identity_json).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        remove_if_present(&self.credential_path()).await?;
        remove_if_present(&self.identity_path()).await
    }
}
