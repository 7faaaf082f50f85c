//! Credential cache for outgoing requests.
//!
//! The transport needs the current credential synchronously while the
//! session store is an async-guarded structure. The cache subscribes to
//! store events and mirrors the credential half of the session: a saved
//! session installs its credential, sign-out and invalidation remove it.

use std::sync::{PoisonError, RwLock};

use agora_application::{SessionEvent, SessionObserver};
use agora_domain::Credential;

/// Mirror of the session store's credential, readable without locking
/// the store.
#[derive(Debug, Default)]
pub struct CredentialCache {
    current: RwLock<Option<Credential>>,
}

impl CredentialCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached credential, if any.
    #[must_use]
    pub fn current(&self) -> Option<Credential> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn install(&self, credential: Credential) {
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(credential);
    }

    pub(crate) fn remove(&self) {
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl SessionObserver for CredentialCache {
    fn on_session_event(&self, event: &SessionEvent) {
        match event {
            SessionEvent::Saved(session) => self.install(session.credential().clone()),
            SessionEvent::Cleared | SessionEvent::Invalidated => self.remove(),
        }
    }
}
