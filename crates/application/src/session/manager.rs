//! The session store.
//!
//! Holds the signed-in session in memory, mirrors it to durable
//! storage and tells observers whenever it changes. Memory and storage
//! are only ever written together, so a restart restores exactly what
//! the last completed operation left behind.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::Mutex;

use agora_domain::{Credential, Session, UserProfile};

use crate::error::SessionError;
use crate::ports::SessionStorage;

/// A change to the session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A session was installed or its identity refreshed.
    Saved(Session),
    /// The user signed out.
    Cleared,
    /// The backend rejected the credential and the session was torn
    /// down.
    Invalidated,
}

/// Receives session store changes.
///
/// Observers are called synchronously after each completed change, in
/// subscription order. They must not call back into the store.
pub trait SessionObserver: Send + Sync {
    /// Called after the store changed.
    fn on_session_event(&self, event: &SessionEvent);
}

/// Proof that a sign-in attempt started against the current store
/// generation.
///
/// Obtained from [`SessionManager::begin_write`] before the network
/// call; any commit presenting a ticket that has since been superseded
/// by a later attempt, a sign-out or an invalidation is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteTicket(u64);

#[derive(Debug, Default)]
struct StoreState {
    session: Option<Session>,
    generation: u64,
}

/// Thread-safe session store with durable persistence.
///
/// Reads are synchronous and lock-free apart from a short critical
/// section; writes serialize on an internal async lock so memory,
/// storage and observers always see changes in the same order.
pub struct SessionManager {
    state: RwLock<StoreState>,
    write_guard: Mutex<()>,
    observers: RwLock<Vec<Arc<dyn SessionObserver>>>,
    storage: Arc<dyn SessionStorage>,
    hydrated: AtomicBool,
}

impl SessionManager {
    /// Creates a store backed by the given storage adapter.
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            write_guard: Mutex::new(()),
            observers: RwLock::new(Vec::new()),
            storage,
            hydrated: AtomicBool::new(false),
        }
    }

    /// Restores the session persisted by a previous run, if any.
    ///
    /// Runs at most once per store; later calls return immediately.
    /// A corrupt or half-written stored pair is discarded and the
    /// store comes up signed out. Observers see a
    /// [`SessionEvent::Saved`] when a session was restored.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] when storage cannot be read
    /// at all; the store stays unhydrated so a retry is possible.
    pub async fn initialize(&self) -> Result<(), SessionError> {
        if self
            .hydrated
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(());
        }
        let _guard = self.write_guard.lock().await;

        let entries = match self.storage.read().await {
            Ok(entries) => entries,
            Err(error) => {
                self.hydrated.store(false, Ordering::SeqCst);
                return Err(error.into());
            }
        };

        if entries.is_empty() {
            tracing::debug!("no stored session found");
            return Ok(());
        }
        let Some((token, identity_json)) = entries.complete() else {
            tracing::warn!("incomplete stored session; discarding it");
            self.discard_stored().await;
            return Ok(());
        };

        let identity: UserProfile = match serde_json::from_str(&identity_json) {
            Ok(identity) => identity,
            Err(error) => {
                tracing::warn!(%error, "stored identity is unreadable; discarding the session");
                self.discard_stored().await;
                return Ok(());
            }
        };
        let credential = match Credential::new(token) {
            Ok(credential) => credential,
            Err(error) => {
                tracing::warn!(%error, "stored credential is unusable; discarding the session");
                self.discard_stored().await;
                return Ok(());
            }
        };

        let session = Session::new(credential, identity);
        tracing::info!(username = %session.identity().username, "session restored from storage");
        self.state_mut().session = Some(session.clone());
        self.notify(&SessionEvent::Saved(session));
        Ok(())
    }

    /// Starts a session write attempt and returns its ticket.
    ///
    /// Call this before the network round-trip of a sign-in or
    /// registration. Issuing a new ticket supersedes all earlier ones.
    pub fn begin_write(&self) -> WriteTicket {
        let mut state = self.state_mut();
        state.generation += 1;
        WriteTicket(state.generation)
    }

    /// Installs a session if the ticket is still current.
    ///
    /// Returns `Ok(true)` when the session was applied and `Ok(false)`
    /// when the attempt was superseded and the response discarded.
    /// Storage is written before memory, so a failure leaves the
    /// previous state intact.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the identity cannot be encoded or
    /// storage cannot be written.
    pub async fn save(&self, ticket: WriteTicket, session: Session) -> Result<bool, SessionError> {
        let _guard = self.write_guard.lock().await;
        if !self.ticket_current(ticket) {
            tracing::debug!("discarding session write from a superseded attempt");
            return Ok(false);
        }

        let identity_json = serde_json::to_string(session.identity())
            .map_err(|e| SessionError::Serialize(e.to_string()))?;
        self.storage
            .write(session.credential().as_str(), &identity_json)
            .await?;

        tracing::info!(username = %session.identity().username, "session saved");
        self.state_mut().session = Some(session.clone());
        self.notify(&SessionEvent::Saved(session));
        Ok(true)
    }

    /// Replaces the identity of the current session, keeping its
    /// credential.
    ///
    /// `expected` is the credential the refreshed identity was fetched
    /// with. When the store no longer holds that credential, because
    /// the user signed out or signed in again while the refresh was in
    /// flight, the stale identity is discarded and `Ok(false)` is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the identity cannot be encoded or
    /// storage cannot be written.
    pub async fn refresh_identity(
        &self,
        expected: &Credential,
        identity: UserProfile,
    ) -> Result<bool, SessionError> {
        let _guard = self.write_guard.lock().await;
        let Some(current) = self.current() else {
            tracing::debug!("no session to refresh");
            return Ok(false);
        };
        if current.credential() != expected {
            tracing::debug!("session changed while the refresh was in flight; discarding it");
            return Ok(false);
        }

        let session = current.with_identity(identity);
        let identity_json = serde_json::to_string(session.identity())
            .map_err(|e| SessionError::Serialize(e.to_string()))?;
        self.storage
            .write(session.credential().as_str(), &identity_json)
            .await?;

        self.state_mut().session = Some(session.clone());
        self.notify(&SessionEvent::Saved(session));
        Ok(true)
    }

    /// Signs out: removes the session from storage and memory.
    ///
    /// Entirely local, no network traffic. Outstanding write tickets
    /// are superseded first so a late sign-in response cannot
    /// resurrect the session. Observers see [`SessionEvent::Cleared`].
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] when the stored entries could
    /// not be removed; the in-memory session is left in place so
    /// memory and storage stay in step.
    pub async fn clear(&self) -> Result<(), SessionError> {
        let _guard = self.write_guard.lock().await;
        self.state_mut().generation += 1;
        self.storage.clear().await?;
        self.state_mut().session = None;
        self.notify(&SessionEvent::Cleared);
        tracing::info!("session cleared");
        Ok(())
    }

    /// Tears the session down after the backend rejected its
    /// credential.
    ///
    /// Like [`clear`](Self::clear) but emits
    /// [`SessionEvent::Invalidated`], and the in-memory session is
    /// removed even when storage fails: a rejected credential must
    /// never be replayed. Does nothing when already signed out, so
    /// racing rejections tear down only once.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] when the stored entries could
    /// not be removed.
    pub async fn invalidate(&self) -> Result<(), SessionError> {
        let _guard = self.write_guard.lock().await;
        if self.state().session.is_none() {
            return Ok(());
        }
        self.state_mut().generation += 1;
        let storage_result = self.storage.clear().await;
        self.state_mut().session = None;
        self.notify(&SessionEvent::Invalidated);
        tracing::warn!("session invalidated after credential rejection");
        storage_result.map_err(Into::into)
    }

    /// Registers an observer for session changes.
    pub fn subscribe(&self, observer: Arc<dyn SessionObserver>) {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    /// Returns the current session, if signed in.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.state().session.clone()
    }

    /// Returns the identity of the current session, if signed in.
    #[must_use]
    pub fn current_identity(&self) -> Option<UserProfile> {
        self.state()
            .session
            .as_ref()
            .map(|session| session.identity().clone())
    }

    /// Returns the credential of the current session, if signed in.
    #[must_use]
    pub fn current_credential(&self) -> Option<Credential> {
        self.state()
            .session
            .as_ref()
            .map(|session| session.credential().clone())
    }

    /// Returns true while a session is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state().session.is_some()
    }

    fn ticket_current(&self, ticket: WriteTicket) -> bool {
        self.state().generation == ticket.0
    }

    async fn discard_stored(&self) {
        if let Err(error) = self.storage.clear().await {
            tracing::warn!(%error, "failed to remove unreadable session entries");
        }
    }

    fn notify(&self, event: &SessionEvent) {
        let observers = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in &observers {
            observer.on_session_event(event);
        }
    }

    fn state(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use agora_domain::{Role, UserProfile};

    use crate::ports::{StorageError, StoredEntries};

    use super::*;

    #[derive(Default)]
    struct MemoryStorage {
        entries: StdMutex<StoredEntries>,
        reads: AtomicUsize,
        writes: AtomicUsize,
    }

    impl MemoryStorage {
        fn seeded(credential: &str, identity_json: &str) -> Self {
            Self {
                entries: StdMutex::new(StoredEntries {
                    credential: Some(credential.to_string()),
                    identity_json: Some(identity_json.to_string()),
                }),
                ..Self::default()
            }
        }

        fn stored(&self) -> StoredEntries {
            self.entries.lock().unwrap().clone()
        }

        fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SessionStorage for MemoryStorage {
        async fn read(&self) -> Result<StoredEntries, StorageError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.stored())
        }

        async fn write(&self, credential: &str, identity_json: &str) -> Result<(), StorageError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            *self.entries.lock().unwrap() = StoredEntries {
                credential: Some(credential.to_string()),
                identity_json: Some(identity_json.to_string()),
            };
            Ok(())
        }

        async fn clear(&self) -> Result<(), StorageError> {
            *self.entries.lock().unwrap() = StoredEntries::default();
            Ok(())
        }
    }

    struct FailingStorage;

    #[async_trait]
    impl SessionStorage for FailingStorage {
        async fn read(&self) -> Result<StoredEntries, StorageError> {
            Err(StorageError::Io(std::io::Error::other("disk on fire")))
        }

        async fn write(&self, _: &str, _: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("disk on fire")))
        }

        async fn clear(&self) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("disk on fire")))
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: StdMutex<Vec<SessionEvent>>,
    }

    impl Recorder {
        fn events(&self) -> Vec<SessionEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl SessionObserver for Recorder {
        fn on_session_event(&self, event: &SessionEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    fn profile(username: &str) -> UserProfile {
        UserProfile {
            user_id: 1,
            username: username.to_string(),
            email: format!("{username}@example.edu"),
            display_name: None,
            role: Role::Buyer,
            created_at: Utc::now(),
        }
    }

    fn session(token: &str, username: &str) -> Session {
        Session::new(Credential::new(token).unwrap(), profile(username))
    }

    #[tokio::test]
    async fn save_installs_and_persists_the_pair() {
        let storage = Arc::new(MemoryStorage::default());
        let manager = SessionManager::new(storage.clone());
        let recorder = Arc::new(Recorder::default());
        manager.subscribe(recorder.clone());

        let ticket = manager.begin_write();
        let applied = manager.save(ticket, session("tok-1", "ana")).await.unwrap();

        assert!(applied);
        assert!(manager.is_authenticated());
        assert_eq!(manager.current_credential().unwrap().as_str(), "tok-1");
        assert_eq!(manager.current_identity().unwrap().username, "ana");

        let stored = storage.stored();
        assert_eq!(stored.credential.as_deref(), Some("tok-1"));
        assert!(stored.identity_json.unwrap().contains("\"ana\""));
        assert_eq!(recorder.events().len(), 1);
        assert!(matches!(recorder.events()[0], SessionEvent::Saved(_)));
    }

    #[tokio::test]
    async fn superseded_attempt_is_discarded() {
        let storage = Arc::new(MemoryStorage::default());
        let manager = SessionManager::new(storage.clone());

        let first = manager.begin_write();
        let second = manager.begin_write();

        let applied = manager
            .save(second, session("tok-2", "bea"))
            .await
            .unwrap();
        assert!(applied);

        let applied = manager
            .save(first, session("tok-1", "ana"))
            .await
            .unwrap();
        assert!(!applied, "late response of the earlier attempt must lose");

        assert_eq!(manager.current_identity().unwrap().username, "bea");
        assert_eq!(storage.stored().credential.as_deref(), Some("tok-2"));
        assert_eq!(storage.write_count(), 1);
    }

    #[tokio::test]
    async fn sign_out_supersedes_an_in_flight_attempt() {
        let storage = Arc::new(MemoryStorage::default());
        let manager = SessionManager::new(storage.clone());

        let ticket = manager.begin_write();
        manager.clear().await.unwrap();

        let applied = manager.save(ticket, session("tok-1", "ana")).await.unwrap();
        assert!(!applied);
        assert!(!manager.is_authenticated());
        assert!(storage.stored().is_empty());
    }

    #[tokio::test]
    async fn clear_removes_both_halves_and_notifies() {
        let storage = Arc::new(MemoryStorage::default());
        let manager = SessionManager::new(storage.clone());
        let recorder = Arc::new(Recorder::default());
        manager.subscribe(recorder.clone());

        let ticket = manager.begin_write();
        manager.save(ticket, session("tok-1", "ana")).await.unwrap();
        manager.clear().await.unwrap();

        assert!(!manager.is_authenticated());
        assert!(manager.current().is_none());
        assert!(storage.stored().is_empty());
        assert_eq!(
            recorder.events().last(),
            Some(&SessionEvent::Cleared)
        );
    }

    #[tokio::test]
    async fn racing_invalidations_tear_down_once() {
        let storage = Arc::new(MemoryStorage::default());
        let manager = SessionManager::new(storage);
        let recorder = Arc::new(Recorder::default());
        manager.subscribe(recorder.clone());

        let ticket = manager.begin_write();
        manager.save(ticket, session("tok-1", "ana")).await.unwrap();
        manager.invalidate().await.unwrap();
        manager.invalidate().await.unwrap();

        let invalidations = recorder
            .events()
            .iter()
            .filter(|event| matches!(event, SessionEvent::Invalidated))
            .count();
        assert_eq!(invalidations, 1);
        assert!(!manager.is_authenticated());
    }

    #[tokio::test]
    async fn initialize_restores_a_stored_session() {
        let identity_json = serde_json::to_string(&profile("ana")).unwrap();
        let storage = Arc::new(MemoryStorage::seeded("tok-1", &identity_json));
        let manager = SessionManager::new(storage);
        let recorder = Arc::new(Recorder::default());
        manager.subscribe(recorder.clone());

        manager.initialize().await.unwrap();

        assert!(manager.is_authenticated());
        assert_eq!(manager.current_credential().unwrap().as_str(), "tok-1");
        assert!(matches!(recorder.events()[0], SessionEvent::Saved(_)));
    }

    #[tokio::test]
    async fn initialize_discards_corrupt_identity() {
        let storage = Arc::new(MemoryStorage::seeded("tok-1", "{not json"));
        let manager = SessionManager::new(storage.clone());

        manager.initialize().await.unwrap();

        assert!(!manager.is_authenticated());
        assert!(storage.stored().is_empty(), "corrupt pair must be removed");
    }

    #[tokio::test]
    async fn initialize_treats_half_a_pair_as_absent() {
        let storage = Arc::new(MemoryStorage {
            entries: StdMutex::new(StoredEntries {
                credential: Some("tok-1".to_string()),
                identity_json: None,
            }),
            ..MemoryStorage::default()
        });
        let manager = SessionManager::new(storage.clone());

        manager.initialize().await.unwrap();

        assert!(!manager.is_authenticated());
        assert!(storage.stored().is_empty());
    }

    #[tokio::test]
    async fn initialize_runs_at_most_once() {
        let identity_json = serde_json::to_string(&profile("ana")).unwrap();
        let storage = Arc::new(MemoryStorage::seeded("tok-1", &identity_json));
        let manager = SessionManager::new(storage.clone());

        manager.initialize().await.unwrap();
        manager.initialize().await.unwrap();

        assert_eq!(storage.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn initialize_can_be_retried_after_a_read_failure() {
        let manager = SessionManager::new(Arc::new(FailingStorage));

        assert!(manager.initialize().await.is_err());
        // the store stays unhydrated, so the retry hits storage again
        assert!(manager.initialize().await.is_err());
    }

    #[tokio::test]
    async fn refresh_identity_keeps_the_credential() {
        let storage = Arc::new(MemoryStorage::default());
        let manager = SessionManager::new(storage.clone());

        let ticket = manager.begin_write();
        manager.save(ticket, session("tok-1", "ana")).await.unwrap();

        let mut updated = profile("ana");
        updated.display_name = Some("Ana P.".to_string());
        let credential = Credential::new("tok-1").unwrap();
        let applied = manager.refresh_identity(&credential, updated).await.unwrap();

        assert!(applied);
        assert_eq!(manager.current_credential().unwrap().as_str(), "tok-1");
        assert_eq!(
            manager.current_identity().unwrap().display_name.as_deref(),
            Some("Ana P.")
        );
        assert!(
            storage
                .stored()
                .identity_json
                .unwrap()
                .contains("Ana P.")
        );
    }

    #[tokio::test]
    async fn refresh_without_a_session_is_skipped() {
        let manager = SessionManager::new(Arc::new(MemoryStorage::default()));
        let credential = Credential::new("tok-1").unwrap();
        let applied = manager
            .refresh_identity(&credential, profile("ana"))
            .await
            .unwrap();
        assert!(!applied);
    }

    #[tokio::test]
    async fn refresh_after_a_credential_change_is_discarded() {
        let storage = Arc::new(MemoryStorage::default());
        let manager = SessionManager::new(storage);

        let ticket = manager.begin_write();
        manager.save(ticket, session("tok-1", "ana")).await.unwrap();
        // user signed in again while the refresh was in flight
        let ticket = manager.begin_write();
        manager.save(ticket, session("tok-2", "bea")).await.unwrap();

        let stale = Credential::new("tok-1").unwrap();
        let applied = manager.refresh_identity(&stale, profile("ana")).await.unwrap();

        assert!(!applied);
        assert_eq!(manager.current_identity().unwrap().username, "bea");
    }

    #[tokio::test]
    async fn failed_persistence_leaves_the_store_signed_out() {
        let manager = SessionManager::new(Arc::new(FailingStorage));
        let ticket = manager.begin_write();

        let result = manager.save(ticket, session("tok-1", "ana")).await;

        assert!(result.is_err());
        assert!(!manager.is_authenticated(), "memory must not run ahead of storage");
    }
}
