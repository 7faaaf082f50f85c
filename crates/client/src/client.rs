//! The marketplace client facade.

use std::sync::Arc;

use agora_application::{
    ApiTransport, AuthGateway, CategoriesApi, FavoritesApi, ListingsApi, MessagesApi, PhotosApi,
    SessionManager, SessionObserver,
};

use crate::builder::AgoraClientBuilder;
use crate::error::ClientError;

/// Fully wired marketplace client.
///
/// Owns the session store and exposes one API surface per backend
/// resource. All surfaces share a single transport, so a session
/// established through [`auth`](Self::auth) immediately authenticates
/// the other surfaces, and a rejected credential signs all of them
/// out at once.
pub struct AgoraClient {
    sessions: Arc<SessionManager>,
    auth: AuthGateway,
    listings: ListingsApi,
    categories: CategoriesApi,
    favorites: FavoritesApi,
    messages: MessagesApi,
    photos: PhotosApi,
}

impl AgoraClient {
    /// Starts configuring a client for the backend at `base_url`.
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> AgoraClientBuilder {
        AgoraClientBuilder::new(base_url)
    }

    /// Builds a client with default settings and restores any stored
    /// session.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] when the base URL does
    /// not parse, [`ClientError::Storage`] when no session storage
    /// location is available, and [`ClientError::Session`] when stored
    /// session data exists but cannot be read.
    pub async fn connect(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Self::builder(base_url).build()?;
        client.initialize().await?;
        Ok(client)
    }

    /// Restores the stored session, if any.
    ///
    /// Safe to call more than once; only the first call reads storage.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Session`] when storage cannot be read.
    /// The call may then be retried.
    pub async fn initialize(&self) -> Result<(), ClientError> {
        self.sessions.initialize().await.map_err(ClientError::from)
    }

    pub(crate) fn assemble(
        sessions: Arc<SessionManager>,
        transport: Arc<dyn ApiTransport>,
    ) -> Self {
        Self {
            auth: AuthGateway::new(transport.clone(), sessions.clone()),
            listings: ListingsApi::new(transport.clone()),
            categories: CategoriesApi::new(transport.clone()),
            favorites: FavoritesApi::new(transport.clone()),
            messages: MessagesApi::new(transport.clone()),
            photos: PhotosApi::new(transport),
            sessions,
        }
    }

    /// The shared session store.
    #[must_use]
    pub const fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Whether a session is currently held. The route-guard predicate:
    /// synchronous and side-effect free.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.sessions.is_authenticated()
    }

    /// Registers an observer for session lifecycle events.
    pub fn subscribe(&self, observer: Arc<dyn SessionObserver>) {
        self.sessions.subscribe(observer);
    }

    /// Registration, sign-in, sign-out and the current profile.
    #[must_use]
    pub const fn auth(&self) -> &AuthGateway {
        &self.auth
    }

    /// Browse, publish and manage listings.
    #[must_use]
    pub const fn listings(&self) -> &ListingsApi {
        &self.listings
    }

    /// Browse the category tree.
    #[must_use]
    pub const fn categories(&self) -> &CategoriesApi {
        &self.categories
    }

    /// Save and unsave listings.
    #[must_use]
    pub const fn favorites(&self) -> &FavoritesApi {
        &self.favorites
    }

    /// Conversations between buyers and sellers.
    #[must_use]
    pub const fn messages(&self) -> &MessagesApi {
        &self.messages
    }

    /// Upload and manage listing photos.
    #[must_use]
    pub const fn photos(&self) -> &PhotosApi {
        &self.photos
    }
}
