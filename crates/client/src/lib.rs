//! Agora Client - Marketplace client facade
//!
//! Assembles the session store, the HTTP transport and the per-resource
//! API surfaces into a single client. Sessions persist across process
//! restarts, credentials propagate to every surface through the session
//! store, and a credential the backend rejects signs the whole client
//! out.
//!
//! # Usage
//!
//! ```no_run
//! use agora_client::AgoraClient;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AgoraClient::connect("http://localhost:8000").await?;
//!
//! if !client.sessions().is_authenticated() {
//!     client.auth().login("ana", "correct horse battery").await?;
//! }
//! if let Some(profile) = client.sessions().current_identity() {
//!     println!("signed in as {}", profile.visible_name());
//! }
//! # Ok(())
//! # }
//! ```

mod builder;
mod client;
mod error;

pub use builder::AgoraClientBuilder;
pub use client::AgoraClient;
pub use error::ClientError;

pub use agora_application::{
    ApiError, AuthGateway, CategoriesApi, FavoritesApi, ListingsApi, MessagesApi, Navigator,
    PhotosApi, SessionError, SessionEvent, SessionManager, SessionObserver, SessionStorage,
    StorageError,
};
pub use agora_domain::{
    Category, Condition, Conversation, Credential, DomainError, Favorite, Listing, ListingBrief,
    ListingDraft, ListingFilter, ListingPatch, ListingStatus, Message, OutgoingMessage, Photo,
    Registration, Role, Session, SortOrder, UploadedPhoto, UserBrief, UserProfile,
};
pub use agora_infrastructure::FileSessionStorage;
