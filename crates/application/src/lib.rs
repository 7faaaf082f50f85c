//! Agora Application - Session and API orchestration
//!
//! This crate owns the client-side session lifecycle and the typed
//! wrappers around the marketplace API. It talks to the outside world
//! only through the ports defined in [`ports`]; adapters live in the
//! infrastructure layer.

pub mod api;
pub mod auth;
pub mod error;
pub mod ports;
pub mod session;

pub use api::{CategoriesApi, FavoritesApi, ListingsApi, MessagesApi, PhotosApi};
pub use auth::AuthGateway;
pub use error::{ApiError, SessionError};
pub use ports::{
    ApiRequest, ApiResponse, ApiTransport, HttpMethod, MultipartFile, Navigator, RequestBody,
    SessionStorage, StorageError, StoredEntries,
};
pub use session::{
    LoginRedirector, SessionEvent, SessionManager, SessionObserver, WriteTicket,
};
