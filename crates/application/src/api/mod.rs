//! Typed wrappers over the marketplace API.
//!
//! One wrapper per backend resource. Each wrapper builds requests for
//! its endpoints and decodes the responses into domain types; transport
//! concerns, including credentials, stay behind the
//! [`ApiTransport`](crate::ports::ApiTransport) port.

mod categories;
mod favorites;
mod listings;
mod messages;
mod photos;

pub use categories::CategoriesApi;
pub use favorites::FavoritesApi;
pub use listings::ListingsApi;
pub use messages::MessagesApi;
pub use photos::PhotosApi;
