//! Favorite management.

use std::sync::Arc;

use serde::Deserialize;

use agora_domain::{Favorite, ListingId};

use crate::error::ApiError;
use crate::ports::{ApiRequest, ApiTransport};

#[derive(Debug, Deserialize)]
struct FavoriteFlag {
    is_favorite: bool,
}

/// Typed access to the favorite endpoints.
///
/// All of them require a signed-in session.
pub struct FavoritesApi {
    transport: Arc<dyn ApiTransport>,
}

impl FavoritesApi {
    /// Creates the wrapper over a transport.
    #[must_use]
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// Lists the signed-in user's favorites.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] when the request fails.
    pub async fn list(&self) -> Result<Vec<Favorite>, ApiError> {
        self.transport
            .execute(ApiRequest::get("/api/favorites"))
            .await?
            .json()
    }

    /// Bookmarks a listing.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] when the listing is already
    /// bookmarked and [`ApiError::NotFound`] when it does not exist.
    pub async fn add(&self, listing_id: ListingId) -> Result<Favorite, ApiError> {
        let request = ApiRequest::post("/api/favorites")
            .with_json(&serde_json::json!({ "listing_id": listing_id }))?;
        self.transport.execute(request).await?.json()
    }

    /// Removes a bookmark.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] when the request fails.
    pub async fn remove(&self, listing_id: ListingId) -> Result<(), ApiError> {
        let request = ApiRequest::delete(format!("/api/favorites/{listing_id}"));
        self.transport.execute(request).await?;
        Ok(())
    }

    /// Tells whether the signed-in user has bookmarked the listing.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] when the request fails.
    pub async fn check(&self, listing_id: ListingId) -> Result<bool, ApiError> {
        let request = ApiRequest::get(format!("/api/favorites/check/{listing_id}"));
        let flag: FavoriteFlag = self.transport.execute(request).await?.json()?;
        Ok(flag.is_favorite)
    }
}
