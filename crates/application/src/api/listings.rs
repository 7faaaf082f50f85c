//! Listing search and management.

use std::sync::Arc;

use agora_domain::{
    Listing, ListingDraft, ListingFilter, ListingId, ListingPatch, ListingStatus, UserId,
};

use crate::error::ApiError;
use crate::ports::{ApiRequest, ApiTransport};

/// Typed access to the listing endpoints.
pub struct ListingsApi {
    transport: Arc<dyn ApiTransport>,
}

impl ListingsApi {
    /// Creates the wrapper over a transport.
    #[must_use]
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// Searches listings with the given filter.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] when the request fails.
    pub async fn search(&self, filter: &ListingFilter) -> Result<Vec<Listing>, ApiError> {
        let request = ApiRequest::get("/api/listings").with_query(filter.to_query_pairs());
        self.transport.execute(request).await?.json()
    }

    /// Fetches a single listing. The backend counts the view.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id.
    pub async fn get(&self, listing_id: ListingId) -> Result<Listing, ApiError> {
        let request = ApiRequest::get(format!("/api/listings/{listing_id}"));
        self.transport.execute(request).await?.json()
    }

    /// Publishes a new listing owned by the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] without a valid session and
    /// [`ApiError::Validation`] when the backend rejects the draft.
    pub async fn create(&self, draft: &ListingDraft) -> Result<Listing, ApiError> {
        let request = ApiRequest::post("/api/listings").with_json(draft)?;
        self.transport.execute(request).await?.json()
    }

    /// Applies a partial update to an owned listing.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] when the request fails.
    pub async fn update(
        &self,
        listing_id: ListingId,
        patch: &ListingPatch,
    ) -> Result<Listing, ApiError> {
        let request = ApiRequest::put(format!("/api/listings/{listing_id}")).with_json(patch)?;
        self.transport.execute(request).await?.json()
    }

    /// Removes an owned listing.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] when the request fails.
    pub async fn delete(&self, listing_id: ListingId) -> Result<(), ApiError> {
        let request = ApiRequest::delete(format!("/api/listings/{listing_id}"));
        self.transport.execute(request).await?;
        Ok(())
    }

    /// Lists the signed-in user's own listings, optionally narrowed to
    /// one lifecycle state.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] when the request fails.
    pub async fn mine(&self, status: Option<ListingStatus>) -> Result<Vec<Listing>, ApiError> {
        let mut request = ApiRequest::get("/api/listings/me/listings");
        if let Some(status) = status {
            request =
                request.with_query(vec![("status".to_string(), status.as_str().to_string())]);
        }
        self.transport.execute(request).await?.json()
    }

    /// Lists the public listings of another user.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] when the request fails.
    pub async fn by_user(
        &self,
        user_id: UserId,
        status: Option<ListingStatus>,
    ) -> Result<Vec<Listing>, ApiError> {
        let mut request = ApiRequest::get(format!("/api/listings/user/{user_id}"));
        if let Some(status) = status {
            request =
                request.with_query(vec![("status".to_string(), status.as_str().to_string())]);
        }
        self.transport.execute(request).await?.json()
    }
}
