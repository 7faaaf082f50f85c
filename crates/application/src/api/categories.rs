//! Category browsing.

use std::sync::Arc;

use agora_domain::{Category, CategoryId};

use crate::error::ApiError;
use crate::ports::{ApiRequest, ApiTransport};

/// Typed access to the category endpoints.
pub struct CategoriesApi {
    transport: Arc<dyn ApiTransport>,
}

impl CategoriesApi {
    /// Creates the wrapper over a transport.
    #[must_use]
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// Lists all browsing categories.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] when the request fails.
    pub async fn list(&self) -> Result<Vec<Category>, ApiError> {
        self.transport
            .execute(ApiRequest::get("/api/categories"))
            .await?
            .json()
    }

    /// Fetches a single category.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id.
    pub async fn get(&self, category_id: CategoryId) -> Result<Category, ApiError> {
        self.transport
            .execute(ApiRequest::get(format!("/api/categories/{category_id}")))
            .await?
            .json()
    }
}
