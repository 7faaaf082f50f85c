//! Direct messaging.

use std::sync::Arc;

use agora_domain::{Conversation, ListingId, Message, MessageId, OutgoingMessage, UserId};

use crate::error::ApiError;
use crate::ports::{ApiRequest, ApiTransport};

/// Typed access to the messaging endpoints.
///
/// All of them require a signed-in session.
pub struct MessagesApi {
    transport: Arc<dyn ApiTransport>,
}

impl MessagesApi {
    /// Creates the wrapper over a transport.
    #[must_use]
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// Lists the signed-in user's conversations, most recent first.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] when the request fails.
    pub async fn conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        self.transport
            .execute(ApiRequest::get("/api/messages/conversations"))
            .await?
            .json()
    }

    /// Fetches the message thread with another user, optionally
    /// narrowed to one listing.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] when the request fails.
    pub async fn with_user(
        &self,
        user_id: UserId,
        listing_id: Option<ListingId>,
    ) -> Result<Vec<Message>, ApiError> {
        let mut request = ApiRequest::get(format!("/api/messages/conversation/{user_id}"));
        if let Some(listing_id) = listing_id {
            request =
                request.with_query(vec![("listing_id".to_string(), listing_id.to_string())]);
        }
        self.transport.execute(request).await?.json()
    }

    /// Sends a direct message.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the receiver does not exist
    /// and the classified [`ApiError`] for other failures.
    pub async fn send(&self, message: &OutgoingMessage) -> Result<Message, ApiError> {
        let request = ApiRequest::post("/api/messages").with_json(message)?;
        self.transport.execute(request).await?.json()
    }

    /// Marks a received message as read and returns it updated.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the message does not exist
    /// or was not sent to the signed-in user.
    pub async fn mark_read(&self, message_id: MessageId) -> Result<Message, ApiError> {
        let request = ApiRequest::put(format!("/api/messages/{message_id}/read"));
        self.transport.execute(request).await?.json()
    }
}
