//! Direct Message Domain Model
//!
//! Buyers and sellers negotiate through short direct messages,
//! optionally tied to a specific listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{ListingId, MessageId, UserId};
use crate::user::UserBrief;

/// A delivered direct message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Backend identifier of the message.
    pub message_id: MessageId,

    /// Who sent it.
    pub sender_id: UserId,

    /// Who it was sent to.
    pub receiver_id: UserId,

    /// Listing the message is about, if any.
    #[serde(default)]
    pub listing_id: Option<ListingId>,

    /// Message text.
    pub body: String,

    /// Whether the receiver has opened it.
    #[serde(default)]
    pub is_read: bool,

    /// When it was sent.
    pub sent_at: DateTime<Utc>,

    /// Sender profile, when the backend embeds it.
    #[serde(default)]
    pub sender: Option<UserBrief>,
}

/// Payload for sending a new direct message.
///
/// `listing_id` is only written to the wire when set, matching the
/// backend's optional field handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMessage {
    /// Who to deliver the message to.
    pub receiver_id: UserId,

    /// Message text.
    pub body: String,

    /// Listing the message is about, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<ListingId>,
}

impl OutgoingMessage {
    /// Creates a message to the given user.
    pub fn new(receiver_id: UserId, body: impl Into<String>) -> Self {
        Self {
            receiver_id,
            body: body.into(),
            listing_id: None,
        }
    }

    /// Ties the message to a listing.
    #[must_use]
    pub const fn about_listing(mut self, listing_id: ListingId) -> Self {
        self.listing_id = Some(listing_id);
        self
    }
}

/// Abbreviated listing data embedded in conversation payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingBrief {
    /// Backend identifier of the listing.
    pub listing_id: ListingId,

    /// Listing title.
    pub title: String,

    /// Asking price.
    pub price: f64,
}

/// One thread in the inbox: the counterpart, the listing under
/// discussion and the latest message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// The other participant.
    pub user: UserBrief,

    /// Listing the thread is about, if any.
    #[serde(default)]
    pub listing: Option<ListingBrief>,

    /// Most recent message in the thread.
    pub last_message: Message,

    /// How many messages the current user has not read yet.
    #[serde(default)]
    pub unread_count: u32,
}
