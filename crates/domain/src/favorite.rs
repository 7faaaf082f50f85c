//! Favorite Domain Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{FavoriteId, ListingId, UserId};
use crate::listing::Listing;

/// A listing a user has bookmarked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    /// Backend identifier of the favorite entry.
    pub favorite_id: FavoriteId,

    /// Who bookmarked the listing.
    pub user_id: UserId,

    /// The bookmarked listing.
    pub listing_id: ListingId,

    /// When the bookmark was made.
    pub created_at: DateTime<Utc>,

    /// The full listing, when the backend embeds it.
    #[serde(default)]
    pub listing: Option<Listing>,
}
