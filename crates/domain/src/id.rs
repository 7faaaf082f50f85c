//! Identifier aliases for marketplace entities
//!
//! The backend issues numeric identifiers. Aliases keep signatures
//! readable without the overhead of full newtypes.

/// Identifier of a registered user.
pub type UserId = i64;

/// Identifier of a listing.
pub type ListingId = i64;

/// Identifier of a category.
pub type CategoryId = i64;

/// Identifier of a direct message.
pub type MessageId = i64;

/// Identifier of a listing photo.
pub type PhotoId = i64;

/// Identifier of a favorite entry.
pub type FavoriteId = i64;
