//! Agora Domain - Core marketplace types
//!
//! This crate defines the domain model for the Agora marketplace client.
//! All types here are pure Rust with no I/O dependencies.

pub mod category;
pub mod error;
pub mod favorite;
pub mod id;
pub mod listing;
pub mod message;
pub mod photo;
pub mod session;
pub mod user;

pub use category::Category;
pub use error::{DomainError, DomainResult};
pub use favorite::Favorite;
pub use id::{CategoryId, FavoriteId, ListingId, MessageId, PhotoId, UserId};
pub use listing::{
    Condition, Listing, ListingDraft, ListingFilter, ListingPatch, ListingStatus, SortOrder,
};
pub use message::{Conversation, ListingBrief, Message, OutgoingMessage};
pub use photo::{Photo, UploadedPhoto};
pub use session::{Credential, Registration, Session, TokenGrant};
pub use user::{Role, UserBrief, UserProfile};
