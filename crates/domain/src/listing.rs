//! Listing Domain Model
//!
//! Listings are the items offered on the marketplace, together with
//! the draft, patch and filter types used to create, update and
//! search them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{CategoryId, ListingId, UserId};
use crate::photo::Photo;

/// Physical condition of an offered item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Unused, possibly still packaged.
    New,
    /// Used but without visible wear.
    LikeNew,
    /// Normal signs of use (default).
    #[default]
    Good,
    /// Clearly worn but fully functional.
    Fair,
    /// Heavily worn or partially defective.
    Poor,
}

impl Condition {
    /// Returns the wire representation of the condition.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::LikeNew => "like_new",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

/// Lifecycle state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    /// Prepared but not yet visible to buyers.
    Draft,
    /// Visible and open for offers (default).
    #[default]
    Published,
    /// Promised to a buyer, hidden from search.
    Reserved,
    /// Sold and archived from search.
    Sold,
    /// Withdrawn by the seller.
    Archived,
}

impl ListingStatus {
    /// Returns the wire representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Reserved => "reserved",
            Self::Sold => "sold",
            Self::Archived => "archived",
        }
    }
}

/// Search result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Most recently published first (default).
    #[default]
    Newest,
    /// Oldest first.
    Oldest,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
}

impl SortOrder {
    /// Returns the wire representation of the ordering.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::PriceLow => "price_low",
            Self::PriceHigh => "price_high",
        }
    }
}

/// A listing as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Backend identifier of the listing.
    pub listing_id: ListingId,

    /// Who offers the item.
    pub seller_id: UserId,

    /// Category the listing is filed under, if any.
    #[serde(default)]
    pub category_id: Option<CategoryId>,

    /// Short title shown in search results.
    pub title: String,

    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,

    /// Asking price in the marketplace currency.
    pub price: f64,

    /// Condition of the item.
    #[serde(default)]
    pub condition: Condition,

    /// How many identical items are offered.
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Lifecycle state.
    #[serde(default)]
    pub status: ListingStatus,

    /// When the listing was created.
    pub created_at: DateTime<Utc>,

    /// When the listing was last edited.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    /// How often the listing has been opened.
    #[serde(default)]
    pub view_count: u64,

    /// Photos attached to the listing.
    #[serde(default)]
    pub photos: Vec<Photo>,
}

const fn default_quantity() -> u32 {
    1
}

/// Payload for publishing a new listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingDraft {
    /// Short title shown in search results.
    pub title: String,

    /// Free-form description.
    pub description: Option<String>,

    /// Asking price in the marketplace currency.
    pub price: f64,

    /// Category to file the listing under.
    pub category_id: Option<CategoryId>,

    /// Condition of the item.
    pub condition: Condition,

    /// How many identical items are offered.
    pub quantity: u32,
}

impl ListingDraft {
    /// Creates a draft with the given title and price; condition
    /// defaults to good and quantity to one.
    pub fn new(title: impl Into<String>, price: f64) -> Self {
        Self {
            title: title.into(),
            description: None,
            price,
            category_id: None,
            condition: Condition::default(),
            quantity: default_quantity(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Files the listing under a category.
    #[must_use]
    pub const fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Sets the condition.
    #[must_use]
    pub const fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    /// Sets the offered quantity.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }
}

/// Partial update for an existing listing.
///
/// Only the fields that are set are sent, so an empty patch leaves
/// the listing untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListingPatch {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// New asking price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    /// New category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,

    /// New condition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,

    /// New quantity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,

    /// New lifecycle state, e.g. marking the item sold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ListingStatus>,
}

impl ListingPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets a new description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a new price.
    #[must_use]
    pub const fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Moves the listing to another category.
    #[must_use]
    pub const fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Sets a new condition.
    #[must_use]
    pub const fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Sets a new quantity.
    #[must_use]
    pub const fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Moves the listing to a new lifecycle state.
    #[must_use]
    pub const fn status(mut self, status: ListingStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns true when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category_id.is_none()
            && self.condition.is_none()
            && self.quantity.is_none()
            && self.status.is_none()
    }
}

/// Search criteria for browsing listings.
///
/// Every field is optional; an empty filter returns the first page of
/// all published listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    /// Full-text search over title and description.
    pub search: Option<String>,

    /// Restrict to one category.
    pub category_id: Option<CategoryId>,

    /// Lower price bound, inclusive.
    pub min_price: Option<f64>,

    /// Upper price bound, inclusive.
    pub max_price: Option<f64>,

    /// Restrict to one condition.
    pub condition: Option<Condition>,

    /// Restrict to one lifecycle state.
    pub status: Option<ListingStatus>,

    /// Result ordering.
    pub sort_by: Option<SortOrder>,

    /// Page size.
    pub limit: Option<u32>,

    /// Page start offset.
    pub offset: Option<u32>,
}

impl ListingFilter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search text.
    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Restricts results to one category.
    #[must_use]
    pub const fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Restricts results to a price range; either bound may be open.
    #[must_use]
    pub const fn priced(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    /// Restricts results to one condition.
    #[must_use]
    pub const fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Restricts results to one lifecycle state.
    #[must_use]
    pub const fn with_status(mut self, status: ListingStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Orders the results.
    #[must_use]
    pub const fn sorted(mut self, order: SortOrder) -> Self {
        self.sort_by = Some(order);
        self
    }

    /// Selects a result page.
    #[must_use]
    pub const fn page(mut self, limit: u32, offset: u32) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    /// Lowers the filter to query string pairs, omitting unset fields.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        if let Some(category_id) = self.category_id {
            pairs.push(("category_id".to_string(), category_id.to_string()));
        }
        if let Some(min_price) = self.min_price {
            pairs.push(("min_price".to_string(), min_price.to_string()));
        }
        if let Some(max_price) = self.max_price {
            pairs.push(("max_price".to_string(), max_price.to_string()));
        }
        if let Some(condition) = self.condition {
            pairs.push(("condition".to_string(), condition.as_str().to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status".to_string(), status.as_str().to_string()));
        }
        if let Some(sort_by) = self.sort_by {
            pairs.push(("sort_by".to_string(), sort_by.as_str().to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }
        pairs
    }
}
