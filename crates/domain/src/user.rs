//! User Profile Domain Model
//!
//! Describes the people trading on the marketplace: their public
//! profile and the role that governs what they may do.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::UserId;

/// What a user is allowed to do on the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Can browse, favorite and buy (default).
    #[default]
    Buyer,
    /// Can publish and manage listings.
    Seller,
    /// Both buyer and seller capabilities.
    Both,
    /// Full administrative access.
    Admin,
}

impl Role {
    /// Returns the wire representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Seller => "seller",
            Self::Both => "both",
            Self::Admin => "admin",
        }
    }

    /// Returns true if this role may create and manage listings.
    #[must_use]
    pub const fn can_sell(self) -> bool {
        matches!(self, Self::Seller | Self::Both | Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s {
            "buyer" => Ok(Self::Buyer),
            "seller" => Ok(Self::Seller),
            "both" => Ok(Self::Both),
            "admin" => Ok(Self::Admin),
            other => Err(DomainError::UnknownRole(other.to_string())),
        }
    }
}

/// Public profile of a registered user as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend identifier of the user.
    pub user_id: UserId,

    /// Unique login name.
    pub username: String,

    /// Contact email address.
    pub email: String,

    /// Optional human-friendly name shown instead of the username.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Marketplace role.
    #[serde(default)]
    pub role: Role,

    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Returns the name to show in interfaces: the display name when
    /// set, the username otherwise.
    #[must_use]
    pub fn visible_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

/// Abbreviated user data embedded in conversation payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBrief {
    /// Backend identifier of the user.
    pub user_id: UserId,

    /// Unique login name.
    pub username: String,

    /// Optional human-friendly name.
    #[serde(default)]
    pub display_name: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn profile(role: Role) -> UserProfile {
        UserProfile {
            user_id: 7,
            username: "ana_p".to_string(),
            email: "ana@example.edu".to_string(),
            display_name: None,
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::Buyer, Role::Seller, Role::Both, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = "landlord".parse::<Role>().unwrap_err();
        assert_eq!(err, DomainError::UnknownRole("landlord".to_string()));
    }

    #[test]
    fn selling_requires_a_seller_role() {
        assert!(!Role::Buyer.can_sell());
        assert!(Role::Seller.can_sell());
        assert!(Role::Both.can_sell());
        assert!(Role::Admin.can_sell());
    }

    #[test]
    fn role_serializes_in_snake_case() {
        let json = serde_json::to_string(&Role::Both).unwrap();
        assert_eq!(json, "\"both\"");
    }

    #[test]
    fn missing_role_defaults_to_buyer() {
        let json = r#"{
            "user_id": 3,
            "username": "marco",
            "email": "marco@example.edu",
            "created_at": "2024-09-01T10:00:00Z"
        }"#;
        let parsed: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.role, Role::Buyer);
        assert_eq!(parsed.display_name, None);
    }

    #[test]
    fn visible_name_prefers_display_name() {
        let mut user = profile(Role::Buyer);
        assert_eq!(user.visible_name(), "ana_p");
        user.display_name = Some("Ana P.".to_string());
        assert_eq!(user.visible_name(), "Ana P.");
    }
}
