//! Session and Sign-In Domain Model
//!
//! A session pairs a bearer credential with the profile it belongs to.
//! The pair is constructed as a unit so callers can never observe a
//! credential without an identity or the other way around.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::user::{Role, UserProfile};

/// Minimum accepted password length, matching the backend rule.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Usernames are 3 to 50 characters of letters, digits and underscores.
#[allow(clippy::expect_used)]
static USERNAME_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{3,50}$").expect("username pattern compiles"));

/// An opaque bearer credential issued by the backend at sign-in.
///
/// The inner token is never inspected, only stored and replayed on
/// outgoing requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a raw access token.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidCredential`] when the token is
    /// empty or contains only whitespace.
    pub fn new(token: impl Into<String>) -> DomainResult<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(DomainError::InvalidCredential(
                "access token is empty".to_string(),
            ));
        }
        Ok(Self(token))
    }

    /// Returns the raw token exactly as issued.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Renders the token as an HTTP `Authorization` header value.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

/// An authenticated session: a credential and the identity it belongs to.
///
/// Fields are private so the two halves can only be replaced together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    credential: Credential,
    identity: UserProfile,
}

impl Session {
    /// Pairs a credential with the profile it authenticates.
    #[must_use]
    pub const fn new(credential: Credential, identity: UserProfile) -> Self {
        Self {
            credential,
            identity,
        }
    }

    /// The bearer credential of this session.
    #[must_use]
    pub const fn credential(&self) -> &Credential {
        &self.credential
    }

    /// The profile this session authenticates.
    #[must_use]
    pub const fn identity(&self) -> &UserProfile {
        &self.identity
    }

    /// Replaces the identity while keeping the credential.
    ///
    /// Used when the backend returns a fresher profile for the same
    /// signed-in user.
    #[must_use]
    pub fn with_identity(self, identity: UserProfile) -> Self {
        Self {
            credential: self.credential,
            identity,
        }
    }
}

/// Token payload returned by the sign-in and registration endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenGrant {
    /// The issued bearer token.
    pub access_token: String,

    /// Token scheme, `"bearer"` in practice.
    pub token_type: String,

    /// Profile of the freshly authenticated user.
    pub user: UserProfile,
}

impl TokenGrant {
    /// Builds the session this grant establishes.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidCredential`] when the backend sent
    /// an empty access token.
    pub fn session(&self) -> DomainResult<Session> {
        let credential = Credential::new(self.access_token.clone())?;
        Ok(Session::new(credential, self.user.clone()))
    }
}

/// Payload for creating a new marketplace account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    /// Requested login name.
    pub username: String,

    /// Contact email address.
    pub email: String,

    /// Chosen password, sent only over the wire and never stored.
    pub password: String,

    /// Optional human-friendly name.
    pub display_name: Option<String>,

    /// Requested marketplace role.
    pub role: Role,
}

impl Registration {
    /// Creates a registration with the default buyer role and no
    /// display name.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            display_name: None,
            role: Role::default(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Sets the requested role.
    #[must_use]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Checks the payload against the backend's account rules before
    /// spending a round-trip on it.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule: username shape, email shape or
    /// password length.
    pub fn validate(&self) -> DomainResult<()> {
        if !USERNAME_RULE.is_match(&self.username) {
            return Err(DomainError::InvalidUsername(format!(
                "{:?} must be 3-50 letters, digits or underscores",
                self.username
            )));
        }
        if !self.email.contains('@') {
            return Err(DomainError::InvalidEmail(self.email.clone()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::PasswordTooShort {
                minimum: MIN_PASSWORD_LEN,
            });
        }
        Ok(())
    }
}
