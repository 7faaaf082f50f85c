//! Redirect-to-login policy.
//!
//! Subscribed to the session store, this policy reacts to credential
//! rejection by sending the user to the sign-in page with a return
//! path. Explicit sign-outs never navigate: where the user goes after
//! choosing to leave is the interface's decision.

use std::sync::Arc;

use crate::ports::Navigator;
use crate::session::{SessionEvent, SessionObserver};

/// Sends the user to the sign-in page when their session is
/// invalidated.
pub struct LoginRedirector {
    navigator: Arc<dyn Navigator>,
    login_path: String,
}

impl LoginRedirector {
    /// Path of the sign-in page unless overridden.
    pub const DEFAULT_LOGIN_PATH: &'static str = "/login";

    /// Creates the policy with the default sign-in path.
    #[must_use]
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self::with_login_path(navigator, Self::DEFAULT_LOGIN_PATH)
    }

    /// Creates the policy with a custom sign-in path.
    #[must_use]
    pub fn with_login_path(navigator: Arc<dyn Navigator>, login_path: impl Into<String>) -> Self {
        Self {
            navigator,
            login_path: login_path.into(),
        }
    }
}

impl SessionObserver for LoginRedirector {
    fn on_session_event(&self, event: &SessionEvent) {
        if !matches!(event, SessionEvent::Invalidated) {
            return;
        }
        let from = self.navigator.current_path();
        if from == self.login_path {
            tracing::debug!("already at the sign-in page; staying put");
            return;
        }
        let target = serde_urlencoded::to_string([("next", from.as_str())]).map_or_else(
            |_| self.login_path.clone(),
            |query| format!("{}?{query}", self.login_path),
        );
        tracing::info!(%from, "redirecting to sign-in after session invalidation");
        self.navigator.navigate(&target);
    }
}
