//! Builder wiring the session store, transport and API surfaces.

use std::path::PathBuf;
use std::sync::Arc;

use url::Url;

use agora_application::{
    ApiTransport, LoginRedirector, Navigator, SessionManager, SessionStorage,
};
use agora_infrastructure::{FileSessionStorage, ReqwestTransport};

use crate::client::AgoraClient;
use crate::error::ClientError;

/// Configures and assembles an [`AgoraClient`].
///
/// Obtained through [`AgoraClient::builder`]. Every setting has a
/// default: sessions persist under the platform configuration
/// directory, and no redirect happens on credential rejection unless a
/// navigator is supplied.
#[must_use]
pub struct AgoraClientBuilder {
    base_url: String,
    storage: Option<Arc<dyn SessionStorage>>,
    storage_dir: Option<PathBuf>,
    navigator: Option<Arc<dyn Navigator>>,
    login_path: Option<String>,
    user_agent: Option<String>,
}

impl AgoraClientBuilder {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            storage: None,
            storage_dir: None,
            navigator: None,
            login_path: None,
            user_agent: None,
        }
    }

    /// Persists sessions through a custom storage adapter.
    pub fn with_storage(mut self, storage: Arc<dyn SessionStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Persists sessions under `dir` instead of the platform default.
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }

    /// Sends the user to the sign-in page when the backend rejects
    /// the session credential.
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Overrides the sign-in page path used for redirects.
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = Some(path.into());
        self
    }

    /// Overrides the User-Agent header sent with every request.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Assembles the client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] when the base URL does
    /// not parse, and [`ClientError::Storage`] when no session storage
    /// location is available.
    pub fn build(self) -> Result<AgoraClient, ClientError> {
        let base_url = parse_base_url(&self.base_url)?;

        let storage: Arc<dyn SessionStorage> = match (self.storage, self.storage_dir) {
            (Some(storage), _) => storage,
            (None, Some(dir)) => Arc::new(FileSessionStorage::new(dir)),
            (None, None) => Arc::new(FileSessionStorage::in_config_dir()?),
        };
        let sessions = Arc::new(SessionManager::new(storage));

        if let Some(navigator) = self.navigator {
            let redirector = match self.login_path {
                Some(path) => LoginRedirector::with_login_path(navigator, path),
                None => LoginRedirector::new(navigator),
            };
            sessions.subscribe(Arc::new(redirector));
        }

        let transport: Arc<dyn ApiTransport> = Arc::new(match self.user_agent {
            Some(agent) => {
                ReqwestTransport::with_user_agent(base_url.clone(), &agent, sessions.clone())
            }
            None => ReqwestTransport::new(base_url.clone(), sessions.clone()),
        });

        tracing::debug!(%base_url, "client assembled");
        Ok(AgoraClient::assemble(sessions, transport))
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let mut url =
        Url::parse(raw).map_err(|e| ClientError::InvalidBaseUrl(format!("{raw}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidBaseUrl(format!(
            "{raw}: not a base URL"
        )));
    }
    // a trailing slash keeps any path prefix intact when joining
    if !url.path().ends_with('/') {
        url.set_path(&format!("{}/", url.path()));
    }
    Ok(url)
}
