//! API transport over reqwest.
//!
//! Owns the backend base URL, attaches the bearer credential of the
//! current session to outgoing requests and maps HTTP failures onto
//! the API error taxonomy. When the backend rejects the credential of
//! a request that carried one, the transport tears the session down
//! before surfacing the error.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::redirect::Policy;
use reqwest::{Client, Method, Url, multipart};
use serde::Deserialize;
use uuid::Uuid;

use agora_application::{
    ApiError, ApiRequest, ApiResponse, ApiTransport, HttpMethod, RequestBody, SessionManager,
};

use super::credentials::CredentialCache;

const USER_AGENT: &str = concat!("Agora/", env!("CARGO_PKG_VERSION"));
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// API transport over a shared reqwest client.
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
    credentials: Arc<CredentialCache>,
    sessions: Arc<SessionManager>,
}

impl ReqwestTransport {
    /// Creates a transport for the backend at `base_url`.
    ///
    /// Default configuration:
    /// - Connection timeout: 30 seconds
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    /// - User-Agent: `Agora/<version>`
    #[must_use]
    pub fn new(base_url: Url, sessions: Arc<SessionManager>) -> Self {
        Self::with_user_agent(base_url, USER_AGENT, sessions)
    }

    /// Creates a transport that identifies itself as `user_agent`.
    #[must_use]
    pub fn with_user_agent(base_url: Url, user_agent: &str, sessions: Arc<SessionManager>) -> Self {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(CONNECT_TIMEOUT)
            .redirect(Policy::limited(10))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self::with_client(client, base_url, sessions)
    }

    /// Creates a transport over a custom reqwest client.
    ///
    /// Subscribes a credential cache to the session store and seeds it
    /// from the current session, so a transport built after the store
    /// was hydrated starts out authenticated.
    #[must_use]
    pub fn with_client(client: Client, base_url: Url, sessions: Arc<SessionManager>) -> Self {
        let credentials = Arc::new(CredentialCache::new());
        if let Some(credential) = sessions.current_credential() {
            credentials.install(credential);
        }
        sessions.subscribe(credentials.clone());
        Self {
            client,
            base_url,
            credentials,
            sessions,
        }
    }

    fn request_url(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        // joining a leading slash would drop any path prefix of the base
        let relative = request.path.trim_start_matches('/');
        let mut url = self
            .base_url
            .join(relative)
            .map_err(|e| ApiError::InvalidUrl(format!("{e}: {}", request.path)))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    fn attach_body(
        builder: reqwest::RequestBuilder,
        body: RequestBody,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        match body {
            RequestBody::Empty => Ok(builder),
            RequestBody::Json(value) => Ok(builder.json(&value)),
            RequestBody::Form(fields) => {
                let encoded = serde_urlencoded::to_string(&fields)
                    .map_err(|e| ApiError::InvalidBody(format!("failed to encode form: {e}")))?;
                Ok(builder
                    .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                    .body(encoded))
            }
            RequestBody::Multipart(file) => {
                let part = multipart::Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.content_type)
                    .map_err(|e| ApiError::InvalidBody(format!("invalid MIME type: {e}")))?;
                let form = multipart::Form::new().part(file.field, part);
                Ok(builder.multipart(form))
            }
        }
    }

    fn map_transport_error(error: &reqwest::Error) -> ApiError {
        if error.is_timeout() {
            return ApiError::Network(format!("request timed out: {error}"));
        }
        if error.is_connect() {
            return ApiError::Network(format!("connection failed: {error}"));
        }
        ApiError::Network(error.to_string())
    }

    fn error_for_status(status: u16, body: &[u8]) -> ApiError {
        let mut message = extract_detail(body);
        if message.is_empty() {
            message = format!("HTTP {status}");
        }
        ApiError::from_status(status, message)
    }
}

#[async_trait]
impl ApiTransport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.request_url(&request)?;
        let request_id = Uuid::now_v7();

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url);
        let credentialed = if request.anonymous {
            false
        } else if let Some(credential) = self.credentials.current() {
            builder = builder.header(AUTHORIZATION, credential.authorization_header());
            true
        } else {
            false
        };
        builder = Self::attach_body(builder, request.body)?;

        tracing::debug!(
            %request_id,
            method = %request.method,
            path = %request.path,
            credentialed,
            "sending request"
        );
        let started = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_transport_error(&e))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read response body: {e}")))?
            .to_vec();
        tracing::debug!(
            %request_id,
            status,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "response received"
        );

        if (200..300).contains(&status) {
            return Ok(ApiResponse { status, body });
        }

        if status == 401 && credentialed {
            tracing::warn!(path = %request.path, "credential rejected by the backend");
            if let Err(error) = self.sessions.invalidate().await {
                tracing::warn!(%error, "failed to remove the stored session after rejection");
            }
        }
        Err(Self::error_for_status(status, &body))
    }
}

/// Shape of backend error bodies: `{"detail": ...}` where detail is
/// either a message string or a structured validation report.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

fn extract_detail(body: &[u8]) -> String {
    let fallback = || String::from_utf8_lossy(body).trim().to_string();
    let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) else {
        return fallback();
    };
    match parsed.detail {
        Some(serde_json::Value::String(message)) => message,
        Some(structured) => structured.to_string(),
        None => fallback(),
    }
}
