//! API transport port
//!
//! Defines the interface between the typed API wrappers and the HTTP
//! adapter. Requests are described relative to the backend root; the
//! adapter owns the base URL, the credential header and the mapping of
//! HTTP failures onto [`ApiError`].

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// HTTP method of an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// Read a resource.
    Get,
    /// Create a resource or submit a form.
    Post,
    /// Replace or update a resource.
    Put,
    /// Remove a resource.
    Delete,
}

impl HttpMethod {
    /// Returns the method name as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file to send as a multipart form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartFile {
    /// Form field name the backend expects.
    pub field: String,

    /// Original file name, used by the backend to derive the stored name.
    pub file_name: String,

    /// MIME type of the content.
    pub content_type: String,

    /// Raw file content.
    pub bytes: Vec<u8>,
}

/// Body of an outgoing API request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body.
    Empty,
    /// A JSON document.
    Json(serde_json::Value),
    /// URL-encoded form fields.
    Form(Vec<(String, String)>),
    /// A single-file multipart form.
    Multipart(MultipartFile),
}

/// An API request, described relative to the backend root.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: HttpMethod,

    /// Path under the backend root, e.g. `/api/listings`.
    pub path: String,

    /// Query string pairs.
    pub query: Vec<(String, String)>,

    /// Request body.
    pub body: RequestBody,

    /// When true the adapter never attaches a credential, even if a
    /// session exists. Sign-in and registration use this so a stale
    /// credential cannot interfere with them.
    pub anonymous: bool,
}

impl ApiRequest {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            anonymous: false,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Creates a PUT request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Appends query string pairs.
    #[must_use]
    pub fn with_query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Sets a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBody`] when the value cannot be
    /// represented as JSON.
    pub fn with_json<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidBody(format!("failed to encode JSON body: {e}")))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    /// Sets a URL-encoded form body.
    #[must_use]
    pub fn with_form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(fields);
        self
    }

    /// Sets a single-file multipart body.
    #[must_use]
    pub fn with_multipart(mut self, file: MultipartFile) -> Self {
        self.body = RequestBody::Multipart(file);
        self
    }

    /// Marks the request as anonymous: no credential is ever attached.
    #[must_use]
    pub const fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }
}

/// A successful (2xx) API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,

    /// Raw response body.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Decodes the body as JSON into the requested type.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] when the body is not valid JSON
    /// for the type.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Executes API requests against the backend.
///
/// Implementations attach the current credential to non-anonymous
/// requests, map failures onto [`ApiError`] and tear down the session
/// when the backend rejects a credential.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Sends the request and returns the successful response.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for transport failures and
    /// non-2xx statuses.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}
