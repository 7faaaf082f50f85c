//! HTTP adapter for the marketplace API.
//!
//! This module provides:
//! - The reqwest-backed transport implementing the `ApiTransport` port
//! - The credential cache that mirrors the session store

mod credentials;
mod transport;

pub use credentials::CredentialCache;
pub use transport::ReqwestTransport;
