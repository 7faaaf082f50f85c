//! Agora Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod http;
pub mod persistence;

pub use http::{CredentialCache, ReqwestTransport};
pub use persistence::FileSessionStorage;
