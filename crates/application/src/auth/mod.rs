//! Authentication module for the Agora client.
//!
//! This module provides:
//! - Sign-in and registration against the backend token endpoints
//! - Identity refresh for an existing session
//! - Local sign-out

mod gateway;

pub use gateway::AuthGateway;
