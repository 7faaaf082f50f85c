//! Session module for the Agora client.
//!
//! This module provides:
//! - The session store with durable persistence and change events
//! - Single-flight write tickets for racing sign-in attempts
//! - The redirect-to-login policy applied on credential rejection

mod manager;
mod redirect;

pub use manager::{SessionEvent, SessionManager, SessionObserver, WriteTicket};
pub use redirect::LoginRedirector;
