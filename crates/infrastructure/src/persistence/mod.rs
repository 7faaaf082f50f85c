//! Persistence implementations for file-based storage.

mod session_storage;

pub use session_storage::*;
