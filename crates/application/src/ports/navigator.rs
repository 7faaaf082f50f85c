//! Navigation port
//!
//! Lets the session layer ask the embedding interface to change
//! location without knowing anything about how views are shown.

/// Location control offered by the embedding interface.
///
/// Paths are root-relative, e.g. `/listings/4`.
pub trait Navigator: Send + Sync {
    /// Returns the path the user is currently looking at.
    fn current_path(&self) -> String;

    /// Moves the user to the given path.
    fn navigate(&self, path: &str);
}
