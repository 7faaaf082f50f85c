//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external
//! systems. Each port is a trait that can be implemented by adapters in
//! the infrastructure layer.

mod navigator;
mod session_storage;
mod transport;

pub use navigator::Navigator;
pub use session_storage::{SessionStorage, StorageError, StoredEntries};
pub use transport::{ApiRequest, ApiResponse, ApiTransport, HttpMethod, MultipartFile, RequestBody};
