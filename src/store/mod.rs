//! Sled-backed data collaborator.
//!
//! [`DataSource`] owns the embedded database and exposes the narrow interface
//! the rest of the system consumes: collections, documents, files, users, and
//! permission records. It is constructed once at startup and injected into
//! the router; it holds no state beyond the database handles.

pub mod collections;
pub mod core;
pub mod documents;
pub mod error;
pub mod files;
pub mod permissions;
pub mod users;

pub use self::core::DataSource;
pub use documents::QueryOptions;
pub use error::{StoreError, StoreResult};
pub use files::{file_collection_name, is_file_collection, StoredFile, FILE_SUFFIX};
pub use users::{Registration, User};
