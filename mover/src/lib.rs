//! Relocates the binary resources referenced by a game project when the
//! project is copied or saved to a different storage backend.

pub mod migration;
pub mod project;
pub mod services;
pub mod utils;

pub use migration::{MigrateOptions, MigrationResult, MigrationServices, ResourceMover};
pub use project::{Project, ResourceKind, ResourceRecord, StorageKind, StorageLocation};
pub use services::errors::{MigrationError, ResourceError};
