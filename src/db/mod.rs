//! Persistence layer.
//!
//! - [`traits`] - `CredentialStore` and `ResourceStore` seams
//! - [`turso`] - libsql (SQLite) implementation of both
//! - [`registry`] - collection name → store mapping used by the CRUD handlers

pub mod registry;
pub mod traits;
pub mod turso;

// Re-exports
pub use registry::CollectionRegistry;
pub use traits::{CredentialStore, DatabaseProvider, Item, ResourceStore, User};
pub use turso::{TursoClient, TursoCollection};
