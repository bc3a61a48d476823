//! Database abstraction traits
//!
//! This module provides the two persistence seams the rest of the server
//! talks to:
//!
//! - [`CredentialStore`] - user identity records for signup/signin
//! - [`ResourceStore`] - generic CRUD over one named item collection
//!
//! # Example
//!
//! ```rust,ignore
//! use portal::db::{DatabaseProvider, CredentialStore};
//!
//! // Use in-memory database (default for development/testing)
//! let db = DatabaseProvider::Memory.create_client().await?;
//!
//! // Use file-based SQLite
//! let db = DatabaseProvider::SQLite { path: "data/portal.db".into() }.create_client().await?;
//! ```

use crate::auth::permissions::Role;
use crate::types::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Database provider configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DatabaseProvider {
    /// In-memory SQLite database (ephemeral, lost on restart)
    #[default]
    Memory,
    /// File-based SQLite database
    SQLite {
        /// Path to the SQLite database file
        path: String,
    },
}

impl DatabaseProvider {
    /// Interprets a configured database URL. `:memory:` (or an empty string)
    /// selects the in-memory database, anything else is a file path.
    pub fn from_url(url: &str) -> Self {
        match url.trim() {
            "" | ":memory:" => DatabaseProvider::Memory,
            path => DatabaseProvider::SQLite {
                path: path.to_string(),
            },
        }
    }

    /// Create a database client from this provider configuration
    pub async fn create_client(&self) -> Result<Arc<super::turso::TursoClient>> {
        let client = match self {
            DatabaseProvider::Memory => super::turso::TursoClient::new_memory().await?,
            DatabaseProvider::SQLite { path } => super::turso::TursoClient::new_local(path).await?,
        };
        Ok(Arc::new(client))
    }
}

/// User record from the database
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user identifier (UUID v4)
    pub id: String,
    /// Case-sensitive, unique login name
    pub username: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub role: Role,
    /// Unix timestamp of creation
    pub created_at: i64,
}

/// Persistence for user identities.
///
/// Implementations must enforce username uniqueness atomically in the
/// storage layer; two concurrent `create_user` calls for the same username
/// yield exactly one `Ok`.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Hashes `password` and stores a new user.
    ///
    /// Fails with `AppError::DuplicateUsername` if the name is taken.
    async fn create_user(&self, username: &str, password: &str, role: Role) -> Result<User>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// All users, oldest first.
    async fn list_users(&self) -> Result<Vec<User>>;
}

/// A stored item: its assigned id and arbitrary JSON fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Item {
    /// The JSON shape returned to clients: the fields plus `id`.
    pub fn into_json(self) -> Value {
        let mut fields = self.fields;
        fields.insert("id".to_string(), Value::String(self.id));
        Value::Object(fields)
    }
}

/// CRUD over a single named collection.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Collection name, as it appears in the URL.
    fn name(&self) -> &str;

    async fn create(&self, fields: Map<String, Value>) -> Result<Item>;

    async fn find_all(&self) -> Result<Vec<Item>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Item>>;

    /// Merges `fields` into the stored item. `None` if no such item.
    async fn update(&self, id: &str, fields: Map<String, Value>) -> Result<Option<Item>>;

    /// Returns whether an item was removed.
    async fn delete(&self, id: &str) -> Result<bool>;
}
