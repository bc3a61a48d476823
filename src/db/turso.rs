use crate::auth::password;
use crate::auth::permissions::Role;
use crate::db::traits::{CredentialStore, Item, ResourceStore, User};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use chrono::Utc;
use libsql::{Builder, Connection, Database, Row};
use serde_json::{Map, Value};
use std::path::Path;
use uuid::Uuid;

/// libsql-backed storage for users and collection items.
///
/// A single connection is held for the client's lifetime: for `:memory:`
/// databases every new connection would open a fresh, empty database.
pub struct TursoClient {
    _db: Database,
    conn: Connection,
}

impl TursoClient {
    /// Opens an ephemeral in-memory database.
    pub async fn new_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open in-memory database: {}", e)))?;

        Self::from_database(db).await
    }

    /// Opens (creating if needed) a SQLite file.
    pub async fn new_local(path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Database(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }

        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open {}: {}", path, e)))?;

        Self::from_database(db).await
    }

    async fn from_database(db: Database) -> Result<Self> {
        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;

        let client = Self { _db: db, conn };
        client.initialize_schema().await?;

        Ok(client)
    }

    pub fn connection(&self) -> Connection {
        self.conn.clone()
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection();

        // Users table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        // Items table, shared by every collection
        conn.execute(
            "CREATE TABLE IF NOT EXISTS items (
                id TEXT PRIMARY KEY,
                collection TEXT NOT NULL,
                data TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create items table: {}", e)))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_items_collection ON items (collection)",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create items index: {}", e)))?;

        Ok(())
    }

    /// A [`ResourceStore`] view over one collection.
    pub fn collection(&self, name: &str) -> TursoCollection {
        TursoCollection {
            name: name.to_string(),
            conn: self.connection(),
        }
    }
}

fn db_err(e: libsql::Error) -> AppError {
    AppError::Database(e.to_string())
}

fn row_to_user(row: &Row) -> Result<User> {
    let role: String = row.get(3).map_err(db_err)?;
    let role = role
        .parse::<Role>()
        .map_err(|e| AppError::Database(format!("Corrupt user row: {}", e)))?;

    Ok(User {
        id: row.get(0).map_err(db_err)?,
        username: row.get(1).map_err(db_err)?,
        password_hash: row.get(2).map_err(db_err)?,
        role,
        created_at: row.get(4).map_err(db_err)?,
    })
}

#[async_trait]
impl CredentialStore for TursoClient {
    async fn create_user(&self, username: &str, password: &str, role: Role) -> Result<User> {
        let password_hash = password::hash_password(password)?;
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().timestamp();

        // Uniqueness is decided by the UNIQUE constraint in one statement.
        let mut rows = self
            .conn
            .query(
                "INSERT INTO users (id, username, password_hash, role, created_at)
                 VALUES (?, ?, ?, ?, ?)
                 ON CONFLICT(username) DO NOTHING
                 RETURNING id",
                (id.as_str(), username, password_hash.as_str(), role.as_str(), now),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to create user: {}", e)))?;

        if rows.next().await.map_err(db_err)?.is_none() {
            return Err(AppError::DuplicateUsername);
        }

        tracing::info!(user_id = %id, %role, "user created");

        Ok(User {
            id,
            username: username.to_string(),
            password_hash,
            role,
            created_at: now,
        })
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, username, password_hash, role, created_at
                 FROM users WHERE username = ?",
                [username],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        match rows.next().await.map_err(db_err)? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, username, password_hash, role, created_at
                 FROM users ORDER BY created_at ASC, rowid ASC",
                (),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query users: {}", e)))?;

        let mut users = Vec::new();
        while let Some(row) = rows.next().await.map_err(db_err)? {
            users.push(row_to_user(&row)?);
        }

        Ok(users)
    }
}

/// One named collection inside the shared `items` table.
pub struct TursoCollection {
    name: String,
    conn: Connection,
}

fn parse_fields(data: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(data) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(AppError::Database("Stored item is not an object".to_string())),
        Err(e) => Err(AppError::Database(format!("Corrupt item data: {}", e))),
    }
}

fn encode_fields(mut fields: Map<String, Value>) -> Result<String> {
    // Ids are assigned by the store, never taken from the body.
    fields.remove("id");
    serde_json::to_string(&fields)
        .map_err(|e| AppError::Internal(format!("Failed to encode item: {}", e)))
}

fn row_to_item(row: &Row) -> Result<Item> {
    let data: String = row.get(1).map_err(db_err)?;
    Ok(Item {
        id: row.get(0).map_err(db_err)?,
        fields: parse_fields(&data)?,
    })
}

#[async_trait]
impl ResourceStore for TursoCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn create(&self, fields: Map<String, Value>) -> Result<Item> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().timestamp();
        let data = encode_fields(fields)?;

        self.conn
            .execute(
                "INSERT INTO items (id, collection, data, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?)",
                (id.as_str(), self.name.as_str(), data.as_str(), now, now),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to create item: {}", e)))?;

        Ok(Item {
            id,
            fields: parse_fields(&data)?,
        })
    }

    async fn find_all(&self) -> Result<Vec<Item>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, data FROM items WHERE collection = ?
                 ORDER BY created_at ASC, rowid ASC",
                [self.name.as_str()],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query items: {}", e)))?;

        let mut items = Vec::new();
        while let Some(row) = rows.next().await.map_err(db_err)? {
            items.push(row_to_item(&row)?);
        }

        Ok(items)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Item>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, data FROM items WHERE id = ? AND collection = ?",
                [id, self.name.as_str()],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query item: {}", e)))?;

        match rows.next().await.map_err(db_err)? {
            Some(row) => Ok(Some(row_to_item(&row)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, id: &str, fields: Map<String, Value>) -> Result<Option<Item>> {
        let patch = encode_fields(fields)?;
        let now = Utc::now().timestamp();

        let mut rows = self
            .conn
            .query(
                "UPDATE items SET data = json_patch(data, ?), updated_at = ?
                 WHERE id = ? AND collection = ?
                 RETURNING id, data",
                (patch.as_str(), now, id, self.name.as_str()),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to update item: {}", e)))?;

        match rows.next().await.map_err(db_err)? {
            Some(row) => Ok(Some(row_to_item(&row)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut rows = self
            .conn
            .query(
                "DELETE FROM items WHERE id = ? AND collection = ? RETURNING id",
                [id, self.name.as_str()],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete item: {}", e)))?;

        Ok(rows.next().await.map_err(db_err)?.is_some())
    }
}
