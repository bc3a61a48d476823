//! # Portal
//!
//! A CRUD API server with two tiers: an open `/api/v1` surface and an
//! `/api/v2` surface gated by bearer tokens and per-role permissions, plus
//! `/signup` and `/signin` endpoints that issue those tokens.
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use portal::{api::routes::create_router, AppState, PortalConfig};
//! use portal::db::DatabaseProvider;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = PortalConfig::load("portal.toml")?;
//!     let db = DatabaseProvider::from_url(&config.database.url)
//!         .create_client()
//!         .await?;
//!
//!     let state = AppState::new(config, db)?;
//!     let app = create_router(state);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3001").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST handlers and the router
//! - [`auth`] - password hashing, tokens, permission policy, middleware
//! - [`db`] - credential and collection stores (libsql)
//! - [`types`] - request/response types and the error taxonomy
//! - [`utils`] - configuration and logging
//! - [`cli`] - command-line interface for the server binary

#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Authentication and authorization core.
pub mod auth;
/// Command-line interface.
pub mod cli;
/// Credential and collection storage.
pub mod db;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration and logging utilities.
pub mod utils;

// Re-export commonly used types
pub use auth::jwt::TokenService;
pub use db::{CollectionRegistry, CredentialStore, TursoClient};
pub use types::{AppError, Result};
pub use utils::toml_config::{ConfigError, PortalConfig};

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Immutable configuration loaded at startup
    pub config: Arc<PortalConfig>,
    /// User identity storage
    pub credentials: Arc<dyn CredentialStore>,
    /// Collection name to store mapping
    pub collections: Arc<CollectionRegistry>,
    /// Token issuance and verification
    pub token_service: Arc<TokenService>,
}

impl AppState {
    /// Wires the stores and token service from a loaded configuration.
    ///
    /// Fails if the signing secret is not available, so a misconfigured
    /// process never starts serving.
    pub fn new(
        config: PortalConfig,
        db: Arc<TursoClient>,
    ) -> std::result::Result<Self, ConfigError> {
        let secret = config.jwt_secret()?;
        let token_service = TokenService::new(&secret, config.auth.token_ttl_secs);
        let collections = CollectionRegistry::from_names(&db, &config.collections.names);

        tracing::info!(
            collections = ?collections.names(),
            token_ttl_secs = config.auth.token_ttl_secs,
            "application state ready"
        );

        Ok(Self {
            config: Arc::new(config),
            credentials: db,
            collections: Arc::new(collections),
            token_service: Arc::new(token_service),
        })
    }
}
