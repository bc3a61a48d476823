//! Authentication and Authorization
//!
//! This module is the authorization core of Portal: credential verification,
//! token issuance/validation, and the role permission policy.
//!
//! # Module Structure
//!
//! - [`auth::password`](crate::auth::password) - Argon2id hashing and verification
//! - [`auth::jwt`](crate::auth::jwt) - HS256 token issuance and verification
//! - [`auth::permissions`](crate::auth::permissions) - closed role/operation table
//! - [`auth::middleware`](crate::auth::middleware) - Axum layers and extractors
//!
//! # Request pipelines
//!
//! `POST /signin` reads an `Authorization: Basic` header through the
//! [`BasicCredentials`](crate::auth::middleware::BasicCredentials) extractor.
//! Not-found users and wrong passwords produce the same response.
//!
//! Every `/api/v2` request passes two layers:
//!
//! ```text
//! Received -> TokenExtracted -> TokenVerified -> PermissionChecked -> Dispatched
//! ```
//!
//! `bearer_auth` covers the first three transitions (401 on failure) and
//! `enforce_permission` the fourth (403 on failure).
//!
//! ```ignore
//! use portal::auth::middleware::{bearer_auth, enforce_permission};
//!
//! let v2 = Router::new()
//!     .route("/{collection}", get(handler))
//!     .route_layer(middleware::from_fn(enforce_permission))
//!     .route_layer(middleware::from_fn_with_state(token_service, bearer_auth));
//! ```
//!
//! # Configuration
//!
//! Configure via `portal.toml`:
//! ```toml
//! [auth]
//! jwt_secret_env = "SECRET"   # Name of the env var holding the signing secret
//! token_ttl_secs = 86400      # Token validity duration
//! ```

/// Token issuance and verification.
pub mod jwt;
/// Authentication middleware and extractors for protected routes.
pub mod middleware;
/// Password hashing and verification.
pub mod password;
/// Role-based permission policy.
pub mod permissions;
