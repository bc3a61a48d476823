//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer for Portal, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! ## Authentication
//! - `POST /signup` - Register a user, returns `{user, token}`
//! - `POST /signin` - Basic-auth login, returns `{user, token}`
//! - `GET /users` - List usernames (bearer, `delete` capability)
//! - `GET /secret` - Any valid bearer token
//!
//! ## Collections
//! - `POST /api/v1/{collection}` - Create item
//! - `GET /api/v1/{collection}` - List items
//! - `GET /api/v1/{collection}/{id}` - Get item
//! - `PUT /api/v1/{collection}/{id}` - Update item
//! - `DELETE /api/v1/{collection}/{id}` - Delete item
//!
//! `/api/v2/...` mirrors v1 and requires `Authorization: Bearer <token>`
//! plus the role permission for the method's operation.
//!
//! ## Health
//! - `GET /health` - Health check endpoint
//!
//! # OpenAPI Documentation
//!
//! The generated document is served at `/api-docs/openapi.json`.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

/// Request extractors.
pub mod extract;
/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

/// OpenAPI description of the public surface.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::auth::signup,
        handlers::auth::signin,
        handlers::auth::list_users,
        handlers::auth::secret,
        handlers::resources::create_item,
        handlers::resources::list_items,
        handlers::resources::get_item,
        handlers::resources::update_item,
        handlers::resources::delete_item,
    ),
    components(schemas(
        crate::types::SignupRequest,
        crate::types::AuthResponse,
        crate::types::UserResponse,
        crate::types::MessageResponse,
        crate::auth::permissions::Role,
        crate::auth::permissions::Operation,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Signup, signin and token-gated account routes"),
        (name = "resources", description = "Collection CRUD; mirrored under /api/v2 with bearer auth"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "basic",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Basic).build()),
            );
        }
    }
}
