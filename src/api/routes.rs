use crate::api::handlers::{auth, health, resources};
use crate::api::ApiDoc;
use crate::auth::middleware::{bearer_auth, enforce_operation, enforce_permission};
use crate::auth::permissions::Operation;
use crate::AppState;
use axum::{
    extract::Request,
    middleware::{self, Next},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

fn collection_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{collection}",
            get(resources::list_items).post(resources::create_item),
        )
        .route(
            "/{collection}/{id}",
            get(resources::get_item)
                .put(resources::update_item)
                .delete(resources::delete_item),
        )
}

/// Builds the full application router.
pub fn create_router(state: AppState) -> Router {
    let token_service = state.token_service.clone();

    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/health", get(health::health))
        .route("/signup", post(auth::signup))
        .route("/signin", post(auth::signin))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .nest("/api/v1", collection_routes());

    // Layers run bottom-up: bearer_auth first, then the permission check.
    let v2_routes = collection_routes()
        .route_layer(middleware::from_fn(enforce_permission))
        .route_layer(middleware::from_fn_with_state(
            token_service.clone(),
            bearer_auth,
        ));

    let admin_routes = Router::new()
        .route("/users", get(auth::list_users))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            enforce_operation(Operation::Delete, req, next)
        }))
        .route_layer(middleware::from_fn_with_state(
            token_service.clone(),
            bearer_auth,
        ));

    let token_routes = Router::new()
        .route("/secret", get(auth::secret))
        .route_layer(middleware::from_fn_with_state(token_service, bearer_auth));

    public_routes
        .nest("/api/v2", v2_routes)
        .merge(admin_routes)
        .merge(token_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
