//! Generic collection CRUD handlers.
//!
//! The same handlers back `/api/v1` (open) and `/api/v2` (bearer + role
//! permission); by the time a v2 request reaches them it is authorized.

use crate::{
    api::extract::JsonBody,
    types::{AppError, Result},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Map, Value};

fn into_fields(body: Value) -> Result<Map<String, Value>> {
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err(AppError::InvalidInput(
            "Request body must be a JSON object".to_string(),
        )),
    }
}

fn item_not_found(collection: &str, id: &str) -> AppError {
    AppError::NotFound(format!("No {} item with id '{}'", collection, id))
}

/// Create an item in a collection.
#[utoipa::path(
    post,
    path = "/api/v1/{collection}",
    params(("collection" = String, Path, description = "Collection name, e.g. food")),
    responses(
        (status = 201, description = "Created item with its assigned id"),
        (status = 400, description = "Body is not a JSON object"),
        (status = 404, description = "Unknown collection")
    ),
    tag = "resources"
)]
pub async fn create_item(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    JsonBody(body): JsonBody<Value>,
) -> Result<(StatusCode, Json<Value>)> {
    let store = state.collections.get(&collection)?;
    let item = store.create(into_fields(body)?).await?;

    tracing::debug!(%collection, id = %item.id, "item created");
    Ok((StatusCode::CREATED, Json(item.into_json())))
}

/// List every item in a collection.
#[utoipa::path(
    get,
    path = "/api/v1/{collection}",
    params(("collection" = String, Path, description = "Collection name")),
    responses(
        (status = 200, description = "All items"),
        (status = 404, description = "Unknown collection")
    ),
    tag = "resources"
)]
pub async fn list_items(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Result<Json<Vec<Value>>> {
    let store = state.collections.get(&collection)?;
    let items = store.find_all().await?;

    Ok(Json(items.into_iter().map(|item| item.into_json()).collect()))
}

/// Fetch one item.
#[utoipa::path(
    get,
    path = "/api/v1/{collection}/{id}",
    params(
        ("collection" = String, Path, description = "Collection name"),
        ("id" = String, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "The item"),
        (status = 404, description = "Unknown collection or item")
    ),
    tag = "resources"
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Value>> {
    let store = state.collections.get(&collection)?;

    store
        .find_by_id(&id)
        .await?
        .map(|item| Json(item.into_json()))
        .ok_or_else(|| item_not_found(&collection, &id))
}

/// Merge new field values into an item.
#[utoipa::path(
    put,
    path = "/api/v1/{collection}/{id}",
    params(
        ("collection" = String, Path, description = "Collection name"),
        ("id" = String, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "The updated item"),
        (status = 400, description = "Body is not a JSON object"),
        (status = 404, description = "Unknown collection or item")
    ),
    tag = "resources"
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<Value>> {
    let store = state.collections.get(&collection)?;

    store
        .update(&id, into_fields(body)?)
        .await?
        .map(|item| Json(item.into_json()))
        .ok_or_else(|| item_not_found(&collection, &id))
}

/// Delete an item. Responds with an empty object.
#[utoipa::path(
    delete,
    path = "/api/v1/{collection}/{id}",
    params(
        ("collection" = String, Path, description = "Collection name"),
        ("id" = String, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Unknown collection or item")
    ),
    tag = "resources"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Value>> {
    let store = state.collections.get(&collection)?;

    if !store.delete(&id).await? {
        return Err(item_not_found(&collection, &id));
    }

    tracing::debug!(%collection, %id, "item deleted");
    Ok(Json(json!({})))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_objects_are_accepted() {
        assert!(into_fields(json!({"name": "food"})).is_ok());

        for body in [json!([1, 2]), json!("food"), json!(42), Value::Null] {
            assert!(matches!(into_fields(body), Err(AppError::InvalidInput(_))));
        }
    }
}
