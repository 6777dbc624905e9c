//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for validation and persistence.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{HealthResponse, MessageResponse, ShoppingItem};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Reports whether the backing store answers a trivial query.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => Ok(Json(HealthResponse {
            status: "OK".to_string(),
            database: "connected".to_string(),
        })),
        Ok(false) => Err(AppError::ServiceUnavailable(
            "Database connection failed".to_string(),
        )),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            Err(AppError::ServiceUnavailable(
                "Database connection failed".to_string(),
            ))
        }
    }
}

// =============================================================================
// Item CRUD
// =============================================================================

/// GET /items
///
/// List every item. An empty store yields `[]`.
pub async fn list_items(State(state): State<AppState>) -> HandlerResult<Vec<ShoppingItem>> {
    let items = db_services::list_items(state.repository.as_ref()).await?;
    Ok(Json(items))
}

/// GET /items/{name}
pub async fn get_item(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> HandlerResult<ShoppingItem> {
    let item = db_services::get_item(state.repository.as_ref(), &name).await?;
    Ok(Json(item))
}

/// POST /items
///
/// Create a new item and echo it back with 201.
pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<ShoppingItem>, JsonRejection>,
) -> Result<(StatusCode, Json<ShoppingItem>), AppError> {
    let Json(item) = payload?;
    let created = db_services::create_item(state.repository.as_ref(), &item).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /items/{name}
///
/// Replace the amount of the item keyed by `name`. A non-empty body name
/// different from the path renames the item.
pub async fn update_item(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<ShoppingItem>, JsonRejection>,
) -> HandlerResult<ShoppingItem> {
    let Json(item) = payload?;
    let updated = db_services::update_item(state.repository.as_ref(), &name, &item).await?;
    Ok(Json(updated))
}

/// DELETE /items/{name}
pub async fn delete_item(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> HandlerResult<MessageResponse> {
    db_services::delete_item(state.repository.as_ref(), &name).await?;
    Ok(Json(MessageResponse::new("Item deleted")))
}
