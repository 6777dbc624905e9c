//! HTTP error handling and response types.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;

/// API error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message
    pub error: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error or undecodable body)
    BadRequest(String),
    /// Backing store unreachable
    ServiceUnavailable(String),
    /// Repository error, classified by variant
    Repository(RepositoryError),
}

impl AppError {
    /// Status code this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Repository(e) => match e {
                RepositoryError::NotFound { .. } => StatusCode::NOT_FOUND,
                RepositoryError::ConflictError { .. } => StatusCode::CONFLICT,
                RepositoryError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

/// Client-facing message for a store failure that is not the caller's fault.
///
/// The detailed cause is logged, never returned.
fn failure_message(err: &RepositoryError) -> &'static str {
    match err.context().operation.as_deref() {
        Some("create_item") => "Failed to add item",
        Some("update_item") => "Failed to update item",
        Some("delete_item") => "Failed to delete item",
        Some("get_item") => "Failed to retrieve item",
        Some("list_items") => "Failed to retrieve items",
        _ => "Internal server error",
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            AppError::BadRequest(msg) | AppError::ServiceUnavailable(msg) => ApiError::new(msg),
            AppError::Repository(e) => match e {
                RepositoryError::NotFound { .. } => ApiError::new("Item not found"),
                RepositoryError::ConflictError { .. } => ApiError::new("Item already exists"),
                RepositoryError::ValidationError { ref message, .. } => {
                    ApiError::new(message.clone())
                }
                other => {
                    tracing::error!(error = %other, "repository failure");
                    ApiError::new(failure_message(&other))
                }
            },
        };

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "rejected request body");
        AppError::BadRequest("Invalid request payload".to_string())
    }
}
