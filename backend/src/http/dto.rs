//! Data Transfer Objects for the HTTP API.
//!
//! Items travel as [`ShoppingItem`] directly; the JSON shape is
//! `{"name": string, "amount": integer}`.

use serde::{Deserialize, Serialize};

pub use super::error::ApiError;
pub use crate::models::ShoppingItem;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,
    /// Database connection status
    pub database: String,
}

/// Plain confirmation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
