//! HTTP server module for the shopping list API.
//!
//! This module provides an axum-based HTTP server that exposes the item
//! service as a JSON REST API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Request parsing and JSON bodies                        │
//! │  - CORS, compression, error mapping                       │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (db::services)                             │
//! │  - Validation rules                                       │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (db::repositories)                      │
//! │  - LocalRepository / PostgresRepository                   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Endpoints
//!
//! | Method | Path            | Success                               |
//! |--------|-----------------|---------------------------------------|
//! | GET    | `/health`       | 200 `{"status":"OK","database":"connected"}` |
//! | GET    | `/items`        | 200 array of items                    |
//! | POST   | `/items`        | 201 created item                      |
//! | GET    | `/items/{name}` | 200 item                              |
//! | PUT    | `/items/{name}` | 200 updated item                      |
//! | DELETE | `/items/{name}` | 200 `{"message":"Item deleted"}`      |
//!
//! Item routes are also served under `/api/shoppingItems`.

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use config::{CorsOrigins, ServerConfig};
pub use error::{ApiError, AppError};
pub use router::{build_router, create_router};
pub use state::AppState;
