//! Database module for shopping item storage.
//!
//! This module provides abstractions for database operations via the Repository pattern,
//! allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API)                           │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - Business Logic           │
//! │  - Input validation                                     │
//! │  - Outcome logging                                      │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/) - Abstract Interface    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴────────────────┐
//!     │                                │
//! ┌───▼────────────────┐   ┌───────────▼─────────────┐
//! │ Postgres Repository│   │ Local Repository        │
//! │ (Diesel + r2d2)    │   │ (in-memory)             │
//! └────────────────────┘   └─────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```ignore
//! use shopping_api::db::{services, RepositoryFactory};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositoryFactory::from_env().await?;
//!     let items = services::list_items(repo.as_ref()).await?;
//!     Ok(())
//! }
//! ```
//!
//! There is no process-wide repository: the binary builds one at startup and
//! hands it to the HTTP layer through `AppState`.

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod config;
pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

pub use config::{ConnectionParams, PostgresConfig};
#[cfg(feature = "postgres-repo")]
pub use repositories::PoolStats;

pub use services::{
    create_item, delete_item, get_item, health_check, list_items, update_item, validate_item,
    ValidationMode,
};

pub use repo_config::RepositoryConfig;

// Repository trait and implementations
pub use factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{ErrorContext, ItemRepository, RepositoryError, RepositoryResult};
