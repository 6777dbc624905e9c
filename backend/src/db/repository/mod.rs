//! Repository trait definitions for database operations.
//!
//! - [`error`]: Error types for repository operations
//! - [`item`]: CRUD operations over the shopping item table
//!
//! Handlers and services only ever see `dyn ItemRepository`, so the
//! Postgres and in-memory backends are interchangeable at startup.

pub mod error;
pub mod item;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use item::ItemRepository;
