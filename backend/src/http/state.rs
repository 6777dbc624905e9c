//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repositories::LocalRepository;
use crate::db::repository::ItemRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Item store used by every handler
    pub repository: Arc<dyn ItemRepository>,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn ItemRepository>) -> Self {
        Self { repository }
    }

    /// State backed by a fresh in-memory repository.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(LocalRepository::new()))
    }
}
