//! Shopping item repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::ShoppingItem;

/// Repository trait for the shopping item table.
///
/// Every write is a single statement. Implementations report zero affected
/// rows as [`RepositoryError::NotFound`](super::RepositoryError::NotFound) and
/// primary-key collisions as
/// [`RepositoryError::ConflictError`](super::RepositoryError::ConflictError).
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so one instance can serve every
/// in-flight request.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    // ==================== Health & Schema ====================

    /// Check if the backing store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the store answered
    /// - `Ok(false)` if it is known to be unavailable
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Create the item table if it does not exist yet.
    ///
    /// Safe to call on every start; an existing table is left untouched.
    async fn ensure_schema(&self) -> RepositoryResult<()>;

    // ==================== Item Operations ====================

    /// Fetch one item by its exact name.
    ///
    /// # Returns
    /// * `Ok(ShoppingItem)` - The stored item
    /// * `Err(RepositoryError::NotFound)` - If no row has that name
    async fn get_item(&self, name: &str) -> RepositoryResult<ShoppingItem>;

    /// List every stored item. Order is unspecified.
    ///
    /// An empty table yields an empty vector.
    async fn list_items(&self) -> RepositoryResult<Vec<ShoppingItem>>;

    /// Insert a new item.
    ///
    /// # Returns
    /// * `Ok(ShoppingItem)` - The stored item
    /// * `Err(RepositoryError::ConflictError)` - If the name is taken
    async fn create_item(&self, item: &ShoppingItem) -> RepositoryResult<ShoppingItem>;

    /// Overwrite the row keyed by `name` with `item`.
    ///
    /// `item.name` becomes the row's new key, so a different name renames
    /// the row.
    ///
    /// # Returns
    /// * `Ok(ShoppingItem)` - The row as stored after the update
    /// * `Err(RepositoryError::NotFound)` - If no row has `name`
    /// * `Err(RepositoryError::ConflictError)` - If `item.name` belongs to another row
    async fn update_item(&self, name: &str, item: &ShoppingItem)
        -> RepositoryResult<ShoppingItem>;

    /// Delete the row keyed by `name`.
    ///
    /// # Returns
    /// * `Ok(())` - One row was removed
    /// * `Err(RepositoryError::NotFound)` - If no row has `name`
    async fn delete_item(&self, name: &str) -> RepositoryResult<()>;
}
