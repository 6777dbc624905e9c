//! In-memory local repository implementation.
//!
//! Items live in a `HashMap` keyed by name behind an `RwLock`, which gives
//! the same per-operation atomicity the database gives per statement. Used
//! for unit tests and for running the server without a database.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::db::repository::{ErrorContext, ItemRepository, RepositoryError, RepositoryResult};
use crate::models::ShoppingItem;

/// In-memory local repository.
///
/// # Example
/// ```
/// use shopping_api::db::repositories::LocalRepository;
/// use shopping_api::db::ItemRepository;
/// use shopping_api::models::ShoppingItem;
///
/// # let rt = tokio::runtime::Runtime::new().unwrap();
/// # rt.block_on(async {
/// let repo = LocalRepository::new();
/// repo.create_item(&ShoppingItem::new("Milk", 2)).await.unwrap();
///
/// let items = repo.list_items().await.unwrap();
/// assert_eq!(items.len(), 1);
/// # });
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    items: HashMap<String, i32>,
    schema_ready: bool,
    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
            schema_ready: false,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository pre-populated with `items`.
    ///
    /// Later entries win when names repeat.
    pub fn with_items(items: impl IntoIterator<Item = ShoppingItem>) -> Self {
        let repo = Self::new();
        if let Ok(mut data) = repo.data.write() {
            for item in items {
                data.items.insert(item.name, item.amount);
            }
        }
        repo
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        if let Ok(mut data) = self.data.write() {
            data.is_healthy = healthy;
        }
    }

    /// Clear all items from the repository.
    pub fn clear(&self) {
        if let Ok(mut data) = self.data.write() {
            data.items.clear();
        }
    }

    /// Get the number of items stored.
    pub fn item_count(&self) -> usize {
        self.data.read().map(|d| d.items.len()).unwrap_or(0)
    }

    /// Check if an item exists.
    pub fn has_item(&self, name: &str) -> bool {
        self.data
            .read()
            .map(|d| d.items.contains_key(name))
            .unwrap_or(false)
    }

    /// Stored amount for `name`, bypassing the health flag.
    pub fn get_item_amount(&self, name: &str) -> Option<i32> {
        self.data
            .read()
            .ok()
            .and_then(|d| d.items.get(name).copied())
    }

    /// Whether `ensure_schema` has run at least once.
    pub fn schema_ready(&self) -> bool {
        self.data.read().map(|d| d.schema_ready).unwrap_or(false)
    }

    fn read(&self, operation: &str) -> RepositoryResult<RwLockReadGuard<'_, LocalData>> {
        self.data.read().map_err(|_| {
            RepositoryError::internal_with_context("Store lock poisoned", ErrorContext::new(operation))
        })
    }

    fn write(&self, operation: &str) -> RepositoryResult<RwLockWriteGuard<'_, LocalData>> {
        self.data.write().map_err(|_| {
            RepositoryError::internal_with_context("Store lock poisoned", ErrorContext::new(operation))
        })
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(data: &LocalData, operation: &str) -> RepositoryResult<()> {
        if !data.is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Database is not healthy",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let data = self.read("health_check")?;
        Ok(data.is_healthy)
    }

    async fn ensure_schema(&self) -> RepositoryResult<()> {
        let mut data = self.write("ensure_schema")?;
        Self::check_health(&data, "ensure_schema")?;
        data.schema_ready = true;
        Ok(())
    }

    async fn get_item(&self, name: &str) -> RepositoryResult<ShoppingItem> {
        let data = self.read("get_item")?;
        Self::check_health(&data, "get_item")?;

        data.items
            .get(name)
            .map(|amount| ShoppingItem::new(name, *amount))
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    "Item not found",
                    ErrorContext::item("get_item", name),
                )
            })
    }

    async fn list_items(&self) -> RepositoryResult<Vec<ShoppingItem>> {
        let data = self.read("list_items")?;
        Self::check_health(&data, "list_items")?;

        Ok(data
            .items
            .iter()
            .map(|(name, amount)| ShoppingItem::new(name.clone(), *amount))
            .collect())
    }

    async fn create_item(&self, item: &ShoppingItem) -> RepositoryResult<ShoppingItem> {
        let mut data = self.write("create_item")?;
        Self::check_health(&data, "create_item")?;

        if data.items.contains_key(&item.name) {
            return Err(RepositoryError::conflict_with_context(
                "Item already exists",
                ErrorContext::item("create_item", &item.name),
            ));
        }

        data.items.insert(item.name.clone(), item.amount);
        Ok(item.clone())
    }

    async fn update_item(
        &self,
        name: &str,
        item: &ShoppingItem,
    ) -> RepositoryResult<ShoppingItem> {
        let mut data = self.write("update_item")?;
        Self::check_health(&data, "update_item")?;

        if !data.items.contains_key(name) {
            return Err(RepositoryError::not_found_with_context(
                "Item not found",
                ErrorContext::item("update_item", name),
            ));
        }

        if item.name != name && data.items.contains_key(&item.name) {
            return Err(RepositoryError::conflict_with_context(
                "Item already exists",
                ErrorContext::item("update_item", &item.name)
                    .with_details(format!("rename_from={}", name)),
            ));
        }

        data.items.remove(name);
        data.items.insert(item.name.clone(), item.amount);
        Ok(item.clone())
    }

    async fn delete_item(&self, name: &str) -> RepositoryResult<()> {
        let mut data = self.write("delete_item")?;
        Self::check_health(&data, "delete_item")?;

        match data.items.remove(name) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::not_found_with_context(
                "Item not found",
                ErrorContext::item("delete_item", name),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_get() {
        let repo = LocalRepository::new();
        let item = ShoppingItem::new("Milk", 2);

        repo.create_item(&item).await.unwrap();
        let fetched = repo.get_item("Milk").await.unwrap();

        assert_eq!(fetched, item);
    }

    #[tokio::test]
    async fn test_duplicate_create_keeps_existing_amount() {
        let repo = LocalRepository::new();
        repo.create_item(&ShoppingItem::new("Milk", 2)).await.unwrap();

        let err = repo
            .create_item(&ShoppingItem::new("Milk", 9))
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(repo.get_item("Milk").await.unwrap().amount, 2);
    }

    #[tokio::test]
    async fn test_list_empty() {
        let repo = LocalRepository::new();
        let items = repo.list_items().await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_creates_nothing() {
        let repo = LocalRepository::new();
        let err = repo
            .update_item("Bread", &ShoppingItem::new("Bread", 1))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(repo.item_count(), 0);
    }

    #[tokio::test]
    async fn test_update_renames_row() {
        let repo = LocalRepository::with_items([ShoppingItem::new("Milk", 2)]);

        let updated = repo
            .update_item("Milk", &ShoppingItem::new("Oat milk", 3))
            .await
            .unwrap();

        assert_eq!(updated, ShoppingItem::new("Oat milk", 3));
        assert!(!repo.has_item("Milk"));
        assert_eq!(repo.get_item("Oat milk").await.unwrap().amount, 3);
    }

    #[tokio::test]
    async fn test_rename_onto_existing_name_conflicts() {
        let repo = LocalRepository::with_items([
            ShoppingItem::new("Milk", 2),
            ShoppingItem::new("Eggs", 12),
        ]);

        let err = repo
            .update_item("Milk", &ShoppingItem::new("Eggs", 1))
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(repo.get_item("Milk").await.unwrap().amount, 2);
        assert_eq!(repo.get_item("Eggs").await.unwrap().amount, 12);
    }

    #[tokio::test]
    async fn test_delete_then_get_not_found() {
        let repo = LocalRepository::with_items([ShoppingItem::new("Milk", 2)]);

        repo.delete_item("Milk").await.unwrap();

        assert!(repo.get_item("Milk").await.unwrap_err().is_not_found());
        assert!(repo.delete_item("Milk").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_unhealthy_store_fails_operations() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);

        assert!(!repo.health_check().await.unwrap());
        let err = repo.list_items().await.unwrap_err();
        assert!(matches!(err, RepositoryError::ConnectionError { .. }));
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let repo = LocalRepository::with_items([ShoppingItem::new("Milk", 2)]);

        repo.ensure_schema().await.unwrap();
        repo.ensure_schema().await.unwrap();

        assert!(repo.schema_ready());
        assert_eq!(repo.item_count(), 1);
    }
}
