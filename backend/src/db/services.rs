//! High-level database service layer.
//!
//! Repository-agnostic operations over shopping items. Business rules live
//! here so that every backend rejects the same inputs: nothing invalid ever
//! reaches a repository.
//!
//! # Usage
//!
//! ```no_run
//! use shopping_api::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!
//!     let items = services::list_items(&repo).await?;
//!     println!("Found {} items", items.len());
//!
//!     Ok(())
//! }
//! ```

use log::{info, warn};

use super::repository::{ErrorContext, ItemRepository, RepositoryError, RepositoryResult};
use crate::models::ShoppingItem;

/// Which write an item is being validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// New item: name and amount are both required.
    Create,
    /// Replacement body: an empty name keeps the current one.
    Update,
}

/// Check an item against the write rules.
///
/// - `amount` must be strictly positive.
/// - On create, `name` must contain a non-whitespace character.
/// - On update, `name` may be empty (no rename) but not blank.
pub fn validate_item(item: &ShoppingItem, mode: ValidationMode) -> RepositoryResult<()> {
    let operation = match mode {
        ValidationMode::Create => "create_item",
        ValidationMode::Update => "update_item",
    };

    let name_required = mode == ValidationMode::Create || !item.name.is_empty();
    if name_required && item.name.trim().is_empty() {
        return Err(RepositoryError::validation_with_context(
            "Item name cannot be empty",
            ErrorContext::new(operation).with_entity("shopping_item"),
        ));
    }

    if item.amount <= 0 {
        return Err(RepositoryError::validation_with_context(
            "Amount must be greater than zero",
            ErrorContext::item(operation, &item.name)
                .with_details(format!("amount={}", item.amount)),
        ));
    }

    Ok(())
}

// ==================== Health & Connection ====================

/// Check if the database connection is healthy.
///
/// This is a simple pass-through to the repository's health check.
pub async fn health_check<R: ItemRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Item Operations ====================

/// Fetch one item by name.
pub async fn get_item<R: ItemRepository + ?Sized>(
    repo: &R,
    name: &str,
) -> RepositoryResult<ShoppingItem> {
    repo.get_item(name).await
}

/// List every item. Never returns an absent value: an empty table gives an
/// empty vector.
pub async fn list_items<R: ItemRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<ShoppingItem>> {
    repo.list_items().await
}

/// Validate and store a new item.
///
/// # Returns
/// * `Ok(ShoppingItem)` - The stored item
/// * `Err(RepositoryError::ValidationError)` - Empty name or non-positive amount
/// * `Err(RepositoryError::ConflictError)` - Name already taken
pub async fn create_item<R: ItemRepository + ?Sized>(
    repo: &R,
    item: &ShoppingItem,
) -> RepositoryResult<ShoppingItem> {
    validate_item(item, ValidationMode::Create)?;

    match repo.create_item(item).await {
        Ok(created) => {
            info!("Created item '{}' (amount={})", created.name, created.amount);
            Ok(created)
        }
        Err(e) => {
            if e.is_conflict() {
                warn!("Refused duplicate item '{}'", item.name);
            }
            Err(e)
        }
    }
}

/// Validate and apply a replacement body to the item keyed by `name`.
///
/// An empty `item.name` keeps the row's current name; any other name renames
/// the row.
///
/// # Returns
/// * `Ok(ShoppingItem)` - The item as stored after the update
/// * `Err(RepositoryError::ValidationError)` - Non-positive amount or blank name
/// * `Err(RepositoryError::NotFound)` - No item named `name`
/// * `Err(RepositoryError::ConflictError)` - Rename target already exists
pub async fn update_item<R: ItemRepository + ?Sized>(
    repo: &R,
    name: &str,
    item: &ShoppingItem,
) -> RepositoryResult<ShoppingItem> {
    validate_item(item, ValidationMode::Update)?;

    let target = if item.name.is_empty() {
        item.renamed(name)
    } else {
        item.clone()
    };

    let updated = repo.update_item(name, &target).await?;
    if updated.name != name {
        info!("Renamed item '{}' to '{}'", name, updated.name);
    }
    info!("Updated item '{}' (amount={})", updated.name, updated.amount);
    Ok(updated)
}

/// Delete the item keyed by `name`.
pub async fn delete_item<R: ItemRepository + ?Sized>(repo: &R, name: &str) -> RepositoryResult<()> {
    repo.delete_item(name).await?;
    info!("Deleted item '{}'", name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;

    #[test]
    fn test_validate_create_rejects_empty_name() {
        let err = validate_item(&ShoppingItem::new("", 1), ValidationMode::Create).unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
        assert_eq!(err.message(), "Item name cannot be empty");
    }

    #[test]
    fn test_validate_create_rejects_blank_name() {
        let err = validate_item(&ShoppingItem::new("   ", 1), ValidationMode::Create).unwrap_err();
        assert_eq!(err.message(), "Item name cannot be empty");
    }

    #[test]
    fn test_validate_rejects_non_positive_amount() {
        for amount in [0, -1, i32::MIN] {
            for mode in [ValidationMode::Create, ValidationMode::Update] {
                let err = validate_item(&ShoppingItem::new("Milk", amount), mode).unwrap_err();
                assert_eq!(err.message(), "Amount must be greater than zero");
            }
        }
    }

    #[test]
    fn test_validate_update_allows_empty_name() {
        assert!(validate_item(&ShoppingItem::new("", 3), ValidationMode::Update).is_ok());
        assert!(validate_item(&ShoppingItem::new(" ", 3), ValidationMode::Update).is_err());
    }

    #[tokio::test]
    async fn test_invalid_create_never_reaches_store() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);

        // An unhealthy store would answer with a connection error, so a
        // validation error proves the store was never called.
        let err = create_item(&repo, &ShoppingItem::new("Milk", 0))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
    }

    #[tokio::test]
    async fn test_update_with_empty_name_keeps_key() {
        let repo = LocalRepository::with_items([ShoppingItem::new("Milk", 2)]);

        let updated = update_item(&repo, "Milk", &ShoppingItem::new("", 7))
            .await
            .unwrap();

        assert_eq!(updated, ShoppingItem::new("Milk", 7));
        assert_eq!(repo.item_count(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = LocalRepository::new();
        let err = update_item(&repo, "Milk", &ShoppingItem::new("Milk", 5))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(repo.item_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let repo = LocalRepository::with_items([ShoppingItem::new("Eggs", 6)]);
        delete_item(&repo, "Eggs").await.unwrap();
        assert!(get_item(&repo, "Eggs").await.unwrap_err().is_not_found());
    }
}
