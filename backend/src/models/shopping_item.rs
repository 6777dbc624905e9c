//! Shopping item domain type.

use serde::{Deserialize, Serialize};

/// A single entry on the shopping list.
///
/// `name` is the primary key: two stored items never share a name.
/// `amount` is strictly positive for every stored item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShoppingItem {
    /// Item name, unique across the list
    pub name: String,
    /// Quantity to buy
    pub amount: i32,
}

impl ShoppingItem {
    pub fn new(name: impl Into<String>, amount: i32) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }

    /// Returns a copy of this item stored under `name`.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount: self.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let item = ShoppingItem::new("Milk", 2);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Milk", "amount": 2}));
    }

    #[test]
    fn test_missing_amount_is_rejected() {
        let result: Result<ShoppingItem, _> = serde_json::from_str(r#"{"name":"Milk"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_amount_out_of_range_is_rejected() {
        let result: Result<ShoppingItem, _> =
            serde_json::from_str(r#"{"name":"Milk","amount":99999999999}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_renamed_keeps_amount() {
        let item = ShoppingItem::new("Milk", 3).renamed("Oat milk");
        assert_eq!(item.name, "Oat milk");
        assert_eq!(item.amount, 3);
    }
}
