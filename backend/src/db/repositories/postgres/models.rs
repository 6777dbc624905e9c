use diesel::prelude::*;

use super::schema::shopping_items;
use crate::models::ShoppingItem;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = shopping_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ShoppingItemRow {
    pub name: String,
    pub amount: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = shopping_items)]
pub struct NewShoppingItemRow<'a> {
    pub name: &'a str,
    pub amount: i32,
}

impl From<ShoppingItemRow> for ShoppingItem {
    fn from(row: ShoppingItemRow) -> Self {
        ShoppingItem {
            name: row.name,
            amount: row.amount,
        }
    }
}

impl<'a> From<&'a ShoppingItem> for NewShoppingItemRow<'a> {
    fn from(item: &'a ShoppingItem) -> Self {
        NewShoppingItemRow {
            name: &item.name,
            amount: item.amount,
        }
    }
}
