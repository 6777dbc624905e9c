pub mod shopping_item;

pub use shopping_item::*;
