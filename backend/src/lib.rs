//! # Shopping API
//!
//! A small JSON REST service managing a shopping list.
//!
//! Each item is a `(name, amount)` pair keyed by its name. Items are stored
//! in PostgreSQL (via Diesel) or in an in-memory store for development and
//! tests.
//!
//! ## Architecture
//!
//! - [`models`]: The [`models::ShoppingItem`] record
//! - [`db`]: Repository trait, backends, factory and the validating service layer
//! - `http`: Axum router, handlers and error mapping (feature `http-server`)

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod db;
pub mod models;

#[cfg(feature = "http-server")]
pub mod http;
