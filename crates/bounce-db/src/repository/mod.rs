//! # Repository Module
//!
//! ```text
//! CLI command
//!      │  db.catalog().list_by_kind(ProductKind::Rental)
//!      │  db.orders().insert(&draft)
//!      ▼
//! CatalogRepository / OrderRepository
//!      │  SQL
//!      ▼
//! SQLite
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`](catalog::CatalogRepository) - Rental items, extras and mixers
//! - [`OrderRepository`](order::OrderRepository) - Orders, line items and PayPal captures

pub mod catalog;
pub mod order;
