//! # bounce-db: Database Layer for Bounce Checkout
//!
//! SQLite storage for the product catalog, submitted orders, their line
//! items and PayPal capture records.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Bounce Checkout Data Flow                           │
//! │                                                                         │
//! │  bounce-checkout submit cart.json                                      │
//! │       │  OrderDraft::from_checkout (bounce-core)                       │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    bounce-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ CatalogRepo    │   │  (embedded)  │  │   │
//! │  │   │  SqlitePool   │    │ OrderRepo      │   │ 001_init.sql │  │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                     bounce.db                                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Catalog and order repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bounce_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./bounce.db")).await?;
//! let rentals = db.catalog().list_by_kind(ProductKind::Rental).await?;
//! let stored = db.orders().insert(&draft).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::catalog::CatalogRepository;
pub use repository::order::{OrderRepository, StoredOrder, StoredOrderItem};
