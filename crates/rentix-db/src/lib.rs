//! # rentix-db: Storage Layer for rentix
//!
//! This crate provides database access and the transaction service for the
//! rentix system. It uses SQLite for local storage with sqlx for async
//! operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        rentix Data Flow                                 │
//! │                                                                         │
//! │  Caller (CLI / tests)                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     rentix-db (THIS CRATE)                      │    │
//! │  │                                                                 │    │
//! │  │   ┌──────────────────┐     ┌─────────────────────────────┐      │    │
//! │  │   │ TransactionService│───►│ ProductRepository           │      │    │
//! │  │   │  (service.rs)    │     │  stock check-then-write     │      │    │
//! │  │   │  lifecycle rules │     ├─────────────────────────────┤      │    │
//! │  │   │  line protocol   │───►│ TransactionRepository<K>     │      │    │
//! │  │   └──────────────────┘     │  headers + lines            │      │    │
//! │  │                            │  EntityCache<Transaction<K>>│      │    │
//! │  │   ┌───────────────┐        └─────────────────────────────┘      │    │
//! │  │   │   Database    │    ┌──────────────┐                         │    │
//! │  │   │   (pool.rs)   │    │  Migrations  │                         │    │
//! │  │   │  SqlitePool   │    │  (embedded)  │                         │    │
//! │  │   └───────────────┘    └──────────────┘                         │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (or :memory: in tests)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and the `Database` handle
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage-tier error types
//! - [`cache`] - Id-keyed entity cache
//! - [`repository`] - Repository implementations (product, transaction)
//! - [`service`] - The transaction service (the caller-facing API)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rentix_db::{Database, DbConfig, TransactionService};
//! use rentix_core::Quantity;
//!
//! let db = Database::new(DbConfig::new("path/to/rentix.db")).await?;
//!
//! let sales = TransactionService::new(db.products(), db.sales());
//! let mut sale = sales.open(()).await?;
//! sales.add_line_item(&mut sale, "CAM-1", Quantity::from_units(2)).await?;
//! sales.close(&mut sale).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cache;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use cache::EntityCache;
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use service::{RentalService, SaleService, ServiceError, ServiceResult, TransactionService};

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::transaction::{TransactionRepository, TransactionSchema};
