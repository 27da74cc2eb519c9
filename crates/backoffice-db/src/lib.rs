//! # backoffice-db: Record Store for the Back-Office Engine
//!
//! SQLite persistence for catalogue, inventory and sales, plus the
//! aggregate queries behind the analytics reports. Async access via sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Back-Office Data Flow                            │
//! │                                                                         │
//! │  Query facade command (backoffice-api)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   backoffice-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐   ┌───────────┐  │   │
//! │  │   │   Database    │    │    Repositories    │   │ Migrations│  │   │
//! │  │   │   (pool.rs)   │    │                    │   │ (embedded)│  │   │
//! │  │   │               │    │ Category / Product │   │           │  │   │
//! │  │   │ SqlitePool    │◄───│ Inventory tracker  │   │ 001_init  │  │   │
//! │  │   │               │    │ Sales recorder     │   │           │  │   │
//! │  │   │               │    │ Analytics          │   │           │  │   │
//! │  │   └───────────────┘    └────────────────────┘   └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use backoffice_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("backoffice.db")).await?;
//! let sale = db.sales().record(&new_sale).await?;
//! let buckets = db.analytics().revenue_by_period(Period::Monthly).await?;
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

pub use repository::analytics::AnalyticsRepository;
pub use repository::category::CategoryRepository;
pub use repository::inventory::InventoryRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
