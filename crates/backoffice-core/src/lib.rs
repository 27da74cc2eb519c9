//! # backoffice-core: Pure Domain Logic for the Back-Office Engine
//!
//! This crate holds every calculation the aggregation engine performs that
//! does not need a database: money arithmetic, input validation, period
//! bucketing and the revenue/summary math.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Back-Office Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 backoffice-api (Query Facade)                   │   │
//! │  │   create_sale, list_sales, sales_summary, revenue_by_period     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 backoffice-db (Record Store)                    │   │
//! │  │   InventoryRepository, SaleRepository, AnalyticsRepository      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ backoffice-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ analytics │  │ validation│  │   │
//! │  │   │  Product  │  │Money,Price│  │  Period   │  │   rules   │  │   │
//! │  │   │   Sale    │  │  rounding │  │  buckets  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Category, Product, Inventory, Sale, ...)
//! - [`money`] - Money (integer cents) and Price (exact decimal)
//! - [`analytics`] - Period bucketing and summary math
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use backoffice_core::money::Price;
//!
//! let unit_price = Price::from_cents(1099); // 10.99
//! let line_total = unit_price.line_total(3).unwrap();
//! assert_eq!(line_total.cents(), 3297);
//! assert_eq!(line_total.to_string(), "32.97");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use analytics::{Period, RevenueBucket};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Price};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Low-stock threshold applied when none is given.
///
/// Used both as the default `low_stock_threshold` of a new inventory row and
/// as the default threshold of the low-stock report.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Default page size for list operations.
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Maximum length of a category name.
pub const MAX_CATEGORY_NAME_LEN: usize = 100;

/// Maximum length of a product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 255;

/// Maximum length of a payment method label.
pub const MAX_PAYMENT_METHOD_LEN: usize = 50;

/// Maximum length of a customer email.
pub const MAX_EMAIL_LEN: usize = 255;
