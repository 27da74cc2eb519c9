//! # Domain Types
//!
//! Core domain types used throughout the back-office engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │◄──│    Product      │◄──│   Inventory     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  product_id(PK) │       │
//! │  │  name           │   │  category_id    │   │  quantity       │       │
//! │  │  description    │   │  price          │   │  threshold      │       │
//! │  └─────────────────┘   └────────▲────────┘   └─────────────────┘       │
//! │                                 │                                       │
//! │  ┌─────────────────┐   ┌────────┴────────┐                             │
//! │  │      Sale       │◄──│    SaleItem     │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  id             │   │  sale_id        │                             │
//! │  │  sale_date      │   │  product_id     │                             │
//! │  │  total_amount   │   │  unit_price     │  (snapshot at sale time)    │
//! │  └─────────────────┘   │  total_price    │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Relations are plain foreign-key ids. Joins happen in the record store at
//! query time; no type here holds a reference to another entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Price};
use crate::validation;
use crate::{DEFAULT_LOW_STOCK_THRESHOLD, DEFAULT_PAGE_LIMIT};

// =============================================================================
// Category
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Input for creating a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Display name.
    pub name: String,

    pub description: Option<String>,

    /// Current list price, exact as entered.
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    #[ts(type = "number")]
    pub price: Price,

    /// Owning category (required).
    pub category_id: i64,
}

/// Input for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub category_id: i64,
}

// =============================================================================
// Inventory
// =============================================================================

/// Stock record of a single product.
///
/// At most one per product. A product without a row has never been stocked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Inventory {
    pub product_id: i64,
    pub quantity: i64,
    pub low_stock_threshold: i64,
    #[ts(as = "String")]
    pub last_updated: DateTime<Utc>,
}

/// Input for writing a product's stock level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StockUpdate {
    pub quantity: i64,
    /// Left unchanged on an existing row when `None`; defaults to
    /// [`DEFAULT_LOW_STOCK_THRESHOLD`] on a new row.
    pub low_stock_threshold: Option<i64>,
}

impl StockUpdate {
    /// Threshold used when the update creates the row.
    pub fn threshold_for_insert(&self) -> i64 {
        self.low_stock_threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD)
    }
}

/// One line of the low-stock report.
///
/// `threshold` echoes the row's own `low_stock_threshold`, whichever
/// threshold was used for filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct LowStockAlert {
    pub product_id: i64,
    pub product_name: String,
    pub current_quantity: i64,
    pub threshold: i64,
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale transaction.
///
/// Immutable once written. `total_amount_cents` equals the sum of the items'
/// `total_price_cents`; the recorder establishes this when the sale is
/// created and nothing rewrites it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,
    pub total_amount_cents: i64,
    pub payment_method: Option<String>,
    pub customer_email: Option<String>,
    /// Loaded separately from `sale_items`.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub items: Vec<SaleItem>,
}

impl Sale {
    /// Returns the stored total as Money.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

/// A line item in a sale.
/// Uses snapshot pattern to freeze the unit price at time of sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    /// Unit price at time of sale (frozen, exact).
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    #[ts(type = "number")]
    pub unit_price: Price,
    /// round(unit_price × quantity, 2) in cents.
    pub total_price_cents: i64,
}

impl SaleItem {
    /// Returns the line total as Money.
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

/// Input for recording a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSale {
    pub payment_method: Option<String>,
    pub customer_email: Option<String>,
    pub items: Vec<NewSaleItem>,
}

/// Input line of a sale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NewSaleItem {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Price,
}

/// A validated sale with all derived money fields computed.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedSale {
    pub payment_method: Option<String>,
    pub customer_email: Option<String>,
    pub lines: Vec<PricedLine>,
    pub total_amount: Money,
}

/// A validated sale line with its total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricedLine {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Price,
    pub total_price: Money,
}

impl NewSale {
    /// Validates the sale and computes line totals and the sale total.
    ///
    /// ## Computation
    /// ```text
    /// line.total_price = round(unit_price × quantity, 2)   (half away from zero)
    /// total_amount     = Σ line.total_price                (exact, cents)
    /// ```
    ///
    /// ## Errors
    /// - [`CoreError::EmptySale`] when there are no items
    /// - [`CoreError::Validation`] for a non-positive quantity, negative
    ///   unit price, or bad payment method / email
    /// - [`CoreError::AmountOverflow`] if a total leaves the i64 range
    pub fn priced(&self) -> CoreResult<PricedSale> {
        validation::validate_new_sale(self)?;

        let mut lines = Vec::with_capacity(self.items.len());
        let mut total_amount = Money::zero();

        for item in &self.items {
            let total_price = item.unit_price.line_total(item.quantity)?;
            total_amount = total_amount.checked_add(total_price).ok_or_else(|| {
                CoreError::AmountOverflow {
                    field: "total_amount".to_string(),
                }
            })?;
            lines.push(PricedLine {
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
                total_price,
            });
        }

        Ok(PricedSale {
            payment_method: normalize_optional(&self.payment_method),
            customer_email: normalize_optional(&self.customer_email),
            lines,
            total_amount,
        })
    }
}

/// Trims an optional text field; blank becomes `None`.
fn normalize_optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Summary
// =============================================================================

/// Whole-corpus sales statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesSummary {
    /// Number of sales.
    pub total_sales: i64,
    /// Sum of all sale totals.
    pub total_revenue: Money,
    /// total_revenue / total_sales, zero when there are no sales.
    pub average_order_value: Money,
    /// Units sold (sum of item quantities, not distinct products).
    pub products_sold: i64,
}

impl SalesSummary {
    /// Builds a summary from the three corpus aggregates.
    ///
    /// ## Example
    /// ```rust
    /// use backoffice_core::{Money, SalesSummary};
    ///
    /// let empty = SalesSummary::from_totals(0, Money::zero(), 0);
    /// assert!(empty.average_order_value.is_zero());
    ///
    /// let summary = SalesSummary::from_totals(3, Money::from_cents(1000), 7);
    /// assert_eq!(summary.average_order_value.cents(), 333);
    /// ```
    pub fn from_totals(total_sales: i64, total_revenue: Money, products_sold: i64) -> Self {
        SalesSummary {
            total_sales,
            total_revenue,
            average_order_value: total_revenue.divide_rounded(total_sales),
            products_sold,
        }
    }
}

// =============================================================================
// Query Types
// =============================================================================

/// Filters for the sale listing. All present filters must hold.
#[derive(Debug, Clone, Default)]
pub struct SaleFilter {
    /// Inclusive lower bound on `sale_date`.
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `sale_date`.
    pub end_date: Option<DateTime<Utc>>,
    /// Sale has at least one item for this product.
    pub product_id: Option<i64>,
    /// Sale has at least one item whose product is in this category.
    pub category_id: Option<i64>,
}

/// Offset pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub offset: u32,
    pub limit: u32,
}

impl Page {
    pub fn new(offset: u32, limit: u32) -> Self {
        Page { offset, limit }
    }
}

impl Default for Page {
    fn default() -> Self {
        Page {
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
