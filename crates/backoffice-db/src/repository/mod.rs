//! # Repository Module
//!
//! Database repository implementations for the back-office engine.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories over one pool                           │
//! │                                                                         │
//! │  Facade command                                                        │
//! │       │                                                                 │
//! │       │  db.analytics().summary()                                      │
//! │       ▼                                                                 │
//! │  CategoryRepository   insert / get_by_id / list / exists               │
//! │  ProductRepository    insert / get_by_id / list                        │
//! │  InventoryRepository  get / list / low_stock / set_stock               │
//! │  SaleRepository       record / record_at / get_by_id / count           │
//! │  AnalyticsRepository  list_sales / summary / revenue_by_period         │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation from `backoffice_core` runs before any query is issued, so a
//! rejected input never reaches SQLite.

use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, Duration, SecondsFormat, SubsecRound, Utc};

pub mod analytics;
pub mod category;
pub mod inventory;
pub mod product;
pub mod sale;

/// Renders a timestamp the way every TEXT timestamp column stores it.
///
/// Fixed-width microseconds with a `Z` suffix, so string order is time order
/// and range filters can compare the column directly.
pub(crate) fn db_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Years a TEXT timestamp column can hold while string order is time order.
pub(crate) const STORABLE_YEARS: RangeInclusive<i32> = 0..=9999;

/// A date range bound translated into the stored text domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TextBound {
    /// Compare the column against this text.
    At(String),
    /// Every storable date satisfies the bound.
    Open,
    /// No storable date satisfies the bound.
    Unsatisfiable,
}

/// Inclusive lower bound, rounded up to the next whole microsecond.
pub(crate) fn lower_bound(start: DateTime<Utc>) -> TextBound {
    let floor = start.trunc_subsecs(6);
    let ceil = if floor == start {
        floor
    } else {
        floor + Duration::microseconds(1)
    };

    if ceil.year() > *STORABLE_YEARS.end() {
        TextBound::Unsatisfiable
    } else if ceil.year() < *STORABLE_YEARS.start() {
        TextBound::Open
    } else {
        TextBound::At(db_timestamp(ceil))
    }
}

/// Inclusive upper bound, rounded down to a whole microsecond.
pub(crate) fn upper_bound(end: DateTime<Utc>) -> TextBound {
    let floor = end.trunc_subsecs(6);

    if floor.year() < *STORABLE_YEARS.start() {
        TextBound::Unsatisfiable
    } else if floor.year() > *STORABLE_YEARS.end() {
        TextBound::Open
    } else {
        TextBound::At(db_timestamp(floor))
    }
}

/// Converts a page bound to the i64 SQLite binds.
pub(crate) fn page_bounds(page: backoffice_core::Page) -> (i64, i64) {
    (i64::from(page.limit), i64::from(page.offset))
}
