//! # Analytics Repository
//!
//! Read-only aggregate queries over recorded sales.
//!
//! ## Queries
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list_sales(filter, page)                                              │
//! │    WHERE sale_date >= ceil(start) AND sale_date <= floor(end)          │
//! │      AND EXISTS item for product_id                                    │
//! │      AND EXISTS item whose product is in category_id                   │
//! │    ORDER BY sale_date, id  LIMIT/OFFSET  → items attached per sale     │
//! │                                                                         │
//! │  summary()                                                             │
//! │    one statement: COUNT(sales), SUM(total), SUM(item quantity)         │
//! │                                                                         │
//! │  revenue_by_period(period)                                             │
//! │    (sale_date, total) for every sale → backoffice_core bucketing       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every call reads the corpus as it is at call time; nothing is cached.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::sale::attach_items;
use crate::repository::{lower_bound, page_bounds, upper_bound, TextBound};
use backoffice_core::analytics;
use backoffice_core::{Money, Page, Period, RevenueBucket, Sale, SaleFilter, SalesSummary};

/// Repository for sales analytics.
#[derive(Debug, Clone)]
pub struct AnalyticsRepository {
    pool: SqlitePool,
}

impl AnalyticsRepository {
    /// Creates a new AnalyticsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AnalyticsRepository { pool }
    }

    /// Lists sales matching every present filter, with their items.
    ///
    /// ## Ordering
    /// Ascending by `(sale_date, id)`. Pagination applies after filtering.
    /// A start date after the end date matches nothing. Bounds are compared
    /// at the stored microsecond precision: a start with a sub-microsecond
    /// fraction is rounded up and an end is rounded down. Bounds outside
    /// the storable years 0000-9999 are open or match nothing.
    pub async fn list_sales(&self, filter: &SaleFilter, page: Page) -> DbResult<Vec<Sale>> {
        debug!(?filter, offset = page.offset, limit = page.limit, "Listing sales");

        let start = filter.start_date.map_or(TextBound::Open, lower_bound);
        let end = filter.end_date.map_or(TextBound::Open, upper_bound);
        if start == TextBound::Unsatisfiable || end == TextBound::Unsatisfiable {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT s.id, s.sale_date, s.total_amount_cents, s.payment_method, s.customer_email \
             FROM sales s WHERE 1 = 1",
        );

        if let TextBound::At(start) = start {
            query.push(" AND s.sale_date >= ").push_bind(start);
        }

        if let TextBound::At(end) = end {
            query.push(" AND s.sale_date <= ").push_bind(end);
        }

        if let Some(product_id) = filter.product_id {
            query
                .push(" AND EXISTS (SELECT 1 FROM sale_items si WHERE si.sale_id = s.id AND si.product_id = ")
                .push_bind(product_id)
                .push(")");
        }

        if let Some(category_id) = filter.category_id {
            query
                .push(
                    " AND EXISTS (SELECT 1 FROM sale_items si \
                     JOIN products p ON p.id = si.product_id \
                     WHERE si.sale_id = s.id AND p.category_id = ",
                )
                .push_bind(category_id)
                .push(")");
        }

        let (limit, offset) = page_bounds(page);
        query
            .push(" ORDER BY s.sale_date, s.id LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let mut sales: Vec<Sale> = query.build_query_as().fetch_all(&self.pool).await?;
        attach_items(&self.pool, &mut sales).await?;

        Ok(sales)
    }

    /// Whole-corpus sales statistics.
    ///
    /// ## Returns
    /// `{0, 0, 0, 0}` on an empty store. The average order value is rounded
    /// half away from zero to the cent.
    pub async fn summary(&self) -> DbResult<SalesSummary> {
        let (total_sales, total_revenue_cents, products_sold): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM sales),
                (SELECT COALESCE(SUM(total_amount_cents), 0) FROM sales),
                (SELECT COALESCE(SUM(quantity), 0) FROM sale_items)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        debug!(total_sales, total_revenue_cents, products_sold, "Sales summary computed");

        Ok(SalesSummary::from_totals(
            total_sales,
            Money::from_cents(total_revenue_cents),
            products_sold,
        ))
    }

    /// Revenue bucketed by period, ascending, non-empty buckets only.
    ///
    /// ## Errors
    /// `DbError::Internal` when a bucket total overflows.
    pub async fn revenue_by_period(&self, period: Period) -> DbResult<Vec<RevenueBucket>> {
        let rows: Vec<(DateTime<Utc>, i64)> = sqlx::query_as(
            "SELECT sale_date, total_amount_cents FROM sales ORDER BY sale_date, id",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(period = %period, sales = rows.len(), "Bucketing revenue");

        let sales: Vec<(DateTime<Utc>, Money)> = rows
            .into_iter()
            .map(|(at, cents)| (at, Money::from_cents(cents)))
            .collect();

        analytics::revenue_by_period(&sales, period).map_err(|e| DbError::Internal(e.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
