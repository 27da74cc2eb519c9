//! # Analytics Commands
//!
//! Sales listing, corpus summary and revenue series.
//!
//! Each call reads the store as it is at call time.

use std::time::Instant;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::commands::sale::SaleResponse;
use crate::commands::Pagination;
use crate::error::ApiError;
use crate::state::AppState;
use backoffice_core::{Period, RevenueBucket, SaleFilter, SalesSummary};

/// Filters and paging of `list_sales`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesQuery {
    /// Inclusive lower bound on the sale date.
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the sale date.
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    /// Only sales with an item for this product.
    #[serde(default)]
    pub product_id: Option<i64>,
    /// Only sales with an item whose product is in this category.
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(flatten)]
    pub pagination: Pagination,
}

impl SalesQuery {
    fn filter(&self) -> SaleFilter {
        SaleFilter {
            start_date: self.start_date,
            end_date: self.end_date,
            product_id: self.product_id,
            category_id: self.category_id,
        }
    }
}

/// Result of `sales_summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSummaryResponse {
    pub total_sales: i64,
    pub total_revenue: Decimal,
    pub average_order_value: Decimal,
    pub products_sold: i64,
}

impl From<SalesSummary> for SalesSummaryResponse {
    fn from(s: SalesSummary) -> Self {
        SalesSummaryResponse {
            total_sales: s.total_sales,
            total_revenue: s.total_revenue.to_decimal(),
            average_order_value: s.average_order_value.to_decimal(),
            products_sold: s.products_sold,
        }
    }
}

/// One bucket of `revenue_by_period`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueAnalysis {
    /// Bucket label: `2024-03-07`, `2024-W10`, `2024-03` or `2024`.
    pub period: String,
    pub total_revenue: Decimal,
    /// Percent change against the preceding calendar bucket.
    pub comparison_percentage: Option<f64>,
}

impl From<RevenueBucket> for RevenueAnalysis {
    fn from(b: RevenueBucket) -> Self {
        RevenueAnalysis {
            period: b.period,
            total_revenue: b.total_revenue.to_decimal(),
            comparison_percentage: b.comparison_percentage,
        }
    }
}

/// Lists sales matching the query, ordered by (sale_date, id).
pub async fn list_sales(state: &AppState, query: SalesQuery) -> Result<Vec<SaleResponse>, ApiError> {
    let start = Instant::now();
    let page = query.pagination.to_page(state.config());
    let filter = query.filter();

    debug!(?filter, offset = page.offset, limit = page.limit, "list_sales command");

    let sales = state.db().analytics().list_sales(&filter, page).await?;

    info!(
        count = sales.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "list_sales complete"
    );

    Ok(sales.into_iter().map(SaleResponse::from).collect())
}

/// Whole-corpus sales statistics.
pub async fn sales_summary(state: &AppState) -> Result<SalesSummaryResponse, ApiError> {
    debug!("sales_summary command");

    let summary = state.db().analytics().summary().await?;
    Ok(SalesSummaryResponse::from(summary))
}

/// Revenue per period bucket, ascending.
///
/// ## Arguments
/// * `period` - `daily`, `weekly`, `monthly` or `yearly`
///
/// ## Errors
/// * `invalid_input` - Any other period, before the store is touched
pub async fn revenue_by_period(state: &AppState, period: &str) -> Result<Vec<RevenueAnalysis>, ApiError> {
    let period: Period = period.parse()?;
    debug!(period = %period, "revenue_by_period command");

    let buckets = state.db().analytics().revenue_by_period(period).await?;
    Ok(buckets.into_iter().map(RevenueAnalysis::from).collect())
}
