//! # Inventory Commands
//!
//! Stock levels and the low-stock report.
//!
//! `low_stock` always hands the tracker an explicit threshold: the caller's,
//! or the configured default (5). Per-row thresholds therefore only show up
//! in the `threshold` field of each alert.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::commands::Pagination;
use crate::error::ApiError;
use crate::state::AppState;
use backoffice_core::{Inventory, LowStockAlert, StockUpdate};

/// Stock record as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryResponse {
    pub product_id: i64,
    pub quantity: i64,
    pub low_stock_threshold: i64,
    pub last_updated: DateTime<Utc>,
}

impl From<Inventory> for InventoryResponse {
    fn from(i: Inventory) -> Self {
        InventoryResponse {
            product_id: i.product_id,
            quantity: i.quantity,
            low_stock_threshold: i.low_stock_threshold,
            last_updated: i.last_updated,
        }
    }
}

/// Request body of `update_inventory`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UpdateInventoryRequest {
    pub quantity: i64,
    /// Kept as stored when omitted (5 on a first write).
    #[serde(default)]
    pub low_stock_threshold: Option<i64>,
}

/// Query of `low_stock`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LowStockQuery {
    #[serde(default)]
    pub threshold: Option<i64>,
}

/// Lists stock records ordered by product id.
pub async fn list_inventory(
    state: &AppState,
    pagination: Pagination,
) -> Result<Vec<InventoryResponse>, ApiError> {
    let page = pagination.to_page(state.config());
    debug!(offset = page.offset, limit = page.limit, "list_inventory command");

    let rows = state.db().inventory().list(page).await?;
    Ok(rows.into_iter().map(InventoryResponse::from).collect())
}

/// Gets the stock record of one product.
///
/// ## Returns
/// The record, or `not_found` when the product was never stocked.
pub async fn get_inventory(state: &AppState, product_id: i64) -> Result<InventoryResponse, ApiError> {
    debug!(product_id, "get_inventory command");

    let row = state
        .db()
        .inventory()
        .get(product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Inventory for product", product_id))?;

    Ok(InventoryResponse::from(row))
}

/// Sets a product's stock level.
///
/// ## Errors
/// * `not_found` - Unknown product
/// * `invalid_input` - Negative quantity or threshold
pub async fn update_inventory(
    state: &AppState,
    product_id: i64,
    request: UpdateInventoryRequest,
) -> Result<InventoryResponse, ApiError> {
    debug!(
        product_id,
        quantity = request.quantity,
        low_stock_threshold = ?request.low_stock_threshold,
        "update_inventory command"
    );

    let row = state
        .db()
        .inventory()
        .set_stock(
            product_id,
            &StockUpdate {
                quantity: request.quantity,
                low_stock_threshold: request.low_stock_threshold,
            },
        )
        .await?;

    Ok(InventoryResponse::from(row))
}

/// Products whose quantity is strictly below the threshold.
pub async fn low_stock(state: &AppState, query: LowStockQuery) -> Result<Vec<LowStockAlert>, ApiError> {
    let threshold = query.threshold.unwrap_or(state.config().low_stock_threshold);
    debug!(threshold, "low_stock command");

    let alerts = state.db().inventory().low_stock(Some(threshold)).await?;

    info!(threshold, count = alerts.len(), "low_stock report");

    Ok(alerts)
}
