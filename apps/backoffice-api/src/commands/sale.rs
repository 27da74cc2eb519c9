//! # Sale Commands
//!
//! Recording and reading sales.
//!
//! ## Create Flow
//! ```text
//! CreateSaleRequest (Decimal unit prices)
//!       │  Decimal → Price, kept exact
//!       ▼
//! NewSale ──► SaleRepository::record ──► one transaction (sale + items)
//!       │       line total = round(unit_price × quantity, 2), half away from zero
//!       │
//!       ▼
//! SaleResponse (Decimal totals, items in insertion order)
//! ```

use std::time::Instant;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;
use backoffice_core::{NewSale, NewSaleItem, Price, Sale, SaleItem};

/// One line of a `create_sale` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItemRequest {
    pub product_id: i64,
    pub quantity: i64,
    /// Price charged per unit; may differ from the product's list price.
    pub unit_price: Decimal,
}

/// Request body of `create_sale`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSaleRequest {
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    pub items: Vec<SaleItemRequest>,
}

impl CreateSaleRequest {
    fn to_new_sale(&self) -> NewSale {
        let items = self
            .items
            .iter()
            .map(|item| NewSaleItem {
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: Price::new(item.unit_price),
            })
            .collect();

        NewSale {
            payment_method: self.payment_method.clone(),
            customer_email: self.customer_email.clone(),
            items,
        }
    }
}

/// Sale line as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItemResponse {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

impl From<SaleItem> for SaleItemResponse {
    fn from(item: SaleItem) -> Self {
        SaleItemResponse {
            id: item.id,
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price.amount(),
            total_price: item.total_price().to_decimal(),
        }
    }
}

/// Sale as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleResponse {
    pub id: i64,
    pub sale_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub payment_method: Option<String>,
    pub customer_email: Option<String>,
    pub items: Vec<SaleItemResponse>,
}

impl From<Sale> for SaleResponse {
    fn from(sale: Sale) -> Self {
        SaleResponse {
            id: sale.id,
            sale_date: sale.sale_date,
            total_amount: sale.total_amount().to_decimal(),
            payment_method: sale.payment_method,
            customer_email: sale.customer_email,
            items: sale.items.into_iter().map(SaleItemResponse::from).collect(),
        }
    }
}

/// Records a sale and its items atomically.
///
/// ## Errors
/// * `invalid_input` - No items, non-positive quantity, negative price,
///   bad payment method or email
/// * `not_found` - An item names an unknown product (nothing is written)
/// * `storage_failure` - The transaction could not complete
pub async fn create_sale(state: &AppState, request: CreateSaleRequest) -> Result<SaleResponse, ApiError> {
    let start = Instant::now();
    debug!(items = request.items.len(), "create_sale command");

    let new_sale = request.to_new_sale();
    let sale = state.db().sales().record(&new_sale).await?;

    info!(
        sale_id = sale.id,
        total = %sale.total_amount(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "create_sale complete"
    );

    Ok(SaleResponse::from(sale))
}

/// Gets a sale with its items.
///
/// ## Returns
/// The sale if found, or `not_found`.
pub async fn get_sale(state: &AppState, id: i64) -> Result<SaleResponse, ApiError> {
    debug!(id, "get_sale command");

    let sale = state
        .db()
        .sales()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale", id))?;

    Ok(SaleResponse::from(sale))
}
