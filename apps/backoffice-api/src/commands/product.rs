//! # Product Commands
//!
//! Catalogue maintenance and lookup. Prices cross this boundary as
//! `Decimal` and are kept exactly, sub-cent digits included.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::commands::Pagination;
use crate::error::ApiError;
use crate::state::AppState;
use backoffice_core::{NewProduct, Price, Product};

/// Request body of `create_product`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: i64,
}

/// Product as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: i64,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        ProductResponse {
            id: p.id,
            price: p.price.amount(),
            name: p.name,
            description: p.description,
            category_id: p.category_id,
        }
    }
}

/// Creates a product under an existing category.
///
/// ## Errors
/// * `invalid_input` - Bad name or price, or unknown `category_id`
pub async fn create_product(
    state: &AppState,
    request: CreateProductRequest,
) -> Result<ProductResponse, ApiError> {
    debug!(
        name = %request.name,
        price = %request.price,
        category_id = request.category_id,
        "create_product command"
    );

    let product = state
        .db()
        .products()
        .insert(&NewProduct {
            name: request.name,
            description: request.description,
            price: Price::new(request.price),
            category_id: request.category_id,
        })
        .await?;

    info!(id = product.id, name = %product.name, "Product created");

    Ok(ProductResponse::from(product))
}

/// Lists products ordered by id.
pub async fn list_products(
    state: &AppState,
    pagination: Pagination,
) -> Result<Vec<ProductResponse>, ApiError> {
    let page = pagination.to_page(state.config());
    debug!(offset = page.offset, limit = page.limit, "list_products command");

    let products = state.db().products().list(page).await?;
    Ok(products.into_iter().map(ProductResponse::from).collect())
}

/// Gets a single product by id.
///
/// ## Returns
/// The product if found, or `not_found`.
pub async fn get_product(state: &AppState, id: i64) -> Result<ProductResponse, ApiError> {
    debug!(id, "get_product command");

    let product = state
        .db()
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;

    Ok(ProductResponse::from(product))
}
