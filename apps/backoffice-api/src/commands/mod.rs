//! # Facade Commands
//!
//! Every operation exposed to callers.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports, Pagination)
//! ├── category.rs   ◄─── create_category, list_categories
//! ├── product.rs    ◄─── create_product, list_products, get_product
//! ├── inventory.rs  ◄─── list/get/update inventory, low_stock
//! ├── sale.rs       ◄─── create_sale, get_sale
//! ├── analytics.rs  ◄─── list_sales, sales_summary, revenue_by_period
//! └── health.rs     ◄─── health
//! ```
//!
//! ## Command Shape
//! ```rust,ignore
//! pub async fn get_product(state: &AppState, id: i64) -> Result<ProductResponse, ApiError>
//! ```
//! The state is passed explicitly; there is no global session.

use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use backoffice_core::Page;

pub mod analytics;
pub mod category;
pub mod health;
pub mod inventory;
pub mod product;
pub mod sale;

/// Offset pagination as requested by a caller.
///
/// `limit` falls back to the configured default and is capped at the
/// configured maximum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl Pagination {
    pub fn new(offset: u32, limit: u32) -> Self {
        Pagination {
            offset,
            limit: Some(limit),
        }
    }

    /// Resolves the request against the facade limits.
    pub fn to_page(&self, config: &ApiConfig) -> Page {
        let limit = self
            .limit
            .unwrap_or(config.default_page_limit)
            .min(config.max_page_limit);

        Page::new(self.offset, limit)
    }
}
