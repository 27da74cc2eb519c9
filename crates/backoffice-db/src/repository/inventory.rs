//! # Inventory Repository
//!
//! Stock levels per product and the low-stock report.
//!
//! ## Low-Stock Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  low_stock(Some(t))  →  quantity < t                                   │
//! │  low_stock(None)     →  quantity < row.low_stock_threshold             │
//! │                                                                         │
//! │  Strict comparison. Results ordered by product_id. The `threshold`     │
//! │  column of each alert is always the row's own low_stock_threshold.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Recording a sale does not touch this table; stock only changes through
//! [`InventoryRepository::set_stock`].

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::{db_timestamp, page_bounds};
use backoffice_core::validation::validate_stock_update;
use backoffice_core::{Inventory, LowStockAlert, Page, StockUpdate};

/// Repository for inventory database operations.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Gets the stock record of a product.
    ///
    /// ## Returns
    /// * `Ok(Some(Inventory))` - Product has been stocked
    /// * `Ok(None)` - No inventory row (unknown or never-stocked product)
    pub async fn get(&self, product_id: i64) -> DbResult<Option<Inventory>> {
        let row = sqlx::query_as::<_, Inventory>(
            r#"
            SELECT product_id, quantity, low_stock_threshold, last_updated
            FROM inventory
            WHERE product_id = ?1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Lists inventory rows ordered by product id.
    pub async fn list(&self, page: Page) -> DbResult<Vec<Inventory>> {
        let (limit, offset) = page_bounds(page);

        let rows = sqlx::query_as::<_, Inventory>(
            r#"
            SELECT product_id, quantity, low_stock_threshold, last_updated
            FROM inventory
            ORDER BY product_id
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Lists products whose stock is below a threshold.
    ///
    /// ## Arguments
    /// * `threshold` - Explicit cut-off for every row, or `None` to use each
    ///   row's own `low_stock_threshold`
    ///
    /// ## Example
    /// ```rust,ignore
    /// // quantities {0, 4, 5, 6, 10}
    /// let alerts = repo.low_stock(Some(5)).await?;
    /// // → products with 0 and 4
    /// ```
    pub async fn low_stock(&self, threshold: Option<i64>) -> DbResult<Vec<LowStockAlert>> {
        debug!(threshold = ?threshold, "Querying low stock");

        let alerts = sqlx::query_as::<_, LowStockAlert>(
            r#"
            SELECT
                i.product_id,
                p.name AS product_name,
                i.quantity AS current_quantity,
                i.low_stock_threshold AS threshold
            FROM inventory i
            JOIN products p ON p.id = i.product_id
            WHERE i.quantity < COALESCE(?1, i.low_stock_threshold)
            ORDER BY i.product_id
            "#,
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        Ok(alerts)
    }

    /// Writes a product's stock level, creating the row on first use.
    ///
    /// ## What This Does
    /// - Validates quantity and threshold (both >= 0)
    /// - Inserts or updates the row with `last_updated = now`
    /// - On update, an omitted threshold keeps the stored one
    ///
    /// ## Errors
    /// * `DbError::Invalid` - Negative quantity or threshold
    /// * `DbError::NotFound` - No such product
    pub async fn set_stock(&self, product_id: i64, update: &StockUpdate) -> DbResult<Inventory> {
        validate_stock_update(update)?;

        let product: Option<i64> = sqlx::query_scalar("SELECT id FROM products WHERE id = ?1")
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;

        if product.is_none() {
            return Err(DbError::not_found("Product", product_id));
        }

        let row = sqlx::query_as::<_, Inventory>(
            r#"
            INSERT INTO inventory (product_id, quantity, low_stock_threshold, last_updated)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (product_id) DO UPDATE SET
                quantity = excluded.quantity,
                low_stock_threshold = COALESCE(?5, inventory.low_stock_threshold),
                last_updated = excluded.last_updated
            RETURNING product_id, quantity, low_stock_threshold, last_updated
            "#,
        )
        .bind(product_id)
        .bind(update.quantity)
        .bind(update.threshold_for_insert())
        .bind(db_timestamp(Utc::now()))
        .bind(update.low_stock_threshold)
        .fetch_one(&self.pool)
        .await?;

        info!(
            product_id,
            quantity = row.quantity,
            low_stock_threshold = row.low_stock_threshold,
            "Stock level updated"
        );

        Ok(row)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Database;
    use crate::repository::test_support;
    use backoffice_core::CoreError;

    async fn stock(db: &Database, product_id: i64, quantity: i64, threshold: Option<i64>) {
        db.inventory()
            .set_stock(
                product_id,
                &StockUpdate {
                    quantity,
                    low_stock_threshold: threshold,
                },
            )
            .await
            .unwrap();
    }

    /// Five products stocked at {0, 4, 5, 6, 10}, all with the default threshold.
    async fn stocked_db() -> (Database, Vec<i64>) {
        let db = test_support::db().await;
        let category = test_support::category(&db, "Electronics").await;

        let mut ids = Vec::new();
        for (i, qty) in [0, 4, 5, 6, 10].into_iter().enumerate() {
            let product = test_support::product(&db, category.id, &format!("Item {i}"), 500).await;
            stock(&db, product.id, qty, None).await;
            ids.push(product.id);
        }

        (db, ids)
    }

    #[tokio::test]
    async fn test_low_stock_is_strictly_below_threshold() {
        let (db, ids) = stocked_db().await;

        let alerts = db.inventory().low_stock(Some(5)).await.unwrap();
        let hits: Vec<_> = alerts.iter().map(|a| (a.product_id, a.current_quantity)).collect();

        assert_eq!(hits, vec![(ids[0], 0), (ids[1], 4)]);
        assert_eq!(alerts[0].product_name, "Item 0");
    }

    #[tokio::test]
    async fn test_low_stock_echoes_row_threshold() {
        let (db, ids) = stocked_db().await;
        stock(&db, ids[4], 10, Some(2)).await;

        // Explicit threshold wins for filtering; the row's own value is reported
        let alerts = db.inventory().low_stock(Some(11)).await.unwrap();
        assert_eq!(alerts.len(), 5);
        assert_eq!(alerts[4].threshold, 2);
        assert!(alerts[..4].iter().all(|a| a.threshold == 5));
    }

    #[tokio::test]
    async fn test_low_stock_without_override_uses_row_thresholds() {
        let (db, ids) = stocked_db().await;
        stock(&db, ids[3], 6, Some(7)).await;
        stock(&db, ids[0], 0, Some(0)).await;

        let alerts = db.inventory().low_stock(None).await.unwrap();
        let hits: Vec<_> = alerts.iter().map(|a| a.product_id).collect();

        // 0 < 0 is false; 4 < 5; 5 < 5 is false; 6 < 7; 10 < 5 is false
        assert_eq!(hits, vec![ids[1], ids[3]]);
    }

    #[tokio::test]
    async fn test_set_stock_keeps_threshold_when_omitted() {
        let (db, ids) = stocked_db().await;

        stock(&db, ids[2], 5, Some(20)).await;
        let before = db.inventory().get(ids[2]).await.unwrap().unwrap();

        stock(&db, ids[2], 30, None).await;
        let after = db.inventory().get(ids[2]).await.unwrap().unwrap();

        assert_eq!(after.quantity, 30);
        assert_eq!(after.low_stock_threshold, 20);
        assert!(after.last_updated >= before.last_updated);
    }

    #[tokio::test]
    async fn test_set_stock_unknown_product_is_not_found() {
        let db = test_support::db().await;

        let err = db
            .inventory()
            .set_stock(
                7,
                &StockUpdate {
                    quantity: 1,
                    low_stock_threshold: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
        assert!(db.inventory().get(7).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_stock_rejects_negative_quantity() {
        let (db, ids) = stocked_db().await;

        let err = db
            .inventory()
            .set_stock(
                ids[0],
                &StockUpdate {
                    quantity: -3,
                    low_stock_threshold: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Invalid(CoreError::Validation(_))));
        assert_eq!(db.inventory().get(ids[0]).await.unwrap().unwrap().quantity, 0);
    }

    #[tokio::test]
    async fn test_list_orders_by_product() {
        let (db, ids) = stocked_db().await;

        let rows = db.inventory().list(Page::default()).await.unwrap();
        let listed: Vec<_> = rows.iter().map(|r| r.product_id).collect();
        assert_eq!(listed, ids);

        let tail = db.inventory().list(Page::new(3, 10)).await.unwrap();
        assert_eq!(tail.len(), 2);
    }

    #[tokio::test]
    async fn test_unstocked_product_has_no_row() {
        let db = test_support::db().await;
        let category = test_support::category(&db, "Books").await;
        let product = test_support::product(&db, category.id, "Atlas", 3000).await;

        assert!(db.inventory().get(product.id).await.unwrap().is_none());
        assert!(db.inventory().low_stock(Some(100)).await.unwrap().is_empty());
    }
}
