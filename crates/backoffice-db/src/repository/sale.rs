//! # Sale Repository
//!
//! Records sales with their line items and reads them back.
//!
//! ## Recording a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Recording                                    │
//! │                                                                         │
//! │  1. PRICE (no store access)                                            │
//! │     └── NewSale::priced() → validated lines + totals                   │
//! │                                                                         │
//! │  2. BEGIN TRANSACTION                                                  │
//! │     ├── every product exists?        (else NotFound, rollback)         │
//! │     ├── INSERT sales row             (total = Σ line totals)           │
//! │     └── INSERT one sale_items row per line                             │
//! │                                                                         │
//! │  3. COMMIT                                                             │
//! │     └── any error before this point drops the tx → nothing written     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sales are immutable once written. Inventory is not decremented.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, SubsecRound, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::{db_timestamp, STORABLE_YEARS};
use backoffice_core::{NewSale, Sale, SaleItem, ValidationError};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a sale dated now.
    ///
    /// ## Returns
    /// The stored sale with generated ids and its items in insertion order.
    ///
    /// ## Errors
    /// * `DbError::Invalid` - Empty sale, bad quantity/price/email, overflow,
    ///   sale date outside years 0000-9999
    /// * `DbError::NotFound` - An item references an unknown product
    /// * `DbError::TransactionFailed` - Begin or commit failed
    pub async fn record(&self, sale: &NewSale) -> DbResult<Sale> {
        self.record_at(sale, Utc::now()).await
    }

    /// Records a sale with an explicit sale date.
    ///
    /// Used for back-dated imports. Sub-microsecond precision is dropped
    /// so the returned date equals the stored one.
    pub async fn record_at(&self, sale: &NewSale, sale_date: DateTime<Utc>) -> DbResult<Sale> {
        let priced = sale.priced()?;
        let sale_date = sale_date.trunc_subsecs(6);

        if !STORABLE_YEARS.contains(&sale_date.year()) {
            return Err(ValidationError::InvalidFormat {
                field: "sale_date".to_string(),
                reason: "year must be between 0000 and 9999".to_string(),
            }
            .into());
        }

        debug!(
            lines = priced.lines.len(),
            total_cents = priced.total_amount.cents(),
            "Recording sale"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        for line in &priced.lines {
            let product: Option<i64> = sqlx::query_scalar("SELECT id FROM products WHERE id = ?1")
                .bind(line.product_id)
                .fetch_optional(&mut *tx)
                .await?;

            if product.is_none() {
                return Err(DbError::not_found("Product", line.product_id));
            }
        }

        let sale_id = sqlx::query(
            r#"
            INSERT INTO sales (sale_date, total_amount_cents, payment_method, customer_email)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(db_timestamp(sale_date))
        .bind(priced.total_amount.cents())
        .bind(priced.payment_method.as_deref())
        .bind(priced.customer_email.as_deref())
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        let mut items = Vec::with_capacity(priced.lines.len());
        for line in &priced.lines {
            let item_id = sqlx::query(
                r#"
                INSERT INTO sale_items (
                    sale_id, product_id, quantity, unit_price, total_price_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(sale_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price.to_string())
            .bind(line.total_price.cents())
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

            items.push(SaleItem {
                id: item_id,
                sale_id,
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
                total_price_cents: line.total_price.cents(),
            });
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            sale_id,
            items = items.len(),
            total = %priced.total_amount,
            "Sale recorded"
        );

        Ok(Sale {
            id: sale_id,
            sale_date,
            total_amount_cents: priced.total_amount.cents(),
            payment_method: priced.payment_method,
            customer_email: priced.customer_email,
            items,
        })
    }

    /// Gets a sale by ID, with its items.
    ///
    /// ## Returns
    /// * `Ok(Some(Sale))` - Sale found
    /// * `Ok(None)` - Sale not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, sale_date, total_amount_cents, payment_method, customer_email
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match sale {
            Some(sale) => {
                let mut sales = vec![sale];
                attach_items(&self.pool, &mut sales).await?;
                Ok(sales.pop())
            }
            None => Ok(None),
        }
    }

    /// Counts all sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts all sale items.
    pub async fn count_items(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Loads the items of every sale in `sales` with one query.
///
/// Items are attached in item-id order.
pub(crate) async fn attach_items(pool: &SqlitePool, sales: &mut [Sale]) -> DbResult<()> {
    if sales.is_empty() {
        return Ok(());
    }

    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT id, sale_id, product_id, quantity, unit_price, total_price_cents \
         FROM sale_items WHERE sale_id IN (",
    );
    let mut ids = query.separated(", ");
    for sale in sales.iter() {
        ids.push_bind(sale.id);
    }
    query.push(") ORDER BY id");

    let items: Vec<SaleItem> = query.build_query_as().fetch_all(pool).await?;

    let mut by_sale: HashMap<i64, Vec<SaleItem>> = HashMap::new();
    for item in items {
        by_sale.entry(item.sale_id).or_default().push(item);
    }

    for sale in sales.iter_mut() {
        sale.items = by_sale.remove(&sale.id).unwrap_or_default();
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Database;
    use crate::repository::test_support;
    use backoffice_core::{CoreError, Money, NewSaleItem, Price};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn line(product_id: i64, quantity: i64, unit_cents: i64) -> NewSaleItem {
        NewSaleItem {
            product_id,
            quantity,
            unit_price: Price::from_cents(unit_cents),
        }
    }

    fn new_sale(items: Vec<NewSaleItem>) -> NewSale {
        NewSale {
            payment_method: Some("Credit Card".to_string()),
            customer_email: Some("customer1@example.com".to_string()),
            items,
        }
    }

    async fn catalogue() -> (Database, i64, i64) {
        let db = test_support::db().await;
        let category = test_support::category(&db, "Electronics").await;
        let a = test_support::product(&db, category.id, "Cable", 999).await;
        let b = test_support::product(&db, category.id, "Charger", 2450).await;
        (db, a.id, b.id)
    }

    #[tokio::test]
    async fn test_record_computes_totals() {
        let (db, a, b) = catalogue().await;

        let sale = db
            .sales()
            .record(&new_sale(vec![line(a, 3, 999), line(b, 1, 2450)]))
            .await
            .unwrap();

        assert_eq!(sale.items.len(), 2);
        assert_eq!(sale.items[0].total_price_cents, 2997);
        assert_eq!(sale.total_amount_cents, 5447);
        assert_eq!(
            Some(sale.total_amount()),
            Money::checked_sum(sale.items.iter().map(SaleItem::total_price))
        );
        assert_eq!(sale.payment_method.as_deref(), Some("Credit Card"));
    }

    #[tokio::test]
    async fn test_recorded_sale_reads_back_identically() {
        let (db, a, _) = catalogue().await;

        let recorded = db.sales().record(&new_sale(vec![line(a, 2, 150)])).await.unwrap();
        let fetched = db.sales().get_by_id(recorded.id).await.unwrap().unwrap();

        assert_eq!(fetched, recorded);
    }

    #[tokio::test]
    async fn test_unit_price_is_a_snapshot() {
        let (db, a, _) = catalogue().await;

        // Sold below list price; the item keeps what was charged
        let sale = db.sales().record(&new_sale(vec![line(a, 1, 800)])).await.unwrap();
        assert_eq!(sale.items[0].unit_price, Price::from_cents(800));
    }

    #[tokio::test]
    async fn test_sub_cent_unit_price_rounds_the_line_total() {
        let (db, a, _) = catalogue().await;

        let item = NewSaleItem {
            product_id: a,
            quantity: 3,
            unit_price: Price::new(dec!(8.333)),
        };
        let sale = db.sales().record(&new_sale(vec![item])).await.unwrap();

        assert_eq!(sale.total_amount_cents, 2500);
        let fetched = db.sales().get_by_id(sale.id).await.unwrap().unwrap();
        assert_eq!(fetched.items[0].unit_price.amount(), dec!(8.333));
        assert_eq!(fetched.items[0].total_price_cents, 2500);
    }

    #[tokio::test]
    async fn test_unknown_product_rolls_back() {
        let (db, a, _) = catalogue().await;

        let err = db
            .sales()
            .record(&new_sale(vec![line(a, 1, 999), line(404, 1, 100)]))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(db.sales().count().await.unwrap(), 0);
        assert_eq!(db.sales().count_items().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalid_sale_writes_nothing() {
        let (db, a, _) = catalogue().await;

        let empty = db.sales().record(&new_sale(vec![])).await.unwrap_err();
        assert!(matches!(empty, DbError::Invalid(CoreError::EmptySale)));

        let zero_qty = db.sales().record(&new_sale(vec![line(a, 0, 999)])).await.unwrap_err();
        assert!(matches!(
            zero_qty,
            DbError::Invalid(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));

        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_record_at_keeps_the_given_date() {
        let (db, a, _) = catalogue().await;
        let at = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap();

        let sale = db.sales().record_at(&new_sale(vec![line(a, 1, 100)]), at).await.unwrap();
        let fetched = db.sales().get_by_id(sale.id).await.unwrap().unwrap();

        assert_eq!(fetched.sale_date, at);
    }

    #[tokio::test]
    async fn test_record_at_rejects_unstorable_years() {
        let (db, a, _) = catalogue().await;
        let far = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();

        let err = db
            .sales()
            .record_at(&new_sale(vec![line(a, 1, 100)]), far)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Invalid(CoreError::Validation(ValidationError::InvalidFormat { .. }))
        ));
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_unknown_sale_is_none() {
        let db = test_support::db().await;
        assert!(db.sales().get_by_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_blank_optional_fields_are_stored_as_null() {
        let (db, a, _) = catalogue().await;

        let sale = db
            .sales()
            .record(&NewSale {
                payment_method: Some("  ".to_string()),
                customer_email: Some(String::new()),
                items: vec![line(a, 1, 100)],
            })
            .await
            .unwrap();

        let fetched = db.sales().get_by_id(sale.id).await.unwrap().unwrap();
        assert_eq!(fetched.payment_method, None);
        assert_eq!(fetched.customer_email, None);
    }
}
