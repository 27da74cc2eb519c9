//! # Product Repository
//!
//! Database operations for the product catalogue.
//!
//! ## Price Storage
//! Prices are stored as exact decimal text, so `9.999` reads back as
//! `9.999`. Sale items copy the unit price at sale time, so changing a
//! product's price never rewrites history.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::category::CategoryRepository;
use crate::repository::page_bounds;
use backoffice_core::validation::validate_new_product;
use backoffice_core::{NewProduct, Page, Product};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let product = repo.insert(&new_product).await?;
/// let page = repo.list(Page::default()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product.
    ///
    /// ## Errors
    /// * `DbError::Invalid` - Blank/oversized name or negative price
    /// * `DbError::InvalidReference` - `category_id` names no category
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        validate_new_product(product)?;

        let categories = CategoryRepository::new(self.pool.clone());
        if !categories.exists(product.category_id).await? {
            return Err(DbError::invalid_reference("Category", product.category_id));
        }

        let name = product.name.trim();
        let description = product
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());

        debug!(
            name = %name,
            price = %product.price,
            category_id = product.category_id,
            "Inserting product"
        );

        let id = sqlx::query(
            r#"
            INSERT INTO products (name, description, price, category_id)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(product.price.to_string())
        .bind(product.category_id)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(Product {
            id,
            name: name.to_string(),
            description: description.map(str::to_string),
            price: product.price,
            category_id: product.category_id,
        })
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, category_id
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists products ordered by id.
    pub async fn list(&self, page: Page) -> DbResult<Vec<Product>> {
        let (limit, offset) = page_bounds(page);

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, category_id
            FROM products
            ORDER BY id
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support;
    use backoffice_core::{CoreError, Price, ValidationError};
    use rust_decimal_macros::dec;

    fn new_product(category_id: i64, price: Price) -> NewProduct {
        NewProduct {
            name: "Kettle".to_string(),
            description: Some("1.7L, stainless".to_string()),
            price,
            category_id,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_support::db().await;
        let category = test_support::category(&db, "Home & Kitchen").await;

        let created = db
            .products()
            .insert(&new_product(category.id, Price::from_cents(2499)))
            .await
            .unwrap();
        assert_eq!(created.price.amount(), dec!(24.99));
        assert_eq!(created.category_id, category.id);

        let fetched = db.products().get_by_id(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_sub_cent_price_reads_back_exactly() {
        let db = test_support::db().await;
        let category = test_support::category(&db, "Fuel").await;

        let created = db
            .products()
            .insert(&new_product(category.id, Price::new(dec!(1.999))))
            .await
            .unwrap();

        let fetched = db.products().get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.price.amount(), dec!(1.999));
    }

    #[tokio::test]
    async fn test_insert_unknown_category_is_invalid_reference() {
        let db = test_support::db().await;

        let err = db
            .products()
            .insert(&new_product(42, Price::from_cents(100)))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::InvalidReference { .. }));
        assert!(db.products().list(Page::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_rejects_negative_price() {
        let db = test_support::db().await;
        let category = test_support::category(&db, "Toys").await;

        let err = db
            .products()
            .insert(&new_product(category.id, Price::from_cents(-1)))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Invalid(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }

    #[tokio::test]
    async fn test_free_product_is_allowed() {
        let db = test_support::db().await;
        let category = test_support::category(&db, "Books").await;

        let created = db
            .products()
            .insert(&new_product(category.id, Price::from_cents(0)))
            .await
            .unwrap();
        assert_eq!(created.price, Price::default());
    }

    #[tokio::test]
    async fn test_list_pages_by_id() {
        let db = test_support::db().await;
        let category = test_support::category(&db, "Books").await;
        for i in 1..=5 {
            test_support::product(&db, category.id, &format!("Book {i}"), 1000 + i).await;
        }

        let page = db.products().list(Page::new(2, 2)).await.unwrap();
        let names: Vec<_> = page.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Book 3", "Book 4"]);

        assert!(db.products().list(Page::new(10, 2)).await.unwrap().is_empty());
    }
}
