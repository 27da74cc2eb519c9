//! # Category Repository
//!
//! Database operations for product categories.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::page_bounds;
use backoffice_core::validation::validate_new_category;
use backoffice_core::{Category, NewCategory, Page};

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Inserts a new category.
    ///
    /// ## Returns
    /// The stored category with its generated id. The name is trimmed.
    pub async fn insert(&self, category: &NewCategory) -> DbResult<Category> {
        validate_new_category(category)?;

        let name = category.name.trim();
        let description = category
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());

        debug!(name = %name, "Inserting category");

        let id = sqlx::query("INSERT INTO categories (name, description) VALUES (?1, ?2)")
            .bind(name)
            .bind(description)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        Ok(Category {
            id,
            name: name.to_string(),
            description: description.map(str::to_string),
        })
    }

    /// Gets a category by ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Category))` - Category found
    /// * `Ok(None)` - Category not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Lists categories ordered by id.
    pub async fn list(&self, page: Page) -> DbResult<Vec<Category>> {
        let (limit, offset) = page_bounds(page);

        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description
            FROM categories
            ORDER BY id
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Checks whether a category exists.
    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM categories WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
