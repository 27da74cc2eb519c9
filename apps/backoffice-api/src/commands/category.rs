//! # Category Commands

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::commands::Pagination;
use crate::error::ApiError;
use crate::state::AppState;
use backoffice_core::{Category, NewCategory};

/// Request body of `create_category`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Category as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        CategoryResponse {
            id: c.id,
            name: c.name,
            description: c.description,
        }
    }
}

/// Creates a category.
pub async fn create_category(
    state: &AppState,
    request: CreateCategoryRequest,
) -> Result<CategoryResponse, ApiError> {
    debug!(name = %request.name, "create_category command");

    let category = state
        .db()
        .categories()
        .insert(&NewCategory {
            name: request.name,
            description: request.description,
        })
        .await?;

    info!(id = category.id, name = %category.name, "Category created");

    Ok(CategoryResponse::from(category))
}

/// Lists categories ordered by id.
pub async fn list_categories(
    state: &AppState,
    pagination: Pagination,
) -> Result<Vec<CategoryResponse>, ApiError> {
    let page = pagination.to_page(state.config());
    debug!(offset = page.offset, limit = page.limit, "list_categories command");

    let categories = state.db().categories().list(page).await?;
    Ok(categories.into_iter().map(CategoryResponse::from).collect())
}
