//! # Facade State
//!
//! The store handle and configuration every command receives.
//!
//! ## Thread Safety
//! `Database` wraps a `SqlitePool`, which is already shareable across tasks.
//! `AppState` is cheap to clone and needs no locking.

use tracing::info;

use crate::config::ApiConfig;
use crate::error::ApiError;
use backoffice_db::Database;

/// Store handle plus facade configuration.
///
/// ## Usage in Commands
/// ```rust,ignore
/// pub async fn list_products(state: &AppState, pagination: Pagination)
///     -> Result<Vec<ProductResponse>, ApiError>
/// {
///     let page = pagination.to_page(state.config());
///     let products = state.db().products().list(page).await?;
///     Ok(products.into_iter().map(ProductResponse::from).collect())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AppState {
    db: Database,
    config: ApiConfig,
}

impl AppState {
    /// Wraps an open database.
    pub fn new(db: Database, config: ApiConfig) -> Self {
        AppState { db, config }
    }

    /// Opens the configured database (running migrations) and wraps it.
    pub async fn connect(config: ApiConfig) -> Result<Self, ApiError> {
        let db = Database::new(config.to_db_config()).await?;

        info!(path = %config.database_path.display(), "Database connected and migrations applied");

        Ok(AppState::new(db, config))
    }

    /// Returns a reference to the inner Database.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Returns the facade configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}
