//! # Back-Office Query Facade
//!
//! Request/response commands over the back-office record store.
//!
//! ## Module Organization
//! ```text
//! backoffice_api/
//! ├── lib.rs          ◄─── You are here (exports, logging setup)
//! ├── config.rs       ◄─── Environment configuration
//! ├── state.rs        ◄─── Store handle + config passed to commands
//! ├── error.rs        ◄─── ApiError { code, message }
//! └── commands/
//!     ├── category.rs ◄─── create/list categories
//!     ├── product.rs  ◄─── create/list/get products
//!     ├── inventory.rs◄─── stock levels, low-stock report
//!     ├── sale.rs     ◄─── record/get sales
//!     ├── analytics.rs◄─── list, summary, revenue by period
//!     └── health.rs   ◄─── store reachability
//! ```
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Caller (report binary, HTTP adapter, tests)                           │
//! │       │  create_sale(&state, CreateSaleRequest { .. })                 │
//! │       ▼                                                                 │
//! │  Command: Decimal → cents, Option defaults, pagination clamp           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  backoffice-db repository (validation, SQL)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Response DTO (serde, Decimal money)  or  ApiError                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod state;

use tracing_subscriber::EnvFilter;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use state::AppState;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=backoffice_db=trace` - Trace the record store only
/// - Default: `info,backoffice=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,backoffice=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
