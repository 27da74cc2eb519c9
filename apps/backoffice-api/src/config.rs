//! Back-office configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use backoffice_core::{DEFAULT_LOW_STOCK_THRESHOLD, DEFAULT_PAGE_LIMIT};
use backoffice_db::DbConfig;

/// Facade configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// SQLite database file (`BACKOFFICE_DATABASE_PATH`)
    pub database_path: PathBuf,

    /// Pool size (`BACKOFFICE_MAX_CONNECTIONS`)
    pub max_connections: u32,

    /// Pool acquire timeout in seconds (`BACKOFFICE_CONNECT_TIMEOUT_SECS`)
    pub connect_timeout_secs: u64,

    /// Page size when a request gives none (`BACKOFFICE_DEFAULT_PAGE_LIMIT`)
    pub default_page_limit: u32,

    /// Upper bound on any requested page size (`BACKOFFICE_MAX_PAGE_LIMIT`)
    pub max_page_limit: u32,

    /// Threshold used by `low_stock` when the caller gives none
    /// (`BACKOFFICE_LOW_STOCK_THRESHOLD`)
    pub low_stock_threshold: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            database_path: PathBuf::from("backoffice.db"),
            max_connections: 5,
            connect_timeout_secs: 30,
            default_page_limit: DEFAULT_PAGE_LIMIT,
            max_page_limit: 1000,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Unset keys fall back to [`ApiConfig::default`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ApiConfig::default();

        let config = ApiConfig {
            database_path: lookup("BACKOFFICE_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            max_connections: parse_or(&lookup, "BACKOFFICE_MAX_CONNECTIONS", defaults.max_connections)?,

            connect_timeout_secs: parse_or(
                &lookup,
                "BACKOFFICE_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            )?,

            default_page_limit: parse_or(
                &lookup,
                "BACKOFFICE_DEFAULT_PAGE_LIMIT",
                defaults.default_page_limit,
            )?,

            max_page_limit: parse_or(&lookup, "BACKOFFICE_MAX_PAGE_LIMIT", defaults.max_page_limit)?,

            low_stock_threshold: parse_or(
                &lookup,
                "BACKOFFICE_LOW_STOCK_THRESHOLD",
                defaults.low_stock_threshold,
            )?,
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue("BACKOFFICE_MAX_CONNECTIONS".to_string()));
        }

        if config.low_stock_threshold < 0 {
            return Err(ConfigError::InvalidValue(
                "BACKOFFICE_LOW_STOCK_THRESHOLD".to_string(),
            ));
        }

        if config.default_page_limit > config.max_page_limit {
            return Err(ConfigError::Inconsistent(format!(
                "default page limit {} exceeds max page limit {}",
                config.default_page_limit, config.max_page_limit
            )));
        }

        Ok(config)
    }

    /// Pool configuration for this facade.
    pub fn to_db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
            .max_connections(self.max_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Inconsistent configuration: {0}")]
    Inconsistent(String),
}
