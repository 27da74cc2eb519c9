//! # API Error Type
//!
//! Unified error type for facade commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Facade                             │
//! │                                                                         │
//! │  Command Function → Result<T, ApiError>                                │
//! │         │                                                               │
//! │         ├── ValidationError / CoreError ─────────► invalid_input  400  │
//! │         ├── DbError::NotFound ───────────────────► not_found      404  │
//! │         ├── DbError::InvalidReference / FK / dup ► invalid_input  400  │
//! │         └── DbError (connection, query, tx, ...) ► storage_failure 500 │
//! │                                                    (detail logged,      │
//! │                                                     generic message)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use backoffice_core::{CoreError, ValidationError};
use backoffice_db::DbError;

/// API error returned from facade commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "not_found",
///   "message": "Product not found: 42"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input rejected (400)
    InvalidInput,

    /// Store unavailable or operation failed (500)
    StorageFailure,
}

impl ErrorCode {
    /// HTTP-style status for the code.
    pub fn status(&self) -> u16 {
        match self {
            ErrorCode::NotFound => 404,
            ErrorCode::InvalidInput => 400,
            ErrorCode::StorageFailure => 500,
        }
    }

    /// Wire name of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "not_found",
            ErrorCode::InvalidInput => "invalid_input",
            ErrorCode::StorageFailure => "storage_failure",
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidInput, message)
    }

    /// Creates a storage failure error.
    pub fn storage(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::StorageFailure, message)
    }

    /// HTTP-style status of this error.
    pub fn status(&self) -> u16 {
        self.code.status()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::InvalidReference { entity, id } => {
                ApiError::invalid_input(format!("{} {} does not exist", entity, id))
            }
            DbError::Invalid(e) => ApiError::from(e),
            DbError::UniqueViolation { field, value } => {
                ApiError::invalid_input(format!("{} '{}' already exists", field, value))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::invalid_input("Invalid reference")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::storage("Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::storage("Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::storage("Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::storage("Database transaction failed")
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::storage("Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::storage("Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::invalid_input(err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::invalid_input(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_serialize_snake_case() {
        let err = ApiError::not_found("Sale", 3);
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["code"], "not_found");
        assert_eq!(json["message"], "Sale not found: 3");
        assert_eq!(err.status(), 404);
    }

    #[test]
    fn test_db_error_mapping() {
        let not_found: ApiError = DbError::not_found("Product", 9).into();
        assert_eq!(not_found.code, ErrorCode::NotFound);

        let bad_ref: ApiError = DbError::invalid_reference("Category", 7).into();
        assert_eq!(bad_ref.code, ErrorCode::InvalidInput);
        assert_eq!(bad_ref.status(), 400);

        let invalid: ApiError = DbError::Invalid(CoreError::EmptySale).into();
        assert_eq!(invalid.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_storage_failures_hide_detail() {
        let err: ApiError = DbError::QueryFailed("disk I/O error at page 7".to_string()).into();

        assert_eq!(err.code, ErrorCode::StorageFailure);
        assert_eq!(err.status(), 500);
        assert!(!err.message.contains("page 7"));
    }

    #[test]
    fn test_display() {
        let err = ApiError::invalid_input("Sale must have at least one item");
        assert_eq!(err.to_string(), "[invalid_input] Sale must have at least one item");
    }
}
