//! # Storage Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error / MigrateError / serde_json::Error                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StorageError (this module)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppError (storefront) ← one-line message for the user                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Local storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The database file could not be opened or created.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored value is not the JSON its key expects.
    #[error("Stored value for '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be serialized for storage.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal storage error: {0}")]
    Internal(String),
}

/// Convert sqlx errors to StorageError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → StorageError::QueryFailed
/// sqlx::Error::PoolTimedOut   → StorageError::PoolExhausted
/// sqlx::Error::PoolClosed     → StorageError::ConnectionFailed
/// Other                       → StorageError::Internal
/// ```
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                StorageError::QueryFailed(db_err.message().to_string())
            }
            sqlx::Error::PoolTimedOut => StorageError::PoolExhausted,
            sqlx::Error::PoolClosed => StorageError::ConnectionFailed("Pool is closed".to_string()),
            _ => StorageError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StorageError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StorageError::MigrationFailed(err.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
