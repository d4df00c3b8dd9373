//! # App Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  Command Function: AppResult<T>                                         │
//! │         │                                                               │
//! │         ├── ValidationError  ── "fullName is required" ──────┐          │
//! │         ├── CoreError        ── OutOfStock / transition ─────┤          │
//! │         ├── ClientError      ── backend `message` ───────────┼─► AppError
//! │         └── StorageError     ── local storage failure ───────┘          │
//! │                                                                         │
//! │  The CLI prints `message` as a single line and exits non-zero.          │
//! │  A web view receives `{ "code": "...", "message": "..." }`.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pharmacy_client::ClientError;
use pharmacy_core::{CoreError, ValidationError};
use pharmacy_storage::StorageError;
use serde::Serialize;

/// Error returned from storefront commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "OUT_OF_STOCK",
///   "message": "Sorry. Product is out of stock"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// One-line message for the user
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Local storage failed
    StorageError,

    /// Business rule refused the action
    BusinessLogic,

    /// Not signed in, or session rejected by the backend
    Unauthorized,

    /// Signed in but lacking the privilege
    Forbidden,

    /// Not enough stock for the requested quantity
    OutOfStock,

    /// Cart operation failed
    CartError,

    /// The backend could not be reached or answered with an error
    NetworkError,

    /// Configuration could not be loaded
    ConfigError,

    /// Anything else
    Internal,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Forbidden, message)
    }

    pub fn cart(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::CartError, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ConfigError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            // the detailed variant text goes to the log, the user sees the fixed line
            CoreError::OutOfStock { .. } => {
                tracing::warn!(error = %err, "Stock check refused");
                AppError::new(ErrorCode::OutOfStock, "Sorry. Product is out of stock")
            }
            CoreError::NotPermitted(_) => AppError::forbidden(err.to_string()),
            CoreError::EmptyCart | CoreError::CartTooLarge { .. } => {
                AppError::cart(err.to_string())
            }
            CoreError::QuantityTooLarge { .. } => AppError::validation(err.to_string()),
            CoreError::Validation(inner) => inner.into(),
            CoreError::InvalidTransition { .. } => {
                AppError::new(ErrorCode::BusinessLogic, err.to_string())
            }
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::new(ErrorCode::StorageError, err.to_string())
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        let code = match &err {
            ClientError::Unauthorized(_) | ClientError::MissingToken => ErrorCode::Unauthorized,
            ClientError::Status { status: 403, .. } => ErrorCode::Forbidden,
            ClientError::Status { status: 404, .. } => ErrorCode::NotFound,
            ClientError::File { .. } => ErrorCode::ValidationError,
            ClientError::InvalidUrl(_) => ErrorCode::ConfigError,
            _ => ErrorCode::NetworkError,
        };
        AppError::new(code, err.user_message())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for AppError {}

/// Result type for storefront commands.
pub type AppResult<T> = Result<T, AppError>;
