//! # Error Types
//!
//! Domain-specific error types for pharmacy-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pharmacy-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  pharmacy-storage     └── StorageError  - Local storage failures       │
//! │  pharmacy-client      └── ClientError   - REST call failures           │
//! │  storefront app       └── AppError      - One-line user notification   │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → user                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Requested quantity is above the live stock count.
    ///
    /// ## User Workflow
    /// ```text
    /// Add to Cart (qty: 3)
    ///      │
    ///      ▼
    /// Fresh read: countInStock = 2
    ///      │
    ///      ▼
    /// OutOfStock { name: "Ibuprofen", available: 2, requested: 3 }
    ///      │
    ///      ▼
    /// UI shows: "Sorry. Product is out of stock"
    /// ```
    #[error("Sorry. Product is out of stock ({name}: available {available}, requested {requested})")]
    OutOfStock {
        name: String,
        available: u32,
        requested: u32,
    },

    /// The order cannot move from its current status to the requested one.
    #[error("Order {order_id} is {from}, cannot change to {to}")]
    InvalidTransition {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// The acting user lacks the privilege for the requested change.
    #[error("Only an administrator can mark an order as {0}")]
    NotPermitted(OrderStatus),

    /// The cart has no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: u32, max: u32 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any request leaves the client.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two fields that must agree do not.
    #[error("{0}")]
    Mismatch(String),
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::OutOfStock {
            name: "Ibuprofen".to_string(),
            available: 2,
            requested: 3,
        };
        assert_eq!(
            err.to_string(),
            "Sorry. Product is out of stock (Ibuprofen: available 2, requested 3)"
        );

        let err = CoreError::InvalidTransition {
            order_id: "abc".to_string(),
            from: OrderStatus::Delivered,
            to: OrderStatus::Cancelled,
        };
        assert_eq!(err.to_string(), "Order abc is delivered, cannot change to cancelled");
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            ValidationError::required("fullName").to_string(),
            "fullName is required"
        );
        assert_eq!(
            ValidationError::Mismatch("Passwords do not match".to_string()).to_string(),
            "Passwords do not match"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("reason").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
