//! # Validation Module
//!
//! Input validation for the storefront forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Command (Rust)                                                │
//! │  ├── THIS MODULE: field and business rule checks                       │
//! │  └── Fails fast, nothing leaves the client                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Backend (REST)                                                │
//! │  ├── Authoritative stock and permission checks                         │
//! │  └── Reported back as a one-line message                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pharmacy_core::validation::{validate_quantity, validate_search_query};
//!
//! validate_quantity(5).unwrap();
//! assert_eq!(validate_search_query("  aspirin ").unwrap(), "aspirin");
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::ShippingAddress;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted search query.
pub const MAX_QUERY_LEN: usize = 100;

/// Longest accepted review comment.
pub const MAX_COMMENT_LEN: usize = 1000;

// =============================================================================
// Text Validators
// =============================================================================

/// Validates that a text field is present, returning it trimmed.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(value.to_string())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (no suggestions, no request)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

/// Validates an email address shape.
///
/// Only the shape is checked (`local@domain.tld`); the backend owns the
/// rest.
///
/// ```rust
/// use pharmacy_core::validation::validate_email;
///
/// assert!(validate_email("amina@example.com").is_ok());
/// assert!(validate_email("amina@").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = validate_required("email", email)?;

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@example.com".to_string(),
        });
    }

    Ok(email)
}

/// Validates that a password and its confirmation agree.
pub fn validate_password_match(password: &str, confirm: &str) -> ValidationResult<()> {
    if password != confirm {
        return Err(ValidationError::Mismatch(
            "Passwords do not match".to_string(),
        ));
    }
    Ok(())
}

/// Validates a payment method choice.
pub fn validate_payment_method(method: &str) -> ValidationResult<String> {
    validate_required("paymentMethod", method)
}

/// Validates a rejection reason, returning it trimmed.
pub fn validate_reject_reason(reason: &str) -> ValidationResult<String> {
    validate_required("reason", reason)
}

/// Validates a review before posting.
///
/// ## Rules
/// - Rating between 1 and 5
/// - Comment present and at most 1000 characters
pub fn validate_review(rating: u8, comment: &str) -> ValidationResult<String> {
    if !(1..=5).contains(&rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: 1,
            max: 5,
        });
    }

    let comment = validate_required("comment", comment)?;
    if comment.chars().count() > MAX_COMMENT_LEN {
        return Err(ValidationError::TooLong {
            field: "comment".to_string(),
            max: MAX_COMMENT_LEN,
        });
    }

    Ok(comment)
}

/// Validates the shipping form.
///
/// ## Rules
/// - fullName, address, city, postalCode, country are required
/// - location and prescription are optional
pub fn validate_shipping_address(address: &ShippingAddress) -> ValidationResult<()> {
    validate_required("fullName", &address.full_name)?;
    validate_required("address", &address.address)?;
    validate_required("city", &address.city)?;
    validate_required("postalCode", &address.postal_code)?;
    validate_required("country", &address.country)?;
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 || qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY as i64,
        });
    }

    Ok(())
}

/// Checks a requested quantity against a freshly read stock count.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product screen: Add to Cart                                            │
/// │                                                                         │
/// │  quantity = existing line + 1                                           │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  GET /api/products/{id}  (fresh countInStock)                           │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  ensure_in_stock ← THIS FUNCTION                                        │
/// │       │                                                                 │
/// │       ├── stock < quantity? → "Sorry. Product is out of stock"          │
/// │       │                                                                 │
/// │       └── OK → dispatch CartAddItem                                     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn ensure_in_stock(name: &str, requested: u32, available: u32) -> CoreResult<()> {
    if requested > MAX_ITEM_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested,
            max: MAX_ITEM_QUANTITY,
        });
    }
    validate_quantity(requested)?;

    if available < requested {
        return Err(CoreError::OutOfStock {
            name: name.to_string(),
            available,
            requested,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_ensure_in_stock() {
        assert!(ensure_in_stock("Aspirin", 2, 2).is_ok());

        let err = ensure_in_stock("Aspirin", 3, 2).unwrap_err();
        assert!(err.to_string().starts_with("Sorry. Product is out of stock"));

        assert!(matches!(
            ensure_in_stock("Aspirin", 1000, 5000),
            Err(CoreError::QuantityTooLarge { .. })
        ));
        assert!(matches!(
            ensure_in_stock("Aspirin", 0, 5),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  ").unwrap(), "");
        assert_eq!(validate_search_query(" zinc ").unwrap(), "zinc");
        assert!(validate_search_query(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("a@nodot").is_err());
        assert!(validate_email("a b@c.d").is_err());
    }

    #[test]
    fn test_validate_review() {
        assert_eq!(validate_review(5, " Works well ").unwrap(), "Works well");
        assert!(validate_review(0, "ok").is_err());
        assert!(validate_review(6, "ok").is_err());
        assert_eq!(
            validate_review(3, "  "),
            Err(ValidationError::required("comment"))
        );
    }

    #[test]
    fn test_validate_password_match() {
        assert!(validate_password_match("secret", "secret").is_ok());
        assert!(validate_password_match("secret", "Secret").is_err());
    }

    #[test]
    fn test_validate_shipping_address() {
        let mut address = ShippingAddress {
            full_name: "Amina Yusuf".to_string(),
            address: "12 Market Road".to_string(),
            city: "Kano".to_string(),
            postal_code: "700001".to_string(),
            country: "Nigeria".to_string(),
            ..Default::default()
        };
        assert!(validate_shipping_address(&address).is_ok());

        address.city = " ".to_string();
        assert_eq!(
            validate_shipping_address(&address),
            Err(ValidationError::required("city"))
        );
    }

    #[test]
    fn test_validate_reject_reason() {
        assert_eq!(validate_reject_reason(" blurry scan ").unwrap(), "blurry scan");
        assert!(validate_reject_reason("").is_err());
        assert!(validate_payment_method("").is_err());
    }
}
