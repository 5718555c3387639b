//! # Validation Module
//!
//! Input validation for cart operations and persisted snapshots.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Screen (TypeScript)                                          │
//! │  └── Product comes straight from the catalog API                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: CartStore::add_to_cart                                       │
//! │  └── validate_candidate: id present, price finite and >= 0             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Snapshot hydration                                           │
//! │  └── validate_items: quantities >= 1, ids unique                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A NaN price would serialize as `null` and poison the next hydration, so
//! it is rejected here rather than at load time.

use std::collections::HashSet;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{CartCandidate, CartItem};
use crate::MIN_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a product id.
///
/// Any non-blank string is accepted; ids are opaque catalog keys.
///
/// ## Example
/// ```rust
/// use gomarket_core::validation::validate_product_id;
///
/// assert!(validate_product_id("p1").is_ok());
/// assert!(validate_product_id("  ").is_err());
/// ```
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    Ok(())
}

/// Validates a catalog price.
pub fn validate_price(price: f64) -> ValidationResult<()> {
    if !price.is_finite() {
        return Err(ValidationError::MustBeFinite {
            field: "price".to_string(),
        });
    }

    if price < 0.0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates an add-to-cart candidate.
pub fn validate_candidate(candidate: &CartCandidate) -> ValidationResult<()> {
    validate_product_id(&candidate.id)?;
    validate_price(candidate.price)?;
    Ok(())
}

// =============================================================================
// Snapshot Validators
// =============================================================================

/// Checks the cart invariants over a decoded item list.
///
/// ## Rules
/// - Every quantity is at least [`MIN_ITEM_QUANTITY`]
/// - No two items share an id
pub fn validate_items(items: &[CartItem]) -> CoreResult<()> {
    let mut seen = HashSet::with_capacity(items.len());

    for item in items {
        if item.quantity < MIN_ITEM_QUANTITY {
            return Err(CoreError::InvalidQuantity {
                id: item.id.clone(),
                quantity: item.quantity,
            });
        }

        if !seen.insert(item.id.as_str()) {
            return Err(CoreError::DuplicateItem {
                id: item.id.clone(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, quantity: u32) -> CartItem {
        CartItem {
            id: id.to_string(),
            title: format!("Product {}", id),
            image_url: String::new(),
            price: 1.0,
            quantity,
        }
    }

    #[test]
    fn test_validate_product_id() {
        assert!(validate_product_id("p1").is_ok());
        assert!(matches!(
            validate_product_id(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_product_id(&"x".repeat(500)).is_ok());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(199.99).is_ok());
        assert!(matches!(
            validate_price(f64::NAN),
            Err(ValidationError::MustBeFinite { .. })
        ));
        assert!(matches!(
            validate_price(f64::INFINITY),
            Err(ValidationError::MustBeFinite { .. })
        ));
        assert!(matches!(
            validate_price(-0.01),
            Err(ValidationError::MustNotBeNegative { .. })
        ));
    }

    #[test]
    fn test_validate_items_accepts_valid_cart() {
        assert!(validate_items(&[item("p1", 1), item("p2", 7)]).is_ok());
        assert!(validate_items(&[]).is_ok());
    }

    #[test]
    fn test_validate_items_rejects_zero_quantity() {
        let err = validate_items(&[item("p1", 0)]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidQuantity { quantity: 0, .. }));
    }

    #[test]
    fn test_validate_items_rejects_duplicates() {
        let err = validate_items(&[item("p1", 1), item("p1", 2)]).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateItem { ref id } if id == "p1"));
    }
}
