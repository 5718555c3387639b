//! # Error Types
//!
//! Domain-specific error types for gomarket-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  gomarket-core errors (this file)                                      │
//! │  ├── CoreError        - Cart rule violations, snapshot problems        │
//! │  └── ValidationError  - Bad add-to-cart input                          │
//! │                                                                         │
//! │  gomarket-db errors (separate crate)                                   │
//! │  └── StorageError     - Device storage failures                        │
//! │                                                                         │
//! │  gomarket-cart errors                                                  │
//! │  ├── CartError        - Everything a cart operation can return         │
//! │  └── ApiError         - What the screens see (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CartError → ApiError → Toast      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A missing product id on increment/decrement is NOT an error. Those
//! operations report [`CartChange::Unchanged`](crate::CartChange) instead.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core cart errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Two line items share the same product id.
    ///
    /// ## When This Occurs
    /// - A persisted snapshot was edited by hand or written by an old build
    #[error("Duplicate cart item: {id}")]
    DuplicateItem { id: String },

    /// A line item carries a quantity below one.
    #[error("Invalid quantity {quantity} for item {id}")]
    InvalidQuantity { id: String, quantity: u32 },

    /// Incrementing would overflow the quantity counter.
    #[error("Quantity for item {id} cannot grow any further")]
    QuantityOverflow { id: String },

    /// A persisted snapshot could not be decoded.
    #[error("Invalid cart snapshot: {0}")]
    InvalidSnapshot(String),

    /// The cart could not be encoded for storage.
    #[error("Failed to serialize cart: {0}")]
    Serialization(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any cart rule runs, so a rejected candidate never
/// reaches storage.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is NaN or infinite.
    #[error("{field} must be a finite number")]
    MustBeFinite { field: String },

    /// Numeric value is below zero.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidQuantity {
            id: "p1".to_string(),
            quantity: 0,
        };
        assert_eq!(err.to_string(), "Invalid quantity 0 for item p1");

        let err = CoreError::DuplicateItem {
            id: "p2".to_string(),
        };
        assert_eq!(err.to_string(), "Duplicate cart item: p2");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "id".to_string(),
        };
        assert_eq!(err.to_string(), "id is required");

        let err = ValidationError::MustBeFinite {
            field: "price".to_string(),
        };
        assert_eq!(err.to_string(), "price must be a finite number");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
