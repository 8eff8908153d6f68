//! # Domain Errors
//!
//! [`CoreError`] names a broken inventory rule: an OUT of more than is on
//! the shelf, deleting the last admin, a category still holding products.
//! [`ValidationError`] covers malformed operator input and converts into
//! `CoreError::Validation`.
//!
//! The messages are what the operator reads, so they are written as full
//! sentences and the console prints them without rewording.

use thiserror::Error;

use crate::types::ChangeType;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
///
/// Every variant is raised either before the gateway is touched (input
/// checks) or after a lookup proved the rule was broken.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A stock movement quantity outside `1..=MAX_MOVEMENT_QUANTITY`, or one
    /// that would push the balance past the range of a 64-bit integer.
    #[error("Quantity must be between 1 and {} (got {0})", crate::MAX_MOVEMENT_QUANTITY)]
    InvalidQuantity(i64),

    /// Product id does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A product referenced a category that does not exist.
    #[error("Category {0} does not exist")]
    InvalidCategory(i64),

    /// Category lookup failed.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Category still referenced by products.
    ///
    /// ## When This Occurs
    /// - Deleting a category that products point at
    #[error("Category {category} is used by {products} product(s)")]
    CategoryInUse { category: String, products: i64 },

    /// No movement has ever been recorded for the product.
    #[error("No stock movements found for product {0}")]
    NoMovementFound(i64),

    /// OUT movement larger than the current balance.
    ///
    /// Only raised when the ledger runs with the reject-insufficient policy.
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// Username already registered.
    #[error("Username '{0}' already exists")]
    UsernameTaken(String),

    /// A required text field was blank.
    #[error("{field} cannot be empty")]
    EmptyField { field: String },

    /// User lookup failed.
    #[error("User does not exist: {0}")]
    UserNotFound(String),

    /// An admin tried to delete their own account.
    #[error("You cannot delete your own account")]
    SelfDeletion,

    /// Deleting the target would leave no administrator.
    #[error("Cannot delete the last remaining admin account")]
    LastAdmin,

    /// Login failed, without saying which half was wrong.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// A partial update carried no fields.
    #[error("No fields supplied, nothing to update")]
    NothingToUpdate,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Builds the insufficient-stock error for an OUT movement.
    pub fn insufficient(product_id: i64, available: i64, requested: i64) -> Self {
        CoreError::InsufficientStock {
            product_id,
            available,
            requested,
        }
    }

    /// Builds the error for an unparseable change type.
    pub fn unknown_change_type(raw: &str) -> Self {
        CoreError::Validation(ValidationError::NotAllowed {
            field: "change type".to_string(),
            value: raw.to_string(),
            allowed: ChangeType::ALL.iter().map(|t| t.as_str().to_string()).collect(),
        })
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Operator input that cannot be accepted as typed.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Blank after trimming.
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or more.
    #[error("{field} cannot be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., unparseable price or date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Not one of a fixed set, e.g. a role or change type.
    #[error("{field} '{value}' must be one of: {allowed:?}")]
    NotAllowed {
        field: String,
        value: String,
        allowed: Vec<String>,
    },
}

pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::insufficient(4, 7, 1000);
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product 4: available 7, requested 1000"
        );

        assert_eq!(
            CoreError::InvalidQuantity(0).to_string(),
            "Quantity must be between 1 and 2147483647 (got 0)"
        );
    }

    #[test]
    fn test_credentials_message_is_generic() {
        let msg = CoreError::InvalidCredentials.to_string();
        assert!(!msg.contains("not found"));
        assert_eq!(msg, "Invalid username or password");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_unknown_change_type_lists_allowed_values() {
        let err = CoreError::unknown_change_type("SIDEWAYS");
        let msg = err.to_string();
        assert!(msg.contains("SIDEWAYS"));
        assert!(msg.contains("IN"));
        assert!(msg.contains("OUT"));
    }
}
