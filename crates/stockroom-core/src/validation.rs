//! # Validation Module
//!
//! Input checks that run before any database call.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Console                                                       │
//! │  └── Parsing (ids, quantities, "9.99", IN/OUT, timestamps)              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repositories / Ledger                                         │
//! │  └── THIS MODULE: names, quantities, prices, credentials                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                        │
//! │  ├── UNIQUE (users.username)                                            │
//! │  ├── FOREIGN KEY (products.category_id)                                 │
//! │  └── CHECK (stock_movements.quantity > 0)                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::{MAX_MOVEMENT_QUANTITY, MAX_NAME_LENGTH, MAX_USERNAME_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Names
// =============================================================================

fn validate_name(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(trimmed.to_string())
}

/// Validates a product name and returns it trimmed.
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_product_name;
///
/// assert_eq!(validate_product_name("  Hammer ").unwrap(), "Hammer");
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    validate_name("product name", name, MAX_NAME_LENGTH)
}

/// Validates a category name and returns it trimmed.
pub fn validate_category_name(name: &str) -> ValidationResult<String> {
    validate_name("category name", name, MAX_NAME_LENGTH)
}

// =============================================================================
// Credentials
// =============================================================================

/// Validates a username for registration. Blank input is `EmptyField`.
pub fn validate_username(username: &str) -> CoreResult<String> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(CoreError::EmptyField {
            field: "Username".to_string(),
        });
    }
    if trimmed.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: MAX_USERNAME_LENGTH,
        }
        .into());
    }
    Ok(trimmed.to_string())
}

/// Rejects a blank password. The password itself is hashed untrimmed.
pub fn validate_password(password: &str) -> CoreResult<()> {
    if password.trim().is_empty() {
        return Err(CoreError::EmptyField {
            field: "Password".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Numbers
// =============================================================================

/// A movement quantity lies in `1..=MAX_MOVEMENT_QUANTITY`.
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_movement_quantity;
///
/// assert!(validate_movement_quantity(1).is_ok());
/// assert!(validate_movement_quantity(0).is_err());
/// assert!(validate_movement_quantity(-4).is_err());
/// assert!(validate_movement_quantity(i64::MAX).is_err());
/// ```
pub fn validate_movement_quantity(quantity: i64) -> CoreResult<()> {
    if !(1..=MAX_MOVEMENT_QUANTITY).contains(&quantity) {
        return Err(CoreError::InvalidQuantity(quantity));
    }
    Ok(())
}

/// Stock levels set directly (create, correction) cannot be negative.
pub fn validate_stock_level(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Prices are zero or more.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Row ids are positive.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
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
    fn test_names() {
        assert_eq!(validate_category_name(" Tools ").unwrap(), "Tools");
        assert!(matches!(
            validate_category_name(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_product_name(&"x".repeat(MAX_NAME_LENGTH + 1)),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_credentials() {
        assert_eq!(validate_username(" bob ").unwrap(), "bob");
        assert!(matches!(
            validate_username("  "),
            Err(CoreError::EmptyField { .. })
        ));
        assert!(validate_password("pw").is_ok());
        assert!(matches!(
            validate_password(" "),
            Err(CoreError::EmptyField { .. })
        ));
    }

    #[test]
    fn test_movement_quantity() {
        assert!(validate_movement_quantity(3).is_ok());
        assert!(matches!(
            validate_movement_quantity(0),
            Err(CoreError::InvalidQuantity(0))
        ));
        assert!(validate_movement_quantity(MAX_MOVEMENT_QUANTITY).is_ok());
        assert!(matches!(
            validate_movement_quantity(MAX_MOVEMENT_QUANTITY + 1),
            Err(CoreError::InvalidQuantity(_))
        ));
        assert!(matches!(
            validate_movement_quantity(i64::MAX),
            Err(CoreError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn test_stock_level_and_price() {
        assert!(validate_stock_level(0).is_ok());
        assert!(validate_stock_level(-1).is_err());
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(-1).is_err());
        assert!(validate_id("category id", 1).is_ok());
        assert!(validate_id("category id", 0).is_err());
    }
}
