//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │◄──│     Product     │◄──│  StockMovement  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name           │   │  name           │   │  product_id     │       │
//! │  └─────────────────┘   │  category_id    │   │  change_type    │       │
//! │                        │  quantity       │   │  quantity (>0)  │       │
//! │                        │  price_cents    │   │  movement_time  │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │      Role       │   │     UserLog     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, username   │   │  Admin          │   │  username       │       │
//! │  │  role           │   │  Employee       │   │  action, time   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ids are database-generated integers. A movement never changes after it
//! is written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, ValidationError};
use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.name)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A stocked product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Database-generated identifier.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Owning category.
    pub category_id: i64,

    /// Units on hand. Can go negative through OUT movements.
    pub quantity: i64,

    /// Unit price in cents (column `price`).
    #[cfg_attr(feature = "sqlx", sqlx(rename = "price"))]
    pub price_cents: i64,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Value of the units on hand.
    pub fn stock_value(&self) -> Money {
        self.price() * self.quantity
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} (category {}) qty {} @ {}",
            self.id,
            self.name,
            self.category_id,
            self.quantity,
            self.price()
        )
    }
}

/// Fields for a product that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub category_id: i64,
    pub quantity: i64,
    pub price_cents: i64,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, category_id: i64, quantity: i64, price: Money) -> Self {
        NewProduct {
            name: name.into(),
            category_id,
            quantity,
            price_cents: price.cents(),
        }
    }
}

/// Partial product update. `None` (or a blank name) leaves the column untouched.
///
/// Setting `quantity` here overwrites the balance without a movement row,
/// which is how stock counts are corrected. Ordinary receipts and issues go
/// through the stock ledger instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category_id: Option<i64>,
    pub quantity: Option<i64>,
    pub price_cents: Option<i64>,
}

impl ProductUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn category_id(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn price(mut self, price: Money) -> Self {
        self.price_cents = Some(price.cents());
        self
    }

    /// The new name, if one was supplied and is not blank.
    pub fn effective_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// True when no column would change.
    pub fn is_empty(&self) -> bool {
        self.effective_name().is_none()
            && self.category_id.is_none()
            && self.quantity.is_none()
            && self.price_cents.is_none()
    }
}

// =============================================================================
// Change Type
// =============================================================================

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    /// Goods received; quantity goes up.
    In,
    /// Goods issued; quantity goes down.
    Out,
}

impl ChangeType {
    pub const ALL: [ChangeType; 2] = [ChangeType::In, ChangeType::Out];

    /// Column value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ChangeType::In => "IN",
            ChangeType::Out => "OUT",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive: `in`, `IN`, ` Out `.
impl FromStr for ChangeType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IN" => Ok(ChangeType::In),
            "OUT" => Ok(ChangeType::Out),
            _ => Err(CoreError::unknown_change_type(s.trim())),
        }
    }
}

// =============================================================================
// Stock Movement
// =============================================================================

/// One IN/OUT adjustment event. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockMovement {
    pub id: i64,
    pub product_id: i64,
    pub change_type: ChangeType,
    /// Always positive; the direction lives in `change_type`.
    pub quantity: i64,
    pub movement_time: DateTime<Utc>,
}

impl fmt::Display for StockMovement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} product {} {} {} at {}",
            self.id,
            self.product_id,
            self.change_type,
            self.quantity,
            self.movement_time.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

/// How the ledger treats an OUT movement larger than the balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockPolicy {
    /// Record it; the balance goes negative.
    #[default]
    AllowNegative,
    /// Refuse it with `InsufficientStock` and write nothing.
    RejectInsufficient,
}

// =============================================================================
// Role
// =============================================================================

/// Access tier of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Admin, Role::Employee];

    /// Column value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Employee => "EMPLOYEE",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive: `admin`, `EMPLOYEE`.
impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "EMPLOYEE" => Ok(Role::Employee),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                value: s.trim().to_string(),
                allowed: Role::ALL.iter().map(|r| r.as_str().to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// A user as listed to administrators. The password hash never leaves the
/// repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} ({})", self.id, self.username, self.role)
    }
}

// =============================================================================
// User Log
// =============================================================================

/// One audit row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UserLog {
    pub id: i64,
    pub username: String,
    pub action: String,
    pub timestamp: DateTime<Utc>,
}

impl fmt::Display for UserLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {}",
            self.username,
            self.action,
            self.timestamp.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_change_type_parsing() {
        assert_eq!("in".parse::<ChangeType>().unwrap(), ChangeType::In);
        assert_eq!(" OUT ".parse::<ChangeType>().unwrap(), ChangeType::Out);
        assert!("sideways".parse::<ChangeType>().is_err());
        assert!("".parse::<ChangeType>().is_err());
    }

    #[test]
    fn test_movement_display() {
        let movement = StockMovement {
            id: 1,
            product_id: 1,
            change_type: ChangeType::Out,
            quantity: 3,
            movement_time: Utc.with_ymd_and_hms(2026, 1, 31, 9, 30, 0).unwrap(),
        };
        assert_eq!(
            movement.to_string(),
            "#1 product 1 OUT 3 at 2026-01-31 09:30:00"
        );
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("Employee".parse::<Role>().unwrap(), Role::Employee);
        assert!("manager".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_uses_column_spelling() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(serde_json::to_string(&ChangeType::Out).unwrap(), "\"OUT\"");
    }

    #[test]
    fn test_product_update_emptiness() {
        assert!(ProductUpdate::default().is_empty());
        assert!(ProductUpdate::default().name("   ").is_empty());
        assert!(!ProductUpdate::default().quantity(0).is_empty());
        assert_eq!(
            ProductUpdate::default().name(" Mallet ").effective_name(),
            Some("Mallet")
        );
    }

    #[test]
    fn test_product_stock_value() {
        let product = Product {
            id: 1,
            name: "Hammer".to_string(),
            category_id: 1,
            quantity: 7,
            price_cents: 999,
        };
        assert_eq!(product.stock_value().cents(), 6993);
        assert_eq!(product.stock_value().to_string(), "69.93");
    }

    #[test]
    fn test_stock_policy_default() {
        assert_eq!(StockPolicy::default(), StockPolicy::AllowNegative);
    }
}
