//! # stockroom-core
//!
//! The inventory vocabulary shared by the database layer and the console:
//! products, categories, stock movements, users and their roles. Nothing
//! here touches a file, socket or database.
//!
//! ```text
//!   apps/console ──► stockroom-db ──► stockroom-core
//!        │                                 ▲
//!        └─────────────────────────────────┘
//!
//!   types       Product, Category, StockMovement, User, UserLog
//!   money       Money (integer cents), "9.99" parsing
//!   auth        Role ──can()──► Capability, SHA-256 password digest
//!   validation  names, quantities, prices, date ranges
//!   error       CoreError, ValidationError
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::{ChangeType, Money};
//!
//! let price: Money = "9.99".parse().unwrap();
//! assert_eq!(price.cents(), 999);
//!
//! assert_eq!("out".parse::<ChangeType>().unwrap(), ChangeType::Out);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports
// =============================================================================

pub use auth::{hash_password, verify_password, Capability};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Bootstrap Account
// =============================================================================

/// Username of the administrator created on first start.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Password of the administrator created on first start.
///
/// Operators are expected to register a real admin and delete this one.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Maximum length of product and category names.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length of a username.
pub const MAX_USERNAME_LENGTH: usize = 50;

/// Largest quantity a single stock movement may carry.
pub const MAX_MOVEMENT_QUANTITY: i64 = i32::MAX as i64;
