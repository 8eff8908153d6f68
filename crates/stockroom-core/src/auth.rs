//! # Roles, Capabilities and Password Digest
//!
//! ## Capability Matrix
//! ```text
//! ┌──────────────────┬─────────┬──────────┐
//! │ Capability       │  ADMIN  │ EMPLOYEE │
//! ├──────────────────┼─────────┼──────────┤
//! │ ViewCatalog      │    ✓    │    ✓     │
//! │ EditCatalog      │    ✓    │          │
//! │ RecordMovements  │    ✓    │    ✓     │
//! │ ManageUsers      │    ✓    │          │
//! │ ViewAuditLog     │    ✓    │          │
//! └──────────────────┴─────────┴──────────┘
//! ```
//!
//! The console checks `role.can(capability)` before every command. The
//! repositories below it trust their caller.
//!
//! ## Password Digest
//!
//! Stored passwords are a single SHA-256 pass over the UTF-8 bytes, written
//! as 64 lowercase hex characters. There is no salt and no work factor, so
//! equal passwords produce equal digests. Existing databases depend on this
//! exact format.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::Role;

// =============================================================================
// Capabilities
// =============================================================================

/// Something a session may be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// List and search products and categories.
    ViewCatalog,
    /// Create, update and delete products and categories.
    EditCatalog,
    /// Record IN/OUT movements and read the movement history.
    RecordMovements,
    /// Register and delete users.
    ManageUsers,
    /// Read the user action log.
    ViewAuditLog,
}

impl Role {
    /// Whether this role grants `capability`.
    pub const fn can(&self, capability: Capability) -> bool {
        match self {
            Role::Admin => true,
            Role::Employee => matches!(
                capability,
                Capability::ViewCatalog | Capability::RecordMovements
            ),
        }
    }
}

// =============================================================================
// Password Digest
// =============================================================================

/// Hashes a password to lowercase hex SHA-256.
///
/// ## Example
/// ```rust
/// use stockroom_core::hash_password;
///
/// let hash = hash_password("admin123");
/// assert_eq!(hash.len(), 64);
/// assert_eq!(hash, hash_password("admin123"));
/// ```
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Compares a password with a stored digest.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    hash_password(password).eq_ignore_ascii_case(stored_hash.trim())
}
