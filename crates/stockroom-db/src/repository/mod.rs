//! # Repository Module
//!
//! Database repository implementations for Stockroom.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Console command                                                        │
//! │       │                                                                 │
//! │       │  db.products().search("ham")                                   │
//! │       ▼                                                                 │
//! │  ProductRepository                                                      │
//! │  ├── create(&self, new_product)                                        │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── update(&self, id, changes)                                        │
//! │  └── delete_by_id(&self, id)                                           │
//! │       │                                                                 │
//! │       │  Parameterized SQL                                              │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CategoryRepository`](category::CategoryRepository) - Category CRUD
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD and search
//! - [`UserRepository`](user::UserRepository) - User rows (hashes stay inside)
//! - [`StockLedger`](stock::StockLedger) - Atomic movement recording and history
//! - [`AuditLog`](audit::AuditLog) - Best-effort user action log

pub mod audit;
pub mod category;
pub mod product;
pub mod stock;
pub mod user;

use tracing::warn;

use crate::error::DbError;

/// Escapes `%`, `_` and `\` so user text matches literally inside
/// `LIKE ... ESCAPE '\'`.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Logs a failed statement at the repository boundary and converts it.
pub(crate) fn logged(operation: &'static str) -> impl Fn(sqlx::Error) -> DbError {
    move |err| {
        warn!(operation, error = %err, "Database statement failed");
        DbError::from(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("ham"), "%ham%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }
}
