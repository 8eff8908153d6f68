//! # Storage Errors
//!
//! [`DbError`] is what every repository returns. It folds two sources
//! together: failures reported by SQLite through sqlx, and domain rules
//! ([`CoreError`]) checked before or inside a transaction.
//!
//! ```text
//!   sqlx::Error ───────┐
//!   MigrateError ──────┼──► DbError ──kind()──► ErrorKind
//!   CoreError ─────────┘       │
//!   ValidationError ──► CoreError
//!                              ▼
//!                   console ApiError { code, message }
//! ```

use serde::Serialize;
use stockroom_core::{CoreError, ValidationError};
use thiserror::Error;

/// Everything that can go wrong below the console.
#[derive(Debug, Error)]
pub enum DbError {
    /// No row with that key. Raised by lookups and updates alike.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A `UNIQUE` column already holds this value.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// A referenced row is gone, e.g. a category deleted mid-call.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// The file could not be opened or created, or the pool is closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// An embedded migration did not apply.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected a statement for a reason not mapped above.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A ledger statement, begin or commit failed; nothing was committed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Timed out waiting for a free connection.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Anything else sqlx reports.
    #[error("Internal database error: {0}")]
    Internal(String),

    /// A business rule was violated.
    #[error(transparent)]
    Domain(#[from] CoreError),
}

/// Coarse classification for callers that only care about the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A referenced entity does not exist.
    NotFound,
    /// Input was rejected before reaching the database.
    InvalidInput,
    /// A uniqueness, reference or business constraint blocked the write.
    ConstraintViolation,
    /// The transaction could not be completed and was rolled back.
    TransactionFailure,
    /// The database could not be reached or misbehaved.
    PersistenceUnavailable,
}

impl DbError {
    /// Classifies this error.
    ///
    /// ```text
    /// NotFound, ProductNotFound, UserNotFound, ...       → NotFound
    /// Validation, EmptyField, InvalidCredentials, ...    → InvalidInput
    /// InvalidQuantity, InvalidCategory, UniqueViolation,
    /// CategoryInUse, InsufficientStock, LastAdmin, ...   → ConstraintViolation
    /// TransactionFailed (statement failed, rolled back)  → TransactionFailure
    /// ConnectionFailed, PoolExhausted, QueryFailed       → PersistenceUnavailable
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            DbError::NotFound { .. } => ErrorKind::NotFound,
            DbError::UniqueViolation { .. } | DbError::ForeignKeyViolation { .. } => {
                ErrorKind::ConstraintViolation
            }
            DbError::TransactionFailed(_) => ErrorKind::TransactionFailure,
            DbError::ConnectionFailed(_)
            | DbError::MigrationFailed(_)
            | DbError::QueryFailed(_)
            | DbError::PoolExhausted
            | DbError::Internal(_) => ErrorKind::PersistenceUnavailable,
            DbError::Domain(core) => match core {
                CoreError::ProductNotFound(_)
                | CoreError::CategoryNotFound(_)
                | CoreError::NoMovementFound(_)
                | CoreError::UserNotFound(_) => ErrorKind::NotFound,
                CoreError::EmptyField { .. }
                | CoreError::InvalidCredentials
                | CoreError::NothingToUpdate
                | CoreError::Validation(_) => ErrorKind::InvalidInput,
                CoreError::InvalidQuantity(_)
                | CoreError::InvalidCategory(_)
                | CoreError::CategoryInUse { .. }
                | CoreError::InsufficientStock { .. }
                | CoreError::UsernameTaken(_)
                | CoreError::SelfDeletion
                | CoreError::LastAdmin => ErrorKind::ConstraintViolation,
            },
        }
    }
}

impl From<ValidationError> for DbError {
    fn from(err: ValidationError) -> Self {
        DbError::Domain(CoreError::Validation(err))
    }
}

/// SQLite reports constraint failures only as message text, so the
/// `Database` arm matches on the message prefix.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // "UNIQUE constraint failed: <table>.<column>"
                // "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::Io(io) => DbError::ConnectionFailed(io.to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_separates_missing_from_unavailable() {
        let missing = DbError::NotFound {
            entity: "Record".into(),
            id: "unknown".into(),
        };
        assert_eq!(missing.kind(), ErrorKind::NotFound);
        assert_eq!(
            DbError::from(CoreError::ProductNotFound("9".into())).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            DbError::PoolExhausted.kind(),
            ErrorKind::PersistenceUnavailable
        );
        assert_eq!(
            DbError::TransactionFailed("commit".into()).kind(),
            ErrorKind::TransactionFailure
        );
    }

    #[test]
    fn test_kind_of_domain_errors() {
        assert_eq!(
            DbError::from(CoreError::InvalidQuantity(0)).kind(),
            ErrorKind::ConstraintViolation
        );
        assert_eq!(
            DbError::from(CoreError::InvalidCategory(42)).kind(),
            ErrorKind::ConstraintViolation
        );
        assert_eq!(
            DbError::from(CoreError::LastAdmin).kind(),
            ErrorKind::ConstraintViolation
        );
        assert_eq!(
            DbError::from(ValidationError::Required {
                field: "name".into()
            })
            .kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_domain_message_is_transparent() {
        let err = DbError::from(CoreError::SelfDeletion);
        assert_eq!(err.to_string(), "You cannot delete your own account");
        assert!(matches!(err, DbError::Domain(CoreError::SelfDeletion)));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
