//! # Console Errors
//!
//! Every command returns `Result<T, ApiError>`. The menu prints the error
//! as `Error: <message>`, or with `--json` as
//! `{"code":"NOT_FOUND","message":"..."}`.
//!
//! ```text
//!   authorize()  ──► ApiError::forbidden(capability)
//!   CoreError    ──► code picked per rule, message kept verbatim
//!   DbError      ──► Domain unwrapped to CoreError
//!                    storage failures logged; the message follows
//!                    DbError::kind(), so the operator sees a short line
//! ```

use serde::Serialize;
use stockroom_core::{Capability, CoreError};
use stockroom_db::{DbError, ErrorKind};
use thiserror::Error;

/// What a console command reports when it fails.
#[derive(Debug, Clone, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct ApiError {
    pub code: ErrorCode,

    /// One line, shown to the operator as is.
    pub message: String,
}

/// Stable codes for `--json` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Entity not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Wrong username or password
    InvalidCredentials,

    /// Session lacks the capability
    Forbidden,

    /// Business rule refused the operation
    BusinessLogic,

    /// OUT movement larger than the balance
    InsufficientStock,

    /// Database operation failed
    DatabaseError,

    /// Internal error
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// `"<Entity> not found: <id>"`
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Names what the role is missing, e.g. "manage users".
    pub fn forbidden(capability: Capability) -> Self {
        ApiError::new(
            ErrorCode::Forbidden,
            format!("Access denied: your role cannot {}", describe(capability)),
        )
    }
}

fn describe(capability: Capability) -> &'static str {
    match capability {
        Capability::ViewCatalog => "view the catalog",
        Capability::EditCatalog => "edit products or categories",
        Capability::RecordMovements => "work with stock movements",
        Capability::ManageUsers => "manage users",
        Capability::ViewAuditLog => "view user logs",
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        let kind = err.kind();
        match err {
            DbError::Domain(core) => ApiError::from(core),
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => {
                ApiError::validation(format!("{field} '{value}' already exists"))
            }
            other => storage_failure(kind, &other),
        }
    }
}

/// Logs the sqlx detail and keeps it out of the operator's message.
fn storage_failure(kind: ErrorKind, err: &DbError) -> ApiError {
    let (code, message) = match kind {
        ErrorKind::ConstraintViolation => {
            (ErrorCode::ValidationError, "Referenced record no longer exists")
        }
        ErrorKind::TransactionFailure => {
            (ErrorCode::DatabaseError, "Change was not saved; nothing was written")
        }
        ErrorKind::PersistenceUnavailable => (ErrorCode::DatabaseError, "Database is unavailable"),
        ErrorKind::NotFound | ErrorKind::InvalidInput => {
            (ErrorCode::Internal, "Database operation failed")
        }
    };
    tracing::error!(kind = ?kind, error = %err, "{message}");
    ApiError::new(code, message)
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        let code = match err {
            CoreError::ProductNotFound(_)
            | CoreError::CategoryNotFound(_)
            | CoreError::NoMovementFound(_)
            | CoreError::UserNotFound(_) => ErrorCode::NotFound,
            CoreError::InvalidQuantity(_)
            | CoreError::InvalidCategory(_)
            | CoreError::EmptyField { .. }
            | CoreError::NothingToUpdate
            | CoreError::Validation(_) => ErrorCode::ValidationError,
            CoreError::InvalidCredentials => ErrorCode::InvalidCredentials,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::CategoryInUse { .. }
            | CoreError::UsernameTaken(_)
            | CoreError::SelfDeletion
            | CoreError::LastAdmin => ErrorCode::BusinessLogic,
        };
        ApiError::new(code, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_keep_their_message() {
        let err = ApiError::from(DbError::from(CoreError::LastAdmin));
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert_eq!(err.to_string(), "Cannot delete the last remaining admin account");
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = ApiError::from(DbError::QueryFailed("no such table: products".into()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("products"));
    }

    #[test]
    fn test_rolled_back_write_is_reported_as_unsaved() {
        let err = ApiError::from(DbError::TransactionFailed("movement log unavailable".into()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Change was not saved; nothing was written");

        let err = ApiError::from(DbError::ForeignKeyViolation {
            message: "FOREIGN KEY constraint failed".into(),
        });
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::from(CoreError::ProductNotFound("4".into()));
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"code":"NOT_FOUND","message":"Product not found: 4"}"#);
    }

    #[test]
    fn test_forbidden_names_the_capability() {
        let err = ApiError::forbidden(Capability::ManageUsers);
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert!(err.message.contains("manage users"));
    }
}
