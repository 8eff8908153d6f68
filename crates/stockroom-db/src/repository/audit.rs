//! # Audit Log
//!
//! Append-only record of who did what. Writing is best-effort: a failed
//! insert is reported through `tracing` and never reaches the caller, so a
//! broken log table cannot block a login.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::fmt;
use stockroom_core::UserLog;
use tracing::{debug, warn};

use super::logged;
use crate::error::DbResult;

/// Actions written to `user_logs.action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    LoginSuccess,
    Logout,
    Register,
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::LoginSuccess => "LOGIN SUCCESS",
            AuditAction::Logout => "LOGOUT",
            AuditAction::Register => "REGISTER",
            AuditAction::Delete => "DELETE",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Writer and reader for `user_logs`.
#[derive(Debug, Clone)]
pub struct AuditLog {
    pool: SqlitePool,
}

impl AuditLog {
    pub fn new(pool: SqlitePool) -> Self {
        AuditLog { pool }
    }

    /// Appends one row stamped with the current time. Never fails.
    pub async fn log(&self, username: &str, action: AuditAction) {
        let result = sqlx::query("INSERT INTO user_logs (username, action, timestamp) VALUES (?1, ?2, ?3)")
            .bind(username)
            .bind(action.as_str())
            .bind(Utc::now())
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => debug!(username = %username, action = %action, "Audit entry written"),
            Err(err) => warn!(
                username = %username,
                action = %action,
                error = %err,
                "Failed to write audit entry"
            ),
        }
    }

    /// The newest `limit` entries, newest first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<UserLog>> {
        let logs = sqlx::query_as::<_, UserLog>(
            r#"
            SELECT id, username, action, timestamp FROM user_logs
            ORDER BY timestamp DESC, id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(logged("user_logs.list_recent"))?;

        Ok(logs)
    }

    /// Every entry, newest first.
    pub async fn list_all(&self) -> DbResult<Vec<UserLog>> {
        let logs = sqlx::query_as::<_, UserLog>(
            "SELECT id, username, action, timestamp FROM user_logs ORDER BY timestamp DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(logged("user_logs.list_all"))?;

        Ok(logs)
    }
}
