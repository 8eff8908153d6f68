//! # Schema Migrations
//!
//! The SQL files under `crates/stockroom-db/migrations/` are compiled into
//! the binary, so a fresh database file is usable without any setup step.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Database::new                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  status()   embedded: 1   recorded in _sqlx_migrations: 0              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  apply()    001_initial_schema.sql                                     │
//! │             users · categories · products · stock_movements ·          │
//! │             user_logs                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  status()   embedded: 1   recorded: 1   → current                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! New schema changes go in a new `NNN_description.sql` file. Files that
//! have shipped are never edited; sqlx checksums them.

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// How far a database is behind the embedded migrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    pub embedded: usize,
    pub recorded: usize,
}

impl MigrationStatus {
    pub fn pending(&self) -> usize {
        self.embedded.saturating_sub(self.recorded)
    }

    pub fn is_current(&self) -> bool {
        self.pending() == 0
    }
}

/// Applies every pending migration. Running it on a current database is a no-op.
pub async fn apply(pool: &SqlitePool) -> DbResult<MigrationStatus> {
    let before = status(pool).await?;
    if before.is_current() {
        debug!(recorded = before.recorded, "Schema is current");
        return Ok(before);
    }

    MIGRATOR.run(pool).await?;

    let after = status(pool).await?;
    info!(
        applied = after.recorded - before.recorded.min(after.recorded),
        recorded = after.recorded,
        "Schema migrated"
    );
    Ok(after)
}

/// Compares the embedded migrations with the ones recorded in the database.
///
/// A database that was never migrated has no `_sqlx_migrations` table and
/// reports zero recorded migrations.
pub async fn status(pool: &SqlitePool) -> DbResult<MigrationStatus> {
    let has_table: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations')",
    )
    .fetch_one(pool)
    .await?;

    let recorded: i64 = if has_table {
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await?
    } else {
        0
    };

    Ok(MigrationStatus {
        embedded: MIGRATOR.migrations.len(),
        recorded: usize::try_from(recorded).unwrap_or(0),
    })
}
