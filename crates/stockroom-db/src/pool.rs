//! # Opening a Stockroom Database
//!
//! [`DbConfig`] says where the data lives and how the ledger behaves;
//! [`Database::new`] turns it into a ready-to-use handle.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Opening a Database                                 │
//! │                                                                         │
//! │  DbConfig                                                               │
//! │   ├── location         File(path) ─► WAL, NORMAL sync, create file      │
//! │   │                    Memory     ─► one connection that never expires  │
//! │   ├── pool             min / max connections, acquire + idle timeout    │
//! │   ├── stock_policy     AllowNegative | RejectInsufficient               │
//! │   └── bootstrap_admin  admin / admin123 unless disabled                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new                                                          │
//! │   1. connect (foreign_keys = ON on every connection)                    │
//! │   2. migrations::apply (no-op when current)                             │
//! │   3. AccessControl::ensure_default_admin                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database { pool, stock_policy }                                        │
//! │   categories() · products() · users() · ledger() · audit() · access()  │
//! │   every accessor wraps a clone of the same pool                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use stockroom_core::{StockPolicy, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};
use tracing::{debug, info};

use crate::access::AccessControl;
use crate::error::{DbError, DbResult};
use crate::migrations::{self, MigrationStatus};
use crate::repository::audit::AuditLog;
use crate::repository::category::CategoryRepository;
use crate::repository::product::ProductRepository;
use crate::repository::stock::StockLedger;
use crate::repository::user::UserRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Where the data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    /// A SQLite file, created on first open.
    File(PathBuf),
    /// A private in-memory database that disappears with the pool.
    Memory,
}

impl DbLocation {
    fn describe(&self) -> String {
        match self {
            DbLocation::File(path) => path.display().to_string(),
            DbLocation::Memory => "(in memory)".to_string(),
        }
    }
}

/// Connection pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub min_connections: u32,
    pub max_connections: u32,
    /// How long a caller waits for a free connection.
    pub acquire_timeout: Duration,
    /// `None` keeps idle connections open forever.
    pub idle_timeout: Option<Duration>,
}

impl Default for PoolSettings {
    fn default() -> Self {
        PoolSettings {
            min_connections: 1,
            max_connections: 4,
            acquire_timeout: Duration::from_secs(15),
            idle_timeout: Some(Duration::from_secs(300)),
        }
    }
}

/// Credentials of the administrator created on a database with no ADMIN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

/// Everything [`Database::new`] needs.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/stockroom/stockroom.db")
///     .stock_policy(StockPolicy::RejectInsufficient);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: DbLocation,
    pub pool: PoolSettings,
    /// Policy for ledgers handed out by [`Database::ledger`].
    pub stock_policy: StockPolicy,
    /// Default: `admin` / `admin123`; `None` for in-memory databases.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl DbConfig {
    /// A file-backed database with the default admin.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: DbLocation::File(path.into()),
            pool: PoolSettings::default(),
            stock_policy: StockPolicy::default(),
            bootstrap_admin: Some(BootstrapAdmin {
                username: DEFAULT_ADMIN_USERNAME.to_string(),
                password: DEFAULT_ADMIN_PASSWORD.to_string(),
            }),
        }
    }

    /// A throwaway database for tests: no file, no bootstrap admin.
    ///
    /// Each SQLite memory connection is a separate database, so the pool is
    /// pinned to one connection that is never recycled.
    pub fn in_memory() -> Self {
        DbConfig {
            location: DbLocation::Memory,
            pool: PoolSettings {
                min_connections: 1,
                max_connections: 1,
                acquire_timeout: Duration::from_secs(5),
                idle_timeout: None,
            },
            stock_policy: StockPolicy::default(),
            bootstrap_admin: None,
        }
    }

    pub fn stock_policy(mut self, policy: StockPolicy) -> Self {
        self.stock_policy = policy;
        self
    }

    pub fn bootstrap_admin(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.bootstrap_admin = Some(BootstrapAdmin {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = match &self.location {
            DbLocation::Memory => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?,
            DbLocation::File(path) => file_options(path),
        };
        // Off by default in SQLite
        Ok(options.foreign_keys(true))
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new()
            .min_connections(self.pool.min_connections)
            .max_connections(self.pool.max_connections)
            .acquire_timeout(self.pool.acquire_timeout)
            .idle_timeout(self.pool.idle_timeout);

        match self.location {
            DbLocation::Memory => options.max_lifetime(None::<Duration>),
            DbLocation::File(_) => options,
        }
    }
}

fn file_options(path: &Path) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
}

// =============================================================================
// Database
// =============================================================================

/// Handle to an open Stockroom database.
///
/// Cheap to clone; clones share the pool.
///
/// ## Example
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./stockroom.db")).await?;
///
/// let tools = db.categories().create("Tools").await?;
/// let hammer = db.products().create(NewProduct::new("Hammer", tools.id, 10, price)).await?;
/// db.ledger().record_movement(hammer.id, ChangeType::Out, 3).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    stock_policy: StockPolicy,
}

impl Database {
    /// Connects, migrates and bootstraps the admin account.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let location = config.location.describe();
        info!(location = %location, "Opening database");

        let pool = config
            .pool_options()
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
        debug!(
            max_connections = config.pool.max_connections,
            stock_policy = ?config.stock_policy,
            "Pool ready"
        );

        let db = Database {
            pool,
            stock_policy: config.stock_policy,
        };

        migrations::apply(&db.pool).await?;

        if let Some(admin) = &config.bootstrap_admin {
            let created = db
                .access()
                .ensure_default_admin(&admin.username, &admin.password)
                .await?;
            if created {
                info!(username = %admin.username, "Created bootstrap admin; change its password");
            }
        }

        info!(location = %location, "Database open");
        Ok(db)
    }

    /// Embedded versus recorded migrations.
    pub async fn migration_status(&self) -> DbResult<MigrationStatus> {
        migrations::status(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// The policy used by [`Database::ledger`].
    pub fn stock_policy(&self) -> StockPolicy {
        self.stock_policy
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    /// The stock ledger, using the configured policy.
    pub fn ledger(&self) -> StockLedger {
        self.ledger_with_policy(self.stock_policy)
    }

    pub fn ledger_with_policy(&self, policy: StockPolicy) -> StockLedger {
        StockLedger::new(self.pool.clone()).with_policy(policy)
    }

    pub fn audit(&self) -> AuditLog {
        AuditLog::new(self.pool.clone())
    }

    /// Login, registration and user deletion.
    pub fn access(&self) -> AccessControl {
        AccessControl::new(self.users(), self.audit())
    }

    /// Waits for checked-out connections and closes the pool.
    pub async fn close(&self) {
        debug!("Closing database pool");
        self.pool.close().await;
    }

    /// `true` when a trivial query succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}
