//! # Stockroom Console
//!
//! Text front-end for the Stockroom inventory system.
//!
//! ## Module Organization
//!
//! - [`commands`] - One async function per operation, capability-checked
//! - [`menu`] - Numbered menus over stdin/stdout
//! - [`input`] - Parsing of ids, quantities, prices and timestamps
//! - [`state`] - Configuration and the current session
//! - [`error`] - [`ApiError`] shown to the operator

pub mod commands;
pub mod error;
pub mod input;
pub mod menu;
pub mod state;

use std::io;
use std::path::PathBuf;

use directories::ProjectDirs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stockroom_db::{Database, DbConfig};

pub use error::{ApiError, ErrorCode};
pub use menu::Console;
pub use state::{Args, ConfigState, SessionState};

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn,stockroom_db=info,stockroom_console=info,sqlx=warn";

/// Runs the console.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Console Startup                                   │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: warn, info for stockroom crates; RUST_LOG overrides      │
/// │                                                                         │
/// │  2. Resolve Configuration ────────────────────────────────────────────► │
/// │     • STOCKROOM_* environment, then command line flags                  │
/// │                                                                         │
/// │  3. Determine Database Path ──────────────────────────────────────────► │
/// │     • --db / STOCKROOM_DB_PATH, else the platform data directory        │
/// │     • Linux: ~/.local/share/stockroom/stockroom.db                      │
/// │                                                                         │
/// │  4. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode, pending migrations                          │
/// │     • Bootstrap admin (admin/admin123) if no admin exists               │
/// │                                                                         │
/// │  5. Menu loop on stdin/stdout until Exit or end of input               │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = ConfigState::from_env().with_args(args);
    let db_path = database_path(&config)?;
    info!(?db_path, policy = ?config.stock_policy, "Starting Stockroom console");

    let db = Database::new(DbConfig::new(db_path).stock_policy(config.stock_policy)).await?;
    if !db.health_check().await {
        return Err("database did not answer a health check".into());
    }
    let schema = db.migration_status().await?;
    info!(
        migrations = schema.recorded,
        pending = schema.pending(),
        "Database ready"
    );

    let stdin = io::stdin();
    let mut console = Console::new(db.clone(), config, stdin.lock(), io::stdout());
    console.run().await?;

    db.close().await;
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so they never interleave with menu output.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Determines the database file path, creating its directory if needed.
///
/// `--db` / `STOCKROOM_DB_PATH` win over the platform default.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.stockroom.stockroom/stockroom.db`
/// - **Windows**: `%APPDATA%\stockroom\stockroom\data\stockroom.db`
/// - **Linux**: `~/.local/share/stockroom/stockroom.db`
fn database_path(config: &ConfigState) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(path) = &config.database_path {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        return Ok(path.clone());
    }

    let proj_dirs = ProjectDirs::from("com", "stockroom", "stockroom")
        .ok_or("Could not determine app data directory")?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("stockroom.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let config = ConfigState {
            database_path: Some(PathBuf::from("explicit.db")),
            ..ConfigState::default()
        };
        assert_eq!(database_path(&config).unwrap(), PathBuf::from("explicit.db"));
    }

    #[test]
    fn test_explicit_path_gets_its_directory() {
        let root = std::env::temp_dir().join(format!("stockroom-db-path-{}", std::process::id()));
        let path = root.join("nested").join("shop.db");
        let config = ConfigState {
            database_path: Some(path.clone()),
            ..ConfigState::default()
        };

        assert_eq!(database_path(&config).unwrap(), path);
        assert!(root.join("nested").is_dir());

        std::fs::remove_dir_all(&root).unwrap();
    }
}
