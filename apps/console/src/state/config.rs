//! # Configuration State
//!
//! Stores console configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command line flags (`--db`, `--reject-insufficient-stock`, `--json`)
//! 2. Environment variables (`STOCKROOM_*`)
//! 3. Defaults (this file)
//!
//! Configuration is read-only once the menu loop starts.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use stockroom_core::StockPolicy;

/// Number of audit rows shown by "View User Logs" unless overridden.
pub const DEFAULT_LOG_LIMIT: u32 = 50;

/// Command line flags.
#[derive(Debug, Default, Parser)]
#[command(name = "stockroom", version, about = "Stockroom inventory console")]
pub struct Args {
    /// SQLite database file (defaults to the platform data directory).
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Refuse OUT movements larger than the stock on hand.
    #[arg(long)]
    pub reject_insufficient_stock: bool,

    /// Print listings as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Console configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Database file. `None` means the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Whether OUT movements may drive a balance negative.
    pub stock_policy: StockPolicy,

    /// Listings as JSON instead of text lines
    pub json_output: bool,

    /// Rows shown by the audit log screen
    pub log_limit: u32,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            database_path: None,
            stock_policy: StockPolicy::AllowNegative,
            json_output: false,
            log_limit: DEFAULT_LOG_LIMIT,
        }
    }
}

impl ConfigState {
    /// Creates a ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `STOCKROOM_DB_PATH`: database file
    /// - `STOCKROOM_REJECT_INSUFFICIENT_STOCK`: `1`/`true`/`yes` to refuse overdrawing OUTs
    /// - `STOCKROOM_JSON`: `1`/`true`/`yes` for JSON listings
    /// - `STOCKROOM_LOG_LIMIT`: audit rows to show
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(path) = lookup("STOCKROOM_DB_PATH").filter(|p| !p.trim().is_empty()) {
            config.database_path = Some(PathBuf::from(path));
        }

        if lookup("STOCKROOM_REJECT_INSUFFICIENT_STOCK").is_some_and(|v| is_truthy(&v)) {
            config.stock_policy = StockPolicy::RejectInsufficient;
        }

        if lookup("STOCKROOM_JSON").is_some_and(|v| is_truthy(&v)) {
            config.json_output = true;
        }

        if let Some(limit) = lookup("STOCKROOM_LOG_LIMIT") {
            match limit.trim().parse::<u32>() {
                Ok(limit) if limit > 0 => config.log_limit = limit,
                _ => tracing::warn!(value = %limit, "Ignoring invalid STOCKROOM_LOG_LIMIT"),
            }
        }

        config
    }

    /// Applies command line flags on top of this configuration.
    pub fn with_args(mut self, args: Args) -> Self {
        if let Some(db) = args.db {
            self.database_path = Some(db);
        }
        if args.reject_insufficient_stock {
            self.stock_policy = StockPolicy::RejectInsufficient;
        }
        if args.json {
            self.json_output = true;
        }
        self
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConfigState::from_lookup(lookup(&[]));
        assert_eq!(config, ConfigState::default());
        assert_eq!(config.stock_policy, StockPolicy::AllowNegative);
    }

    #[test]
    fn test_environment() {
        let config = ConfigState::from_lookup(lookup(&[
            ("STOCKROOM_DB_PATH", "/tmp/shop.db"),
            ("STOCKROOM_REJECT_INSUFFICIENT_STOCK", "TRUE"),
            ("STOCKROOM_JSON", "0"),
            ("STOCKROOM_LOG_LIMIT", "10"),
        ]));
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/shop.db")));
        assert_eq!(config.stock_policy, StockPolicy::RejectInsufficient);
        assert!(!config.json_output);
        assert_eq!(config.log_limit, 10);
    }

    #[test]
    fn test_invalid_log_limit_keeps_default() {
        let config = ConfigState::from_lookup(lookup(&[("STOCKROOM_LOG_LIMIT", "lots")]));
        assert_eq!(config.log_limit, DEFAULT_LOG_LIMIT);
    }

    #[test]
    fn test_flags_override_environment() {
        let config = ConfigState::from_lookup(lookup(&[("STOCKROOM_DB_PATH", "/tmp/env.db")]))
            .with_args(Args::parse_from([
                "stockroom",
                "--db",
                "/tmp/flag.db",
                "--reject-insufficient-stock",
                "--json",
            ]));
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/flag.db")));
        assert_eq!(config.stock_policy, StockPolicy::RejectInsufficient);
        assert!(config.json_output);
    }
}
