//! # State Module
//!
//! State the menu loop carries between screens.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │   Database   │  │   ConfigState    │  │   SessionState   │          │
//! │  │              │  │                  │  │                  │          │
//! │  │  SQLite pool │  │  database_path   │  │  Option<Session> │          │
//! │  │  + policy    │  │  stock_policy    │  │  require(cap)    │          │
//! │  │              │  │  json_output     │  │                  │          │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘          │
//! │                                                                         │
//! │  Database: internal connection pool                                    │
//! │  ConfigState: read-only after startup                                  │
//! │  SessionState: owned by the menu loop, one operator at a time          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod session;

pub use config::{Args, ConfigState, DEFAULT_LOG_LIMIT};
pub use session::{authorize, SessionState};
