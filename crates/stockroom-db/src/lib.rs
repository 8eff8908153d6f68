//! # stockroom-db
//!
//! Persistence for Stockroom: categories, products, users, the stock
//! ledger and the user action log, all in one SQLite file driven by sqlx.
//! Every stock change goes through [`StockLedger`], which writes the
//! movement row and the product balance in a single transaction.
//!
//! ## Where It Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Data Flow                              │
//! │                                                                         │
//! │  Console command (record OUT 3 of Hammer)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stockroom-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ Categories    │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ Products      │    │ 001_initial  │  │   │
//! │  │   │ Bootstrap     │    │ Users, Audit  │    │ _schema.sql  │  │   │
//! │  │   │ admin         │    │ StockLedger   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   AccessControl (access.rs): login, register, delete user      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <data dir>/stockroom/stockroom.db                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`]: [`DbConfig`] and the [`Database`] handle
//! - [`migrations`]: schema files compiled into the binary
//! - [`error`]: [`DbError`] and its mapping onto domain errors
//! - [`repository`]: one repository per table, plus the ledger
//! - [`access`]: login, registration, user deletion
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_db::{Database, DbConfig};
//! use stockroom_core::{ChangeType, Money, NewProduct};
//!
//! let db = Database::new(DbConfig::new("stockroom.db")).await?;
//!
//! let tools = db.categories().create("Tools").await?;
//! let hammer = db
//!     .products()
//!     .create(NewProduct::new("Hammer", tools.id, 10, Money::from_cents(999)))
//!     .await?;
//!
//! db.ledger().record_movement(hammer.id, ChangeType::Out, 3).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod access;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use access::{AccessControl, Session};
pub use error::{DbError, DbResult, ErrorKind};
pub use migrations::MigrationStatus;
pub use pool::{BootstrapAdmin, Database, DbConfig, DbLocation, PoolSettings};

// Repository re-exports for convenience
pub use repository::audit::{AuditAction, AuditLog};
pub use repository::category::CategoryRepository;
pub use repository::product::ProductRepository;
pub use repository::stock::StockLedger;
pub use repository::user::UserRepository;
