//! # Console Commands Module
//!
//! Every operation the menus can trigger.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── auth.rs      ◄─── Login, logout, register
//! ├── category.rs  ◄─── Category CRUD and search
//! ├── product.rs   ◄─── Product CRUD and search
//! ├── stock.rs     ◄─── Movements and history queries
//! └── user.rs      ◄─── User list, deletion, audit log
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Menu reads "3" / "Hammer" / "OUT" / "3"                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  input.rs parses text into typed values                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  async fn record_movement(                                              │
//! │      db: &Database,          ◄── pool + stock policy                   │
//! │      session: &Session,      ◄── capability check happens first       │
//! │      product_id: i64,                                                   │
//! │      change_type: ChangeType,                                           │
//! │      quantity: i64,                                                     │
//! │  ) -> Result<StockMovement, ApiError>                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Menu prints the result, or "Error: <message>"                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands never read from the terminal, so tests call them directly.

pub mod auth;
pub mod category;
pub mod product;
pub mod stock;
pub mod user;
