//! # lane-db: Database Layer for Lane POS
//!
//! SQLite storage for the transaction engine, accessed through sqlx.
//!
//! ## Data Flow
//! ```text
//! lane-session (checkout, history, handoff)
//!      │
//!      ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                  lane-db (THIS CRATE)                    │
//! │                                                          │
//! │  Database (pool.rs)          Repositories                │
//! │  SqlitePool, WAL mode,       catalog  - product lookup   │
//! │  foreign keys ON             sale     - atomic commit,   │
//! │                                         cancel toggle    │
//! │  Migrations (embedded)       handoff  - one-shot snapshot│
//! │  001_initial_schema.sql      terminal - identity         │
//! └──────────────────────────────────────────────────────────┘
//!      │
//!      ▼
//! SQLite database file (or :memory: in tests)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lane_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/lane.db")).await?;
//! let product = db.catalog().find_by_barcode("4901234567894").await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::handoff::HandoffRepository;
pub use repository::sale::SaleRepository;
pub use repository::terminal::TerminalRepository;
