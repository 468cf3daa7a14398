//! # lane-core: Pure Business Logic for Lane POS
//!
//! The heart of the engine: every rule that makes a cart add up, a sale
//! balance, and an export line quote correctly lives here as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  lane-session (orchestration)                   │
//! │     scan pipeline ──► cart session ──► checkout ──► history     │
//! └───────────────┬─────────────────────────────────┬───────────────┘
//! │               │                                 │
//! │  ┌────────────▼────────────┐       ┌────────────▼────────────┐
//! │  │ ★ lane-core (THIS) ★    │       │        lane-db          │
//! │  │ money · cart · csv      │       │  SQLite repositories    │
//! │  │ NO I/O · NO DATABASE    │       │  migrations · pool      │
//! │  └─────────────────────────┘       └─────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, LineItem)
//! - [`money`] - Integer money arithmetic (no floating point!)
//! - [`cart`] - The cart accumulator state machine
//! - [`import`] - Catalog CSV row parsing (skip-not-fail)
//! - [`export`] - Sales history export building
//! - [`error`] - Domain error types

pub mod cart;
pub mod error;
pub mod export;
pub mod import;
pub mod money;
pub mod types;

// Re-exports so users can do `use lane_core::Money` instead of
// `use lane_core::money::Money`.
pub use cart::{Cart, CartEntry};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
