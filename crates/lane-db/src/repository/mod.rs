//! # Repository Module
//!
//! One repository per aggregate, each a thin handle over the shared pool:
//!
//! - [`catalog::CatalogRepository`] - keyed product lookup, bulk upsert
//! - [`sale::SaleRepository`] - atomic sale commit, cancellation toggle,
//!   history reads
//! - [`handoff::HandoffRepository`] - one-shot cart reproduction snapshot
//! - [`terminal::TerminalRepository`] - write-once terminal identity
//!
//! SQL lives here and nowhere else. Repositories return domain types from
//! lane-core and map every sqlx failure into [`crate::DbError`].

pub mod catalog;
pub mod handoff;
pub mod sale;
pub mod terminal;
