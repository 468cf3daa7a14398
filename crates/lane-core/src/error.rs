//! # Error Types
//!
//! Domain errors for lane-core.
//!
//! ## Error Hierarchy
//! ```text
//! lane-core (this file)
//! ├── CoreError        - business rule violations
//! └── ValidationError  - per-field input validation
//!
//! lane-db
//! └── DbError          - storage failures
//!
//! lane-session
//! └── SessionError     - Core + Db, what callers of the engine see
//! ```
//!
//! Errors are enum variants with context, never bare strings, and nothing in
//! this taxonomy is retried automatically - retry policy belongs to the
//! caller.

use thiserror::Error;

use crate::money::Money;

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A scanned barcode has no catalog entry. The cart is left unchanged;
    /// this is feedback for the operator, not a fault in the engine.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Commit attempted with less money than the cart total. The UI is
    /// expected to prevent this; the engine still refuses.
    #[error("Insufficient tender: tendered {tendered}, total {total}")]
    InsufficientTender { tendered: Money, total: Money },

    /// Commit attempted on an empty cart.
    #[error("Cannot commit an empty cart")]
    EmptyCartCommit,

    /// A catalog import row that could not be parsed. Recovered locally by
    /// skipping the row; surfaced only as a per-row diagnostic.
    #[error("Malformed import row {line}: {reason}")]
    MalformedImportRow { line: u64, reason: String },

    /// Building delimited-text output failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Input validation errors.
///
/// Used for early checks before business logic runs - currently on imported
/// catalog rows.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A numeric field that must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// A field that failed to parse as a number.
    #[error("{field} is not a valid number: '{value}'")]
    InvalidNumber { field: String, value: String },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
