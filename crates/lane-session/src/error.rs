//! # Session Error Types
//!
//! What callers of the engine see: domain failures from lane-core passed
//! through untouched, storage failures wrapped with a label. Neither kind is
//! retried here.

use thiserror::Error;

use lane_core::CoreError;
use lane_db::DbError;

/// Errors surfaced by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Business rule violation (unknown barcode, short tender, empty cart).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A durable read or write failed. Never swallowed, never retried.
    #[error("Storage failure: {0}")]
    Storage(#[from] DbError),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_pass_through() {
        let err: SessionError = CoreError::EmptyCartCommit.into();
        assert_eq!(err.to_string(), "Cannot commit an empty cart");
    }

    #[test]
    fn test_storage_errors_are_labelled() {
        let err: SessionError = DbError::PoolExhausted.into();
        assert_eq!(err.to_string(), "Storage failure: Connection pool exhausted");
    }
}
