//! Error types for sm-history

use thiserror::Error;

/// Ledger operation errors
#[derive(Error, Debug)]
pub enum HistoryError {
    /// H001: Database-level failure while touching the ledger
    #[error("[H001] Ledger database error: {0}")]
    Db(#[from] sm_db::DbError),

    /// H002: The ledger holds a value that is not a valid ordering key
    #[error("[H002] Corrupt ledger entry '{value}' for target '{target}': {reason}")]
    CorruptEntry {
        target: String,
        value: String,
        reason: String,
    },
}

/// Result type alias for HistoryError
pub type HistoryResult<T> = Result<T, HistoryError>;
