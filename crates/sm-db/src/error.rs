//! Error types for sm-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001), the one retryable class
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Statement execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Constraint or object name conflict (D003)
    #[error("[D003] Constraint name conflict: {0}")]
    ConstraintConflict(String),

    /// Transaction control failure (D004)
    #[error("[D004] Transaction {verb} failed: {message}")]
    TransactionError { verb: String, message: String },

    /// Internal error (D005)
    #[error("[D005] Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Whether a bounded-backoff retry is worthwhile.
    ///
    /// Only connectivity failures qualify; semantic failures (syntax errors,
    /// constraint violations) never do.
    pub fn is_transient(&self) -> bool {
        matches!(self, DbError::ConnectionError(_))
    }
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // duckdb::Error does not expose structured variants; classify by
        // message with patterns narrow enough to not catch unrelated text.
        let msg = err.to_string();
        if msg.contains("already exists")
            && (msg.contains("Constraint") || msg.contains("Index") || msg.contains("constraint"))
        {
            DbError::ConstraintConflict(msg)
        } else if msg.contains("IO Error")
            || msg.contains("database is locked")
            || msg.contains("Connection")
        {
            DbError::ConnectionError(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}
