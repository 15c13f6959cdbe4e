//! Error types for sm-runner

use sm_db::DbError;
use thiserror::Error;

/// Migration run errors
#[derive(Error, Debug)]
pub enum RunnerError {
    /// R001: Referenced unit is not in the registry
    #[error("[R001] Unknown migration unit '{key}'")]
    UnknownUnit { key: String },

    /// R002: Rollback would touch a unit with no backward operations
    #[error("[R002] Unit '{unit}' is irreversible; pass force to revert past it and accept data loss")]
    IrreversibleUnit { unit: String },

    /// R003: Ledger gap detected; forward migration refused until reconcile
    #[error("[R003] Target '{target}' history is drifted: {missing} unit(s) below the high-water mark are unapplied; run reconcile")]
    DriftedHistory { target: String, missing: usize },

    /// R004: A statement failed; the unit's transaction was rolled back
    #[error("[R004] Unit '{unit}' failed at operation {op_index} ({operation}): {source}")]
    StatementFailure {
        unit: String,
        op_index: usize,
        operation: String,
        #[source]
        source: DbError,
    },

    /// Core-level failure (validation, registry, resolver)
    #[error(transparent)]
    Core(#[from] sm_core::CoreError),

    /// Database-level failure outside unit statements (transactions, bootstrap)
    #[error(transparent)]
    Db(#[from] DbError),

    /// Ledger failure
    #[error(transparent)]
    History(#[from] sm_history::HistoryError),
}

/// Result type alias for RunnerError
pub type RunnerResult<T> = Result<T, RunnerError>;
