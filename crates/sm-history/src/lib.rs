//! sm-history - Applied-migration ledger for Stratum
//!
//! Persists which migration units have been applied to which target, one
//! `sm_meta.schema_migrations` table per physical database, and detects
//! ledger drift (a recorded unit whose ordering predecessors are missing).

pub mod error;
pub mod ledger;

pub use error::{HistoryError, HistoryResult};
pub use ledger::{missing_predecessors, Ledger};
