//! sm-runner - Migration runner for Stratum
//!
//! Discovers pending migration units, orders them, and applies or reverts
//! them transactionally per target, with per-target advisory locking,
//! statement-level retry for transient failures, drift detection, and
//! between-units cancellation.

pub mod cancel;
pub mod error;
pub mod lock;
pub mod retry;
pub mod runner;

pub use cancel::CancelToken;
pub use error::{RunnerError, RunnerResult};
pub use lock::TargetLocks;
pub use retry::RetryPolicy;
pub use runner::{ApplyOptions, ApplyReport, RevertOptions, RevertReport, Runner, TargetStatus};
