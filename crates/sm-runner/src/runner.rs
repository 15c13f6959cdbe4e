//! The migration runner.
//!
//! Walks `Idle -> Discovering -> Ordering -> Applying -> Committed/RolledBack
//! -> Idle` per target, with a mirrored reverting path. Every unit is
//! all-or-nothing: its operations and its ledger record commit together or
//! not at all, so a halted run always leaves the target at the last
//! successfully committed unit.

use crate::cancel::CancelToken;
use crate::error::{RunnerError, RunnerResult};
use crate::lock::TargetLocks;
use crate::retry::RetryPolicy;
use chrono::Utc;
use serde::Serialize;
use sm_core::operation::Operation;
use sm_core::registry::Registry;
use sm_core::render;
use sm_core::target::Target;
use sm_core::unit::{MigrationUnit, UnitKey};
use sm_db::Database;
use sm_history::{missing_predecessors, Ledger};

/// Options for a forward run.
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Stop after this unit; default is the latest known unit
    pub up_to: Option<UnitKey>,
    /// Checked between units; the in-flight unit always completes
    pub cancel: CancelToken,
}

/// Options for a reverting run.
#[derive(Debug, Clone, Default)]
pub struct RevertOptions {
    /// Revert every applied unit at or after this key; `None` reverts all
    pub down_to: Option<UnitKey>,
    /// Allow reverting past irreversible units, accepting data loss
    pub force: bool,
    /// Checked between units; the in-flight unit always completes
    pub cancel: CancelToken,
}

/// Result of a forward run.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyReport {
    pub target: String,
    /// Units applied by this run, in application order
    pub applied: Vec<UnitKey>,
    /// Guarded raw statements skipped because their guard was satisfied
    pub skipped_guards: usize,
    /// The run stopped at a between-units cancellation check
    pub cancelled: bool,
    pub last_applied: Option<UnitKey>,
}

/// Result of a reverting run.
#[derive(Debug, Clone, Serialize)]
pub struct RevertReport {
    pub target: String,
    /// Units reverted by this run, newest first
    pub reverted: Vec<UnitKey>,
    pub cancelled: bool,
    pub last_applied: Option<UnitKey>,
}

/// Point-in-time migration state of one target.
#[derive(Debug, Clone, Serialize)]
pub struct TargetStatus {
    pub target: String,
    pub last_applied: Option<UnitKey>,
    pub pending_count: usize,
    pub drifted: bool,
}

/// Ordered, transactional migration runner over one unit registry.
///
/// Holds its own lock table; concurrent calls against different targets
/// proceed independently, calls against the same target serialize.
pub struct Runner {
    registry: Registry,
    ledger: Ledger,
    locks: TargetLocks,
    retry: RetryPolicy,
}

impl Runner {
    pub fn new(registry: Registry) -> Self {
        Self::with_retry(registry, RetryPolicy::default())
    }

    pub fn with_retry(registry: Registry, retry: RetryPolicy) -> Self {
        Self {
            registry,
            ledger: Ledger::new(),
            locks: TargetLocks::new(),
            retry,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Apply all pending units to `target`, in ascending key order.
    ///
    /// Refuses with [`RunnerError::DriftedHistory`] if the ledger records a
    /// unit whose ordering predecessors are not all recorded; run
    /// [`reconcile`](Self::reconcile) first.
    pub async fn apply(
        &self,
        db: &dyn Database,
        target: &Target,
        opts: &ApplyOptions,
    ) -> RunnerResult<ApplyReport> {
        let _lock = self.locks.acquire(target.id.as_str()).await;

        if let Some(up_to) = &opts.up_to {
            if !self.registry.contains(up_to) {
                return Err(RunnerError::UnknownUnit {
                    key: up_to.to_string(),
                });
            }
        }

        db.create_schema_if_not_exists(&target.schema).await?;
        self.ledger.ensure(db).await?;
        let applied = self.ledger.applied(db, target.id.as_str()).await?;

        let missing = missing_predecessors(&self.registry, &applied);
        if !missing.is_empty() {
            return Err(RunnerError::DriftedHistory {
                target: target.id.to_string(),
                missing: missing.len(),
            });
        }

        // Drift was refused above, so the history is a strict prefix and
        // everything past the last applied key is pending.
        let pending: Vec<&MigrationUnit> = self
            .registry
            .pending_after(applied.last())
            .filter(|u| opts.up_to.as_ref().map_or(true, |k| u.key() <= k))
            .collect();
        log::info!(
            "target {}: {} applied, {} pending",
            target.id,
            applied.len(),
            pending.len()
        );

        let mut report = ApplyReport {
            target: target.id.to_string(),
            applied: Vec::new(),
            skipped_guards: 0,
            cancelled: false,
            last_applied: applied.last().cloned(),
        };
        for unit in pending {
            if opts.cancel.is_cancelled() {
                log::info!("target {}: run cancelled before unit {}", target.id, unit.key());
                report.cancelled = true;
                break;
            }
            let skipped = self.apply_unit(db, target, unit).await?;
            report.skipped_guards += skipped;
            report.applied.push(unit.key().clone());
            report.last_applied = Some(unit.key().clone());
        }
        Ok(report)
    }

    /// Revert applied units, newest first, down to (and including) `down_to`.
    ///
    /// Refuses with [`RunnerError::IrreversibleUnit`] before touching
    /// anything if the span contains an irreversible unit and `force` is not
    /// set.
    pub async fn revert(
        &self,
        db: &dyn Database,
        target: &Target,
        opts: &RevertOptions,
    ) -> RunnerResult<RevertReport> {
        let _lock = self.locks.acquire(target.id.as_str()).await;

        if let Some(down_to) = &opts.down_to {
            if !self.registry.contains(down_to) {
                return Err(RunnerError::UnknownUnit {
                    key: down_to.to_string(),
                });
            }
        }

        self.ledger.ensure(db).await?;
        let applied = self.ledger.applied(db, target.id.as_str()).await?;

        let mut span: Vec<&MigrationUnit> = Vec::new();
        for key in applied.iter().rev() {
            if opts.down_to.as_ref().map_or(true, |d| key >= d) {
                let unit = self
                    .registry
                    .get(key)
                    .ok_or_else(|| RunnerError::UnknownUnit {
                        key: key.to_string(),
                    })?;
                span.push(unit);
            }
        }

        if !opts.force {
            if let Some(unit) = span.iter().find(|u| u.is_irreversible()) {
                return Err(RunnerError::IrreversibleUnit {
                    unit: format!("{} ({})", unit.key(), unit.name()),
                });
            }
        }

        let mut report = RevertReport {
            target: target.id.to_string(),
            reverted: Vec::new(),
            cancelled: false,
            last_applied: None,
        };
        for unit in span {
            if opts.cancel.is_cancelled() {
                log::info!("target {}: revert cancelled before unit {}", target.id, unit.key());
                report.cancelled = true;
                break;
            }
            self.revert_unit(db, target, unit).await?;
            report.reverted.push(unit.key().clone());
        }
        let remaining = self.ledger.applied(db, target.id.as_str()).await?;
        report.last_applied = remaining.last().cloned();
        Ok(report)
    }

    /// Migration state of one target. Read-only apart from ledger bootstrap.
    pub async fn status(&self, db: &dyn Database, target: &Target) -> RunnerResult<TargetStatus> {
        self.ledger.ensure(db).await?;
        let applied = self.ledger.applied(db, target.id.as_str()).await?;
        let missing = missing_predecessors(&self.registry, &applied);
        let pending_count = self
            .registry
            .units()
            .iter()
            .filter(|u| !applied.contains(u.key()))
            .count();
        Ok(TargetStatus {
            target: target.id.to_string(),
            last_applied: applied.last().cloned(),
            pending_count,
            drifted: !missing.is_empty(),
        })
    }

    /// Catch-up pass for a drifted target: apply exactly the units missing
    /// below the ledger's high-water mark, restoring the strict-prefix
    /// invariant so normal forward runs can resume.
    pub async fn reconcile(
        &self,
        db: &dyn Database,
        target: &Target,
        cancel: &CancelToken,
    ) -> RunnerResult<ApplyReport> {
        let _lock = self.locks.acquire(target.id.as_str()).await;

        db.create_schema_if_not_exists(&target.schema).await?;
        self.ledger.ensure(db).await?;
        let applied = self.ledger.applied(db, target.id.as_str()).await?;
        let missing = missing_predecessors(&self.registry, &applied);
        log::info!(
            "target {}: reconciling {} missing unit(s)",
            target.id,
            missing.len()
        );

        let mut report = ApplyReport {
            target: target.id.to_string(),
            applied: Vec::new(),
            skipped_guards: 0,
            cancelled: false,
            last_applied: applied.last().cloned(),
        };
        for key in &missing {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
            let unit = self
                .registry
                .get(key)
                .ok_or_else(|| RunnerError::UnknownUnit {
                    key: key.to_string(),
                })?;
            let skipped = self.apply_unit(db, target, unit).await?;
            report.skipped_guards += skipped;
            report.applied.push(key.clone());
        }
        let after = self.ledger.applied(db, target.id.as_str()).await?;
        report.last_applied = after.last().cloned();
        Ok(report)
    }

    /// Apply one unit inside its own transaction. Returns the number of
    /// guard-skipped operations.
    async fn apply_unit(
        &self,
        db: &dyn Database,
        target: &Target,
        unit: &MigrationUnit,
    ) -> RunnerResult<usize> {
        log::info!("target {}: applying {} ({})", target.id, unit.key(), unit.name());
        db.begin().await?;
        match self.run_operations(db, unit, unit.forward()).await {
            Ok(skipped) => {
                if let Err(err) = self
                    .ledger
                    .record(db, target.id.as_str(), unit.key(), Utc::now())
                    .await
                {
                    let _ = db.rollback().await;
                    return Err(err.into());
                }
                if let Err(err) = db.commit().await {
                    let _ = db.rollback().await;
                    return Err(err.into());
                }
                Ok(skipped)
            }
            Err(err) => {
                let _ = db.rollback().await;
                Err(err)
            }
        }
    }

    /// Revert one unit inside its own transaction.
    async fn revert_unit(
        &self,
        db: &dyn Database,
        target: &Target,
        unit: &MigrationUnit,
    ) -> RunnerResult<()> {
        log::info!("target {}: reverting {} ({})", target.id, unit.key(), unit.name());
        db.begin().await?;
        match self.run_operations(db, unit, unit.backward()).await {
            Ok(_) => {
                if let Err(err) = self.ledger.remove(db, target.id.as_str(), unit.key()).await {
                    let _ = db.rollback().await;
                    return Err(err.into());
                }
                if let Err(err) = db.commit().await {
                    let _ = db.rollback().await;
                    return Err(err.into());
                }
                Ok(())
            }
            Err(err) => {
                let _ = db.rollback().await;
                Err(err)
            }
        }
    }

    /// Execute a unit's operation sequence, evaluating idempotency guards
    /// and retrying transient failures per statement.
    async fn run_operations(
        &self,
        db: &dyn Database,
        unit: &MigrationUnit,
        ops: &[Operation],
    ) -> RunnerResult<usize> {
        let mut skipped = 0;
        for (index, op) in ops.iter().enumerate() {
            if let Some(guard) = op.guard() {
                let satisfied = db
                    .query_bool(&guard.query)
                    .await
                    .map_err(|e| statement_failure(unit, index, op, e))?;
                if satisfied {
                    log::debug!(
                        "unit {}: guard satisfied, skipping operation {} ({})",
                        unit.key(),
                        index,
                        op.kind()
                    );
                    skipped += 1;
                    continue;
                }
            }
            let sql = render::to_sql(op);
            self.retry
                .execute(db, &sql)
                .await
                .map_err(|e| statement_failure(unit, index, op, e))?;
        }
        Ok(skipped)
    }
}

fn statement_failure(
    unit: &MigrationUnit,
    index: usize,
    op: &Operation,
    source: sm_db::DbError,
) -> RunnerError {
    RunnerError::StatementFailure {
        unit: unit.key().to_string(),
        op_index: index,
        operation: op.to_string(),
        source,
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
