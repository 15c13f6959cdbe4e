//! The applied-migration ledger.
//!
//! One `sm_meta.schema_migrations` table per physical database records which
//! units have been applied to which target. All operations borrow the
//! caller's [`Database`] connection, so a `record` issued between `begin`
//! and `commit` succeeds or fails together with the unit's DDL.

use crate::error::{HistoryError, HistoryResult};
use chrono::{DateTime, Utc};
use sm_core::registry::Registry;
use sm_core::unit::UnitKey;
use sm_db::Database;

/// Escape a string for use inside a single-quoted SQL literal.
fn sql_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Stateless accessor for the `sm_meta.schema_migrations` ledger table.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ledger;

impl Ledger {
    pub fn new() -> Self {
        Self
    }

    /// Ensure the `sm_meta` schema and ledger table exist.
    pub async fn ensure(&self, db: &dyn Database) -> HistoryResult<()> {
        db.execute_batch(
            "CREATE SCHEMA IF NOT EXISTS sm_meta;
             CREATE TABLE IF NOT EXISTS sm_meta.schema_migrations (
                 unit_id    VARCHAR NOT NULL,
                 applied_at TIMESTAMP NOT NULL,
                 target_id  VARCHAR NOT NULL,
                 PRIMARY KEY (unit_id, target_id)
             );",
        )
        .await?;
        Ok(())
    }

    /// Ordered set of unit keys recorded as applied for `target`.
    pub async fn applied(&self, db: &dyn Database, target: &str) -> HistoryResult<Vec<UnitKey>> {
        let sql = format!(
            "SELECT unit_id FROM sm_meta.schema_migrations \
             WHERE target_id = '{}' ORDER BY unit_id",
            sql_literal(target)
        );
        let values = db.query_strings(&sql).await?;
        let mut keys = Vec::with_capacity(values.len());
        for value in values {
            let key = UnitKey::new(value.clone()).map_err(|e| HistoryError::CorruptEntry {
                target: target.to_string(),
                value,
                reason: e.to_string(),
            })?;
            keys.push(key);
        }
        Ok(keys)
    }

    /// Record a unit as applied. Joins the caller's open transaction.
    pub async fn record(
        &self,
        db: &dyn Database,
        target: &str,
        unit: &UnitKey,
        applied_at: DateTime<Utc>,
    ) -> HistoryResult<()> {
        let sql = format!(
            "INSERT INTO sm_meta.schema_migrations (unit_id, applied_at, target_id) \
             VALUES ('{}', TIMESTAMP '{}', '{}')",
            sql_literal(unit.as_str()),
            applied_at.format("%Y-%m-%d %H:%M:%S"),
            sql_literal(target)
        );
        db.execute(&sql).await?;
        log::debug!("recorded unit {unit} for target {target}");
        Ok(())
    }

    /// Remove a unit's record on rollback. Joins the caller's open transaction.
    pub async fn remove(&self, db: &dyn Database, target: &str, unit: &UnitKey) -> HistoryResult<()> {
        let sql = format!(
            "DELETE FROM sm_meta.schema_migrations \
             WHERE unit_id = '{}' AND target_id = '{}'",
            sql_literal(unit.as_str()),
            sql_literal(target)
        );
        db.execute(&sql).await?;
        log::debug!("removed unit {unit} for target {target}");
        Ok(())
    }
}

/// Registry units ordered before the highest applied key that are missing
/// from the applied set.
///
/// Non-empty means the target is drifted: some later unit was recorded while
/// an earlier one was not (out-of-band fixes, ledger surgery). Forward
/// migration must be refused until a reconcile pass applies these.
pub fn missing_predecessors(registry: &Registry, applied: &[UnitKey]) -> Vec<UnitKey> {
    let Some(highest) = applied.iter().max() else {
        return Vec::new();
    };
    let mut missing = Vec::new();
    for unit in registry.units() {
        let key = unit.key();
        if key < highest && !applied.contains(key) {
            missing.push(key.clone());
        }
    }
    missing
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
