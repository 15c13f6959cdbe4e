//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// Database capability assumed by the migration engine: execute a statement,
/// control a transaction, query rows.
///
/// Implementations must be Send + Sync for async operation. Transaction
/// state is per-connection; the runner holds the target's advisory lock for
/// the whole run, so one open transaction at a time is an invariant the
/// caller upholds.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute one statement, returning affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute multiple statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Evaluate a single-value boolean query (idempotency guards)
    async fn query_bool(&self, sql: &str) -> DbResult<bool>;

    /// Query the first column of every result row as strings
    async fn query_strings(&self, sql: &str) -> DbResult<Vec<String>>;

    /// Open a transaction
    async fn begin(&self) -> DbResult<()>;

    /// Commit the open transaction
    async fn commit(&self) -> DbResult<()>;

    /// Roll back the open transaction
    async fn rollback(&self) -> DbResult<()>;

    /// Check if a table or view exists (name may be schema-qualified)
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Check if a column exists on a table
    async fn column_exists(&self, schema: &str, table: &str, column: &str) -> DbResult<bool>;

    /// Create a schema if it does not exist
    async fn create_schema_if_not_exists(&self, schema: &str) -> DbResult<()>;

    /// Backend identifier for logging
    fn db_type(&self) -> &'static str;
}
