//! Scriptable in-memory fake for unit tests.
//!
//! [`MockDb`] records every statement it is asked to execute, tracks
//! transaction boundaries, and returns scripted answers for boolean and
//! string queries. Runner and history tests use it where they need failure
//! injection or guard evaluation without real DDL.

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct MockState {
    /// Every statement passed to execute/execute_batch, in call order
    executed: Vec<String>,
    /// Statements staged in the open transaction
    staged: Vec<String>,
    /// Statements whose transaction committed (or that ran outside one)
    committed: Vec<String>,
    in_transaction: bool,
    /// Scripted boolean query answers
    bool_answers: HashMap<String, bool>,
    /// Scripted string query answers
    string_answers: HashMap<String, Vec<String>>,
    /// Substring that makes execution fail with a semantic error
    fail_on: Option<String>,
    /// Substring + remaining count of transient connection failures
    transient: Option<(String, u32)>,
}

/// In-memory fake [`Database`].
#[derive(Default)]
pub struct MockDb {
    state: Mutex<MockState>,
}

impl MockDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the answer to a boolean query (e.g. an idempotency guard).
    pub fn script_bool(&self, query: impl Into<String>, answer: bool) {
        self.state
            .lock()
            .unwrap()
            .bool_answers
            .insert(query.into(), answer);
    }

    /// Script the answer to a string query.
    pub fn script_strings(&self, query: impl Into<String>, rows: Vec<String>) {
        self.state
            .lock()
            .unwrap()
            .string_answers
            .insert(query.into(), rows);
    }

    /// Make any statement containing `needle` fail with a semantic error.
    pub fn fail_on(&self, needle: impl Into<String>) {
        self.state.lock().unwrap().fail_on = Some(needle.into());
    }

    /// Make the next `times` statements containing `needle` fail with a
    /// transient connection error, then succeed.
    pub fn fail_transient(&self, needle: impl Into<String>, times: u32) {
        self.state.lock().unwrap().transient = Some((needle.into(), times));
    }

    /// Every statement attempted, in order.
    pub fn executed(&self) -> Vec<String> {
        self.state.lock().unwrap().executed.clone()
    }

    /// Statements that made it through a committed transaction.
    pub fn committed(&self) -> Vec<String> {
        self.state.lock().unwrap().committed.clone()
    }

    fn run_statement(&self, sql: &str) -> DbResult<()> {
        let mut state = self.state.lock().unwrap();
        state.executed.push(sql.to_string());

        if let Some((needle, remaining)) = &mut state.transient {
            if sql.contains(needle.as_str()) && *remaining > 0 {
                *remaining -= 1;
                return Err(DbError::ConnectionError(format!(
                    "scripted transient failure: {sql}"
                )));
            }
        }
        if let Some(needle) = &state.fail_on {
            if sql.contains(needle.as_str()) {
                return Err(DbError::ExecutionError(format!(
                    "scripted failure: {sql}"
                )));
            }
        }

        if state.in_transaction {
            state.staged.push(sql.to_string());
        } else {
            state.committed.push(sql.to_string());
        }
        Ok(())
    }
}

#[async_trait]
impl Database for MockDb {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.run_statement(sql)?;
        Ok(0)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.run_statement(sql)
    }

    async fn query_bool(&self, sql: &str) -> DbResult<bool> {
        let state = self.state.lock().unwrap();
        Ok(state.bool_answers.get(sql).copied().unwrap_or(false))
    }

    async fn query_strings(&self, sql: &str) -> DbResult<Vec<String>> {
        let state = self.state.lock().unwrap();
        Ok(state.string_answers.get(sql).cloned().unwrap_or_default())
    }

    async fn begin(&self) -> DbResult<()> {
        let mut state = self.state.lock().unwrap();
        state.in_transaction = true;
        state.staged.clear();
        Ok(())
    }

    async fn commit(&self) -> DbResult<()> {
        let mut state = self.state.lock().unwrap();
        state.in_transaction = false;
        let staged = std::mem::take(&mut state.staged);
        state.committed.extend(staged);
        Ok(())
    }

    async fn rollback(&self) -> DbResult<()> {
        let mut state = self.state.lock().unwrap();
        state.in_transaction = false;
        state.staged.clear();
        Ok(())
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        let state = self.state.lock().unwrap();
        Ok(state.bool_answers.get(name).copied().unwrap_or(false))
    }

    async fn column_exists(&self, schema: &str, table: &str, column: &str) -> DbResult<bool> {
        let key = format!("{schema}.{table}.{column}");
        let state = self.state.lock().unwrap();
        Ok(state.bool_answers.get(&key).copied().unwrap_or(false))
    }

    async fn create_schema_if_not_exists(&self, schema: &str) -> DbResult<()> {
        self.run_statement(&format!("CREATE SCHEMA IF NOT EXISTS \"{schema}\""))
    }

    fn db_type(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_statements() {
        let db = MockDb::new();
        db.execute("CREATE TABLE t (id INTEGER)").await.unwrap();
        assert_eq!(db.executed(), vec!["CREATE TABLE t (id INTEGER)"]);
        assert_eq!(db.committed(), vec!["CREATE TABLE t (id INTEGER)"]);
    }

    #[tokio::test]
    async fn test_rollback_discards_staged() {
        let db = MockDb::new();
        db.begin().await.unwrap();
        db.execute("CREATE TABLE t (id INTEGER)").await.unwrap();
        db.rollback().await.unwrap();

        assert_eq!(db.executed().len(), 1);
        assert!(db.committed().is_empty());
    }

    #[tokio::test]
    async fn test_scripted_semantic_failure() {
        let db = MockDb::new();
        db.fail_on("DROP TABLE");
        let err = db.execute("DROP TABLE t").await.unwrap_err();
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_scripted_transient_failure_clears() {
        let db = MockDb::new();
        db.fail_transient("INSERT", 2);

        assert!(db.execute("INSERT INTO t VALUES (1)").await.is_err());
        assert!(db.execute("INSERT INTO t VALUES (1)").await.is_err());
        assert!(db.execute("INSERT INTO t VALUES (1)").await.is_ok());
    }

    #[tokio::test]
    async fn test_scripted_bool_answers() {
        let db = MockDb::new();
        db.script_bool("SELECT 1 = 1", true);
        assert!(db.query_bool("SELECT 1 = 1").await.unwrap());
        assert!(!db.query_bool("SELECT 1 = 2").await.unwrap());
    }
}
