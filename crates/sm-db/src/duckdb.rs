//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use async_trait::async_trait;
use duckdb::Connection;
use std::path::Path;
use std::sync::Mutex;

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| DbError::ConnectionError(format!("{e}: {path}")))?;
                }
            }
            Self::from_path(Path::new(path))
        }
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.conn.lock().unwrap();
        conn.execute(sql, [])
            .map_err(|e| match DbError::from(e) {
                DbError::ExecutionError(msg) => DbError::ExecutionError(format!("{msg}: {sql}")),
                other => other,
            })
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(sql).map_err(DbError::from)
    }

    /// Query a single boolean synchronously
    fn query_bool_sync(&self, sql: &str) -> DbResult<bool> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(sql, [], |row| row.get(0))
            .map_err(DbError::from)
    }

    /// Query the first column of all rows synchronously
    fn query_strings_sync(&self, sql: &str) -> DbResult<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(sql).map_err(DbError::from)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(DbError::from)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(DbError::from)?);
        }
        Ok(out)
    }

    fn transaction_verb(&self, verb: &str, sql: &str) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(sql)
            .map_err(|e| DbError::TransactionError {
                verb: verb.to_string(),
                message: e.to_string(),
            })
    }

    /// Check if relation exists synchronously
    fn relation_exists_sync(&self, name: &str) -> DbResult<bool> {
        let conn = self.conn.lock().unwrap();

        // Handle schema-qualified names
        let (schema, table) = if let Some(pos) = name.rfind('.') {
            (&name[..pos], &name[pos + 1..])
        } else {
            ("main", name)
        };

        let sql = format!(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = '{}' AND table_name = '{}'",
            schema, table
        );

        let count: i64 = conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(DbError::from)?;

        Ok(count > 0)
    }

    fn column_exists_sync(&self, schema: &str, table: &str, column: &str) -> DbResult<bool> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT COUNT(*) FROM information_schema.columns \
             WHERE table_schema = '{schema}' AND table_name = '{table}' AND column_name = '{column}'"
        );
        let count: i64 = conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(DbError::from)?;
        Ok(count > 0)
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_sync(sql)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn query_bool(&self, sql: &str) -> DbResult<bool> {
        self.query_bool_sync(sql)
    }

    async fn query_strings(&self, sql: &str) -> DbResult<Vec<String>> {
        self.query_strings_sync(sql)
    }

    async fn begin(&self) -> DbResult<()> {
        self.transaction_verb("BEGIN", "BEGIN TRANSACTION")
    }

    async fn commit(&self) -> DbResult<()> {
        self.transaction_verb("COMMIT", "COMMIT")
    }

    async fn rollback(&self) -> DbResult<()> {
        self.transaction_verb("ROLLBACK", "ROLLBACK")
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.relation_exists_sync(name)
    }

    async fn column_exists(&self, schema: &str, table: &str, column: &str) -> DbResult<bool> {
        self.column_exists_sync(schema, table, column)
    }

    async fn create_schema_if_not_exists(&self, schema: &str) -> DbResult<()> {
        let sql = format!("CREATE SCHEMA IF NOT EXISTS \"{}\"", schema);
        self.execute_sync(&sql)?;
        Ok(())
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}
