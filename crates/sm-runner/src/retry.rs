//! Bounded exponential backoff for transient statement failures.
//!
//! Only connectivity-class errors are retried. Semantic failures (syntax
//! errors, constraint violations) surface immediately.

use sm_core::config::RetryConfig;
use sm_db::{Database, DbResult};
use std::time::Duration;

/// Statement-level retry policy.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts per statement, including the first
    pub max_attempts: u32,
    /// Delay before the first retry; doubles per attempt
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.base_delay_ms),
        )
    }

    /// Execute one statement, retrying transient failures with backoff.
    pub async fn execute(&self, db: &dyn Database, sql: &str) -> DbResult<usize> {
        let mut delay = self.base_delay;
        let mut attempt = 1;
        loop {
            match db.execute(sql).await {
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    log::warn!(
                        "transient failure on attempt {attempt}/{}, retrying in {:?}: {err}",
                        self.max_attempts,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sm_db::MockDb;

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let db = MockDb::new();
        db.fail_transient("INSERT", 2);
        let policy = RetryPolicy::new(3, Duration::from_millis(1));

        policy.execute(&db, "INSERT INTO t VALUES (1)").await.unwrap();
        // Two failed attempts plus the success
        assert_eq!(db.executed().len(), 3);
    }

    #[tokio::test]
    async fn test_attempts_are_bounded() {
        let db = MockDb::new();
        db.fail_transient("INSERT", 10);
        let policy = RetryPolicy::new(3, Duration::from_millis(1));

        let err = policy.execute(&db, "INSERT INTO t VALUES (1)").await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(db.executed().len(), 3);
    }

    #[tokio::test]
    async fn test_semantic_failures_never_retry() {
        let db = MockDb::new();
        db.fail_on("DROP TABLE");
        let policy = RetryPolicy::new(5, Duration::from_millis(1));

        let err = policy.execute(&db, "DROP TABLE t").await.unwrap_err();
        assert!(!err.is_transient());
        assert_eq!(db.executed().len(), 1);
    }
}
