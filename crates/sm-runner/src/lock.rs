//! Per-target advisory locks.
//!
//! One runner at a time may walk a target's schema-change path. Runs against
//! different targets proceed in parallel; runs against the same target
//! serialize on its lock, held from discovery until the runner returns to
//! idle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Lock table keyed by target id.
///
/// An explicit value owned by the runner, not process-wide state; construct
/// one per engine instance.
#[derive(Debug, Default)]
pub struct TargetLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl TargetLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `target`, waiting if another run holds it.
    ///
    /// The guard releases the lock on drop.
    pub async fn acquire(&self, target: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap();
            locks
                .entry(target.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_same_target_serializes() {
        let locks = Arc::new(TargetLocks::new());
        let concurrent = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let locks = Arc::clone(&locks);
            let concurrent = Arc::clone(&concurrent);
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire("catalog").await;
                let now = concurrent.fetch_add(1, Ordering::SeqCst);
                assert_eq!(now, 0, "two holders inside the same target's lock");
                tokio::task::yield_now().await;
                concurrent.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_different_targets_are_independent() {
        let locks = TargetLocks::new();
        let _catalog = locks.acquire("catalog").await;
        // Would deadlock if targets shared a lock
        let _tenant = locks.acquire("acme").await;
    }
}
