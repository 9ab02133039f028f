//! Per-dataset mutual exclusion
//!
//! Merges on the same dataset name run one at a time; different names never
//! wait on each other. Entries are dropped once no guard references them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::dataset::DatasetName;

#[derive(Debug, Default)]
pub struct DatasetLocks {
    locks: Mutex<HashMap<DatasetName, Weak<AsyncMutex<()>>>>,
}

/// Held for the duration of one read-merge-write
pub type DatasetGuard = OwnedMutexGuard<()>;

impl DatasetLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `name`.
    pub async fn acquire(&self, name: &DatasetName) -> DatasetGuard {
        let lock = self.lock_for(name);
        lock.lock_owned().await
    }

    fn lock_for(&self, name: &DatasetName) -> Arc<AsyncMutex<()>> {
        // Poisoning only means another thread panicked mid-insert; the map
        // itself is still consistent.
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.retain(|_, weak| weak.strong_count() > 0);

        if let Some(lock) = locks.get(name).and_then(Weak::upgrade) {
            return lock;
        }
        let lock = Arc::new(AsyncMutex::new(()));
        locks.insert(name.clone(), Arc::downgrade(&lock));
        lock
    }

    /// Names with a live lock (held or awaited)
    pub fn active(&self) -> usize {
        let locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.values().filter(|w| w.strong_count() > 0).count()
    }
}
