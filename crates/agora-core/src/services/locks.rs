//! Per-entity mutual exclusion.
//!
//! Serializes read-compute-write-propagate sequences on the same post inside
//! one process. Entries are created on demand and pruned when the last holder
//! or waiter releases them.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

type LockTable = DashMap<Uuid, Arc<Mutex<()>>>;

/// Table of async locks keyed by entity id.
#[derive(Clone, Default)]
pub struct EntityLocks {
    table: Arc<LockTable>,
}

impl EntityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`.
    pub async fn acquire(&self, id: Uuid) -> EntityLock {
        // The map guard must be released before awaiting the mutex.
        let mutex = self.table.entry(id).or_default().value().clone();
        let guard = mutex.lock_owned().await;

        EntityLock {
            id,
            guard: Some(guard),
            table: self.table.clone(),
        }
    }

    /// Number of ids currently tracked.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Held lock on one entity id. Released on drop.
pub struct EntityLock {
    id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
    table: Arc<LockTable>,
}

impl Drop for EntityLock {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the table's own reference left: nobody holds or waits.
        self.table
            .remove_if(&self.id, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
