//! Per-room exclusive locks.
//!
//! One async mutex per `RoomKey`, created on first use. Commits on different room
//! categories never contend; commits on the same category run one at a time.

use guesthouse_core::RoomKey;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lock table keyed by room category
#[derive(Debug, Default)]
pub struct RoomLocks {
    table: Mutex<HashMap<RoomKey, Arc<Mutex<()>>>>,
}

impl RoomLocks {
    /// Creates an empty lock table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `key`. Access ends when the guard is dropped.
    pub async fn acquire(&self, key: &RoomKey) -> OwnedMutexGuard<()> {
        let lock = {
            let mut table = self.table.lock().await;
            Arc::clone(table.entry(key.clone()).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of room categories that have been locked at least once
    pub async fn len(&self) -> usize {
        self.table.lock().await.len()
    }

    /// True when no room has been locked yet
    pub async fn is_empty(&self) -> bool {
        self.table.lock().await.is_empty()
    }
}
