// src/application/commands/papers/locks.rs
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::paper::PaperId;

/// One async lock per paper id. Writers on different papers never contend.
#[derive(Default)]
pub(super) struct PaperLocks {
    inner: Mutex<HashMap<PaperId, Arc<AsyncMutex<()>>>>,
}

impl PaperLocks {
    pub(super) async fn acquire(&self, id: PaperId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(guard.entry(id).or_default())
        };
        lock.lock_owned().await
    }

    pub(super) fn forget(&self, id: PaperId) {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.remove(&id);
    }
}
