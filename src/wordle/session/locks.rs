use std::{
    collections::HashMap,
    hash::Hash,
    sync::{Arc, Mutex as SyncMutex, PoisonError},
};

use tokio::sync::{Mutex, OwnedMutexGuard};

type Entries<K> = Arc<SyncMutex<HashMap<K, Arc<Mutex<()>>>>>;

/// One async mutex per key, created on first use and removed again once
/// nobody holds or waits on it.
///
/// Holding the guard from [`KeyedLocks::lock`] is what makes a
/// load-change-save sequence on that key exclusive. The map itself is only
/// touched for a moment, never across an await.
#[derive(Debug)]
pub struct KeyedLocks<K>(Entries<K>);

impl<K> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self(Arc::default())
    }
}

impl<K: Eq + Hash + Clone> KeyedLocks<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, key: &K) -> KeyGuard<K> {
        let mutex = Arc::clone(
            self.0
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(key.clone())
                .or_default(),
        );

        KeyGuard {
            guard: Some(mutex.lock_owned().await),
            key: key.clone(),
            entries: Arc::clone(&self.0),
        }
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Releases the key on drop, and forgets it if no one else is queued.
#[derive(Debug)]
pub struct KeyGuard<K: Eq + Hash> {
    guard: Option<OwnedMutexGuard<()>>,
    key: K,
    entries: Entries<K>,
}

impl<K: Eq + Hash> Drop for KeyGuard<K> {
    fn drop(&mut self) {
        // the guard holds a reference to the mutex, release it before counting
        drop(self.guard.take());

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries
            .get(&self.key)
            .is_some_and(|mutex| Arc::strong_count(mutex) == 1)
        {
            entries.remove(&self.key);
        }
    }
}
