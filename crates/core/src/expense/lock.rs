//! Per-key async mutual exclusion.

use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockMap<K> = DashMap<K, Arc<Mutex<()>>>;

/// A set of async mutexes created on demand, one per key.
///
/// Holding the guard for a key gives the holder the only writer slot for it;
/// other keys are unaffected. A key is forgotten as soon as its last holder
/// releases it with nobody waiting, so the set only tracks keys in use.
pub struct KeyedLocks<K: Eq + Hash> {
    locks: LockMap<K>,
}

/// Exclusive access to one key of a [`KeyedLocks`], released on drop.
pub struct KeyGuard<'a, K: Eq + Hash> {
    locks: &'a LockMap<K>,
    key: K,
    held: Option<OwnedMutexGuard<()>>,
}

impl<K: Eq + Hash + Clone> KeyedLocks<K> {
    /// Creates an empty lock set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Waits for exclusive access to `key`.
    pub async fn acquire(&self, key: &K) -> KeyGuard<'_, K> {
        // Clone the Arc out so the map shard is not held across the await.
        let lock = Arc::clone(&self.locks.entry(key.clone()).or_default());
        let mut guard = KeyGuard {
            locks: &self.locks,
            key: key.clone(),
            held: None,
        };
        guard.held = Some(lock.lock_owned().await);
        guard
    }

    /// Number of keys currently held or waited on.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no key is held or waited on.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl<K: Eq + Hash + Clone> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash> Drop for KeyGuard<'_, K> {
    fn drop(&mut self) {
        drop(self.held.take());
        // Under the shard lock: a count of one means only the map refers to
        // the mutex, so no holder or waiter can be racing this removal.
        self.locks.remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}
