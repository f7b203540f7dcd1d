use crate::stats::{ShardOps, ShardStats};
use hashbrown::hash_map::Entry;
use hashbrown::HashMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::hash::Hash;
use std::sync::Arc;

/// A single shard containing a HashMap protected by a read-write lock.
///
/// The mapping is only reachable through the lock guards, so every access goes
/// through `read` (shared) or `write` (exclusive).
pub(crate) struct Shard<K, V> {
    map: RwLock<HashMap<K, Arc<V>>>,
    capacity: Option<usize>,
    stats: ShardStats,
}

impl<K, V> Shard<K, V>
where
    K: Hash + Eq,
{
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            map: RwLock::new(fresh_map(capacity)),
            capacity,
            stats: ShardStats::new(),
        }
    }

    #[inline]
    fn read(&self) -> RwLockReadGuard<'_, HashMap<K, Arc<V>>> {
        self.stats.record_lock_acquisition();
        self.map.read()
    }

    #[inline]
    fn write(&self) -> RwLockWriteGuard<'_, HashMap<K, Arc<V>>> {
        self.stats.record_lock_acquisition();
        self.map.write()
    }

    /// Insert or overwrite, returning the previous value if any.
    pub fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        let result = self.write().insert(key, Arc::new(value));
        self.stats.record_write();
        result
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let result = self.read().get(key).cloned();
        if result.is_some() {
            self.stats.record_read();
        }
        result
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.read().contains_key(key)
    }

    /// Remove a key-value pair, returning the value if it existed.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        let result = self.write().remove(key);
        if result.is_some() {
            self.stats.record_remove();
        }
        result
    }

    /// Insert only if the key is vacant. The check and the insert happen under
    /// one write guard.
    pub fn put_if_absent(&self, key: K, value: V) -> (Arc<V>, bool) {
        let mut map = self.write();
        match map.entry(key) {
            Entry::Occupied(entry) => (Arc::clone(entry.get()), false),
            Entry::Vacant(entry) => {
                let value = Arc::new(value);
                entry.insert(Arc::clone(&value));
                self.stats.record_write();
                (value, true)
            }
        }
    }

    /// Insert if vacant, or replace when `is_newer(candidate, existing)` holds.
    pub fn put_if_newer_by<F>(&self, key: K, value: V, is_newer: F) -> bool
    where
        F: FnOnce(&V, &V) -> bool,
    {
        let mut map = self.write();
        let stored = match map.entry(key) {
            Entry::Occupied(mut entry) => {
                if is_newer(&value, entry.get()) {
                    entry.insert(Arc::new(value));
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(value));
                true
            }
        };
        if stored {
            self.stats.record_write();
        }
        stored
    }

    /// Swap the mapping for a fresh empty one, returning how many entries it held.
    pub fn clear(&self) -> usize {
        let fresh = fresh_map(self.capacity);
        let old = std::mem::replace(&mut *self.write(), fresh);
        old.len()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Get a read lock for enumeration.
    pub fn read_lock(&self) -> RwLockReadGuard<'_, HashMap<K, Arc<V>>> {
        self.read()
    }

    pub fn stats(&self) -> ShardOps {
        self.stats.snapshot()
    }
}

fn fresh_map<K, V>(capacity: Option<usize>) -> HashMap<K, Arc<V>> {
    match capacity {
        Some(capacity) => HashMap::with_capacity(capacity),
        None => HashMap::new(),
    }
}
