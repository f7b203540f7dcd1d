use crate::config::{create_hasher, Config, HashFunction};
use crate::error::{Error, Result};
use crate::hash::ShardHasher;
use crate::iter::Iter;
use crate::shard::Shard;
use crate::stats::{Diagnostics, ShardOps, Stats};
use hashbrown::HashMap;
use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

const LOG_TARGET: &str = "sharded_map";

/// Concurrent map partitioned across a fixed number of independently locked shards.
///
/// Every key is routed to exactly one shard by `hash(key) % shard_count`.
/// Single-key operations lock only that shard, so operations on different
/// shards never block each other. Values are wrapped in `Arc<V>` so reads hand
/// out shared handles without copying.
///
/// Whole-map operations (`len`, `items`, `keys`, `values`, `update`, `clear`)
/// visit the shards one after another, each under its own lock. They are not
/// point-in-time snapshots when writers are active.
///
/// # Example
///
/// ```rust
/// use sharded_map::ShardedMap;
///
/// let map = ShardedMap::new();
/// map.insert("key1", "value1");
///
/// if let Some(value) = map.get(&"key1") {
///     println!("Found: {}", *value);
/// }
/// ```
pub struct ShardedMap<K, V> {
    shards: Vec<Shard<K, V>>,
    hash: ShardHasher,
    hash_function: HashFunction,
}

impl<K, V> ShardedMap<K, V>
where
    K: Hash + Eq,
{
    /// Create a new map with defaults (10 shards, ahash).
    pub fn new() -> Self {
        Self::from_config(Config::default())
    }

    /// Create a new map with `shard_count` shards and the default hash function.
    pub fn with_shard_count(shard_count: usize) -> Result<Self> {
        Self::with_config(Config::default().shard_count(shard_count)?)
    }

    /// Create a new map with custom config.
    pub fn with_config(config: Config) -> Result<Self> {
        if config.shard_count == 0 {
            return Err(Error::InvalidShardCount);
        }
        Ok(Self::from_config(config))
    }

    fn from_config(config: Config) -> Self {
        let shards = (0..config.shard_count)
            .map(|_| Shard::new(config.capacity_per_shard))
            .collect();

        tracing::debug!(
            target: LOG_TARGET,
            shard_count = config.shard_count,
            hash_function = ?config.hash_function,
            capacity_per_shard = ?config.capacity_per_shard,
            "created sharded map"
        );

        Self {
            shards,
            hash: create_hasher(config.hash_function),
            hash_function: config.hash_function,
        }
    }

    /// Index of the shard `key` belongs to, in `[0, shard_count)`.
    ///
    /// Depends only on the key's hash and the fixed shard count, so it never
    /// changes over the lifetime of the map.
    #[inline]
    pub fn shard_index(&self, key: &K) -> usize {
        let hash = self.hash.hash_key(key);
        (hash % self.shards.len() as u64) as usize
    }

    #[inline]
    fn shard(&self, key: &K) -> &Shard<K, V> {
        &self.shards[self.shard_index(key)]
    }

    /// Number of shards, fixed at construction.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Insert a key-value pair, replacing any previous value. Returns the old
    /// value if the key existed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sharded_map::ShardedMap;
    ///
    /// let map = ShardedMap::new();
    /// assert!(map.insert("key", "value").is_none());
    /// assert_eq!(map.insert("key", "new_value").unwrap().as_ref(), &"value");
    /// ```
    pub fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        self.shard(&key).insert(key, value)
    }

    /// Get a value by key. `None` means the key is absent; a stored value is
    /// always `Some`, even when it is itself `None` or `()`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sharded_map::ShardedMap;
    ///
    /// let map: ShardedMap<&str, Option<u32>> = ShardedMap::new();
    /// map.insert("nothing", None);
    ///
    /// assert_eq!(map.get(&"nothing").as_deref(), Some(&None));
    /// assert!(map.get(&"missing").is_none());
    /// ```
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.shard(key).get(key)
    }

    /// Check whether `key` is present without cloning its value.
    pub fn contains_key(&self, key: &K) -> bool {
        self.shard(key).contains_key(key)
    }

    /// Remove a key-value pair, returning the value if it existed.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        self.shard(key).remove(key)
    }

    /// Insert `value` only if `key` is absent.
    ///
    /// Returns the value now stored under `key` and whether this call inserted
    /// it. When two threads race on the same key exactly one sees `true`, and
    /// the other gets the winner's value back.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sharded_map::ShardedMap;
    ///
    /// let map = ShardedMap::new();
    /// map.insert(3, 4);
    ///
    /// let (stored, inserted) = map.put_if_absent(3, 5);
    /// assert_eq!((*stored, inserted), (4, false));
    ///
    /// let (stored, inserted) = map.put_if_absent(4, 5);
    /// assert_eq!((*stored, inserted), (5, true));
    /// ```
    pub fn put_if_absent(&self, key: K, value: V) -> (Arc<V>, bool) {
        self.shard(&key).put_if_absent(key, value)
    }

    /// Insert `value` if `key` is absent or if `value` compares greater than
    /// the stored value. Returns whether the map was changed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sharded_map::ShardedMap;
    ///
    /// let map = ShardedMap::new();
    /// assert!(map.put_if_newer("node", 1));
    /// assert!(map.put_if_newer("node", 5));
    /// assert!(!map.put_if_newer("node", 5));
    /// assert!(!map.put_if_newer("node", 2));
    /// assert_eq!(*map.get(&"node").unwrap(), 5);
    /// ```
    pub fn put_if_newer(&self, key: K, value: V) -> bool
    where
        V: PartialOrd,
    {
        self.put_if_newer_by(key, value, |candidate, existing| candidate > existing)
    }

    /// Like [`put_if_newer`](Self::put_if_newer) with a caller-supplied
    /// predicate, called as `is_newer(candidate, existing)` under the shard's
    /// write lock.
    pub fn put_if_newer_by<F>(&self, key: K, value: V, is_newer: F) -> bool
    where
        F: FnOnce(&V, &V) -> bool,
    {
        let shard_idx = self.shard_index(&key);
        let stored = self.shards[shard_idx].put_if_newer_by(key, value, is_newer);
        if !stored {
            tracing::trace!(
                target: LOG_TARGET,
                shard = shard_idx,
                "kept stored value, candidate is not newer"
            );
        }
        stored
    }

    /// Total number of entries across all shards.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.len()).sum()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy every entry into one map.
    pub fn items(&self) -> HashMap<K, Arc<V>>
    where
        K: Clone,
    {
        let mut items = HashMap::new();
        for shard in &self.shards {
            let map = shard.read_lock();
            items.extend(map.iter().map(|(k, v)| (k.clone(), Arc::clone(v))));
        }
        items
    }

    /// All keys, grouped by shard in index order.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        let mut keys = Vec::new();
        for shard in &self.shards {
            keys.extend(shard.read_lock().keys().cloned());
        }
        keys
    }

    /// All values, grouped by shard in index order.
    pub fn values(&self) -> Vec<Arc<V>> {
        let mut values = Vec::new();
        for shard in &self.shards {
            values.extend(shard.read_lock().values().cloned());
        }
        values
    }

    /// All keys in ascending order, regardless of shard placement.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sharded_map::ShardedMap;
    ///
    /// let map = ShardedMap::new();
    /// for key in [3u32, 63, 42, 14] {
    ///     map.insert(key, 4);
    /// }
    /// assert_eq!(map.sorted_keys(), vec![3, 14, 42, 63]);
    /// ```
    pub fn sorted_keys(&self) -> Vec<K>
    where
        K: Ord + Clone,
    {
        let mut keys = self.keys();
        keys.sort();
        keys
    }

    /// All keys sorted with a caller-supplied comparator.
    pub fn sorted_keys_by<F>(&self, compare: F) -> Vec<K>
    where
        K: Clone,
        F: FnMut(&K, &K) -> Ordering,
    {
        let mut keys = self.keys();
        keys.sort_by(compare);
        keys
    }

    /// Insert every pair of `batch`, each under its own shard's write lock.
    ///
    /// Readers may observe the batch partially applied.
    pub fn update<I>(&self, batch: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in batch {
            self.insert(key, value);
        }
    }

    /// Replace every shard's contents with a fresh empty mapping.
    pub fn clear(&self) {
        let removed: usize = self.shards.iter().map(|shard| shard.clear()).sum();
        tracing::debug!(target: LOG_TARGET, removed, "cleared sharded map");
    }

    /// Iterate over all entries one shard at a time.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sharded_map::ShardedMap;
    ///
    /// let map = ShardedMap::new();
    /// map.insert("key1", "value1");
    /// map.insert("key2", "value2");
    ///
    /// assert_eq!(map.iter().count(), 2);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V>
    where
        K: Clone,
    {
        Iter::new(&self.shards)
    }

    /// Number of entries in each shard, in index order.
    pub fn shard_loads(&self) -> Vec<usize> {
        self.shards.iter().map(|shard| shard.len()).collect()
    }

    /// Get detailed statistics about the map and its shards.
    pub fn stats(&self) -> Stats {
        let shard_sizes = self.shard_loads();
        let operations: Vec<ShardOps> = self.shards.iter().map(|s| s.stats()).collect();
        let size = shard_sizes.iter().sum();

        Stats {
            size,
            shard_sizes,
            operations,
        }
    }

    /// Load distribution summary derived from [`stats`](Self::stats).
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics::from(self.stats())
    }
}

impl<K, V> Default for ShardedMap<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for ShardedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardedMap")
            .field("shard_count", &self.shards.len())
            .field("hash_function", &self.hash_function)
            .finish_non_exhaustive()
    }
}

impl<K, V> FromIterator<(K, V)> for ShardedMap<K, V>
where
    K: Hash + Eq,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map = Self::new();
        map.update(iter);
        map
    }
}

impl<'a, K, V> IntoIterator for &'a ShardedMap<K, V>
where
    K: Hash + Eq + Clone,
{
    type Item = (K, Arc<V>);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
