use crate::shard::Shard;
use std::hash::Hash;
use std::sync::Arc;

/// Weakly consistent iterator over all entries of a [`ShardedMap`](crate::ShardedMap).
///
/// Shards are visited in index order. Each shard is copied into a buffer under
/// its read lock, and the lock is released before any entry is yielded, so a
/// consumer never blocks writers. Entries written to a shard after it was
/// buffered are not seen; entries written to shards not yet visited are.
pub struct Iter<'a, K, V> {
    shards: &'a [Shard<K, V>],
    next_shard: usize,
    buffer: std::vec::IntoIter<(K, Arc<V>)>,
}

impl<'a, K, V> Iter<'a, K, V>
where
    K: Hash + Eq + Clone,
{
    pub(crate) fn new(shards: &'a [Shard<K, V>]) -> Self {
        Self {
            shards,
            next_shard: 0,
            buffer: Vec::new().into_iter(),
        }
    }

    /// Buffer the next non-empty shard. Returns false once all are exhausted.
    fn fill_buffer(&mut self) -> bool {
        while self.next_shard < self.shards.len() {
            let entries: Vec<(K, Arc<V>)> = {
                let guard = self.shards[self.next_shard].read_lock();
                guard
                    .iter()
                    .map(|(key, value)| (key.clone(), Arc::clone(value)))
                    .collect()
            };
            self.next_shard += 1;

            if !entries.is_empty() {
                self.buffer = entries.into_iter();
                return true;
            }
        }
        false
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V>
where
    K: Hash + Eq + Clone,
{
    type Item = (K, Arc<V>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffer.next() {
                return Some(item);
            }
            if !self.fill_buffer() {
                return None;
            }
        }
    }
}
