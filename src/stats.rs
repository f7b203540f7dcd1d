//! Statistics and diagnostics types.

#[cfg(feature = "metrics")]
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-shard operation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShardOps {
    /// Number of lookups that found an entry.
    pub reads: u64,
    /// Number of writes that stored a value.
    pub writes: u64,
    /// Number of removals that found an entry.
    pub removes: u64,
    /// Number of lock acquisitions, shared or exclusive.
    pub lock_acquisitions: u64,
}

impl ShardOps {
    /// Reads + writes + removes.
    pub fn total(&self) -> u64 {
        self.reads + self.writes + self.removes
    }
}

/// Thread-safe statistics tracker for a single shard.
#[cfg(feature = "metrics")]
#[derive(Debug, Default)]
pub(crate) struct ShardStats {
    reads: AtomicU64,
    writes: AtomicU64,
    removes: AtomicU64,
    lock_acquisitions: AtomicU64,
}

#[cfg(feature = "metrics")]
impl ShardStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_remove(&self) {
        self.removes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_lock_acquisition(&self) {
        self.lock_acquisitions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ShardOps {
        ShardOps {
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            removes: self.removes.load(Ordering::Relaxed),
            lock_acquisitions: self.lock_acquisitions.load(Ordering::Relaxed),
        }
    }
}

/// Zero-sized placeholder when metrics are disabled.
#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default)]
pub(crate) struct ShardStats;

#[cfg(not(feature = "metrics"))]
impl ShardStats {
    pub fn new() -> Self {
        ShardStats
    }

    #[inline]
    pub fn record_read(&self) {}

    #[inline]
    pub fn record_write(&self) {}

    #[inline]
    pub fn record_remove(&self) {}

    #[inline]
    pub fn record_lock_acquisition(&self) {}

    pub fn snapshot(&self) -> ShardOps {
        ShardOps::default()
    }
}

/// Aggregate statistics for a ShardedMap instance.
///
/// Shard sizes are read one shard at a time, so under concurrent writes the
/// figures may reflect different shards at different instants.
#[derive(Debug, Clone)]
pub struct Stats {
    /// Total number of entries across all shards.
    pub size: usize,
    /// Number of entries in each shard.
    pub shard_sizes: Vec<usize>,
    /// Operation counts for each shard.
    pub operations: Vec<ShardOps>,
}

/// Per-shard diagnostics snapshot.
#[derive(Debug, Clone)]
pub struct ShardDiagnostics {
    /// Number of entries in this shard.
    pub entries: usize,
    /// Operation counters (all zero when metrics disabled).
    pub ops: ShardOps,
}

/// Structured snapshot for load introspection.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    /// Total number of entries across all shards.
    pub total_entries: usize,
    /// Per-shard diagnostics.
    pub shards: Vec<ShardDiagnostics>,
    /// Total read + write + remove operations (0 when metrics disabled).
    pub total_operations: u64,
    /// Average load (entries) per shard.
    pub avg_load_per_shard: f64,
    /// Max load / avg load ratio. 0.0 for an empty map.
    pub max_load_ratio: f64,
}

impl From<Stats> for Diagnostics {
    fn from(stats: Stats) -> Self {
        let shards: Vec<ShardDiagnostics> = stats
            .shard_sizes
            .iter()
            .zip(stats.operations.iter())
            .map(|(&entries, &ops)| ShardDiagnostics { entries, ops })
            .collect();

        let total_operations = stats.operations.iter().map(ShardOps::total).sum();
        let avg_load_per_shard = if shards.is_empty() {
            0.0
        } else {
            stats.size as f64 / shards.len() as f64
        };
        let max_load = stats.shard_sizes.iter().copied().max().unwrap_or(0);
        let max_load_ratio = if avg_load_per_shard > 0.0 {
            max_load as f64 / avg_load_per_shard
        } else {
            0.0
        };

        Self {
            total_entries: stats.size,
            shards,
            total_operations,
            avg_load_per_shard,
            max_load_ratio,
        }
    }
}
