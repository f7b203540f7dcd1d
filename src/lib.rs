//! # sharded-map
//!
//! A concurrent map that partitions its entries across a fixed number of
//! shards, each guarded by its own read-write lock.
//!
//! A key is routed to shard `hash(key) % shard_count`, always the same one for
//! the lifetime of the map. Operations on different shards never block each
//! other, so contention drops roughly by a factor of the shard count compared
//! to a single global lock. Values are stored behind `Arc<V>` so you can share
//! them without copying.
//!
//! ## Features
//!
//! - **Atomic conditional writes**: `put_if_absent` and `put_if_newer` check and
//!   write under one lock hold
//! - **Explicit misses**: lookups return `Option`, never a sentinel value
//! - **Bulk operations**: `items`, `keys`, `values`, `sorted_keys`, `update`,
//!   `clear` fan out across shards in index order
//! - **Configurable**: shard count, hash function, per-shard capacity
//! - **Statistics**: per-shard loads, operation counters behind the `metrics`
//!   feature
//!
//! Bulk operations lock one shard at a time. Under concurrent writes they are
//! weakly consistent: different shards may be observed at different instants.
//!
//! ## Example
//!
//! ```rust
//! use sharded_map::ShardedMap;
//!
//! let map = ShardedMap::new();
//!
//! map.insert("key1", 1);
//! map.insert("key2", 2);
//!
//! if let Some(value) = map.get(&"key1") {
//!     println!("Found: {}", *value);
//! }
//!
//! let (stored, inserted) = map.put_if_absent("key1", 10);
//! assert_eq!((*stored, inserted), (1, false));
//!
//! assert!(map.put_if_newer("key2", 3));
//! assert_eq!(map.sorted_keys(), vec!["key1", "key2"]);
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use sharded_map::{HashFunction, ShardedMapBuilder};
//!
//! let map = ShardedMapBuilder::new()
//!     .shard_count(10)?
//!     .hash_function(HashFunction::Identity)
//!     .build::<u32, i32>()?;
//!
//! map.insert(42, 4);
//! assert_eq!(map.shard_index(&42), 2);
//! # Ok::<(), sharded_map::Error>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

/// Configuration and builder types.
pub mod config;
/// Error types.
pub mod error;
/// Hash function implementations.
pub mod hash;
/// Iterator implementations.
pub mod iter;
/// Main ShardedMap implementation.
pub mod map;
mod shard;
/// Statistics and diagnostics.
pub mod stats;

pub use config::{Config, HashFunction, ShardedMapBuilder, DEFAULT_SHARD_COUNT};
pub use error::{Error, Result};
pub use iter::Iter;
pub use map::ShardedMap;
pub use stats::{Diagnostics, ShardDiagnostics, ShardOps, Stats};
