use thiserror::Error;

/// Result alias for fallible map construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when configuring a [`ShardedMap`](crate::ShardedMap).
///
/// Operations on an already constructed map never fail: lookups report a miss
/// through `Option` and conditional inserts through a `bool`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The shard count is zero.
    #[error("shard count must be greater than 0")]
    InvalidShardCount,
}
