use std::hash::{Hash, Hasher};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Hash function implementation for shard assignment.
/// Uses an enum to avoid trait object limitations with generics.
#[derive(Debug, Clone, Copy, Default)]
pub enum ShardHasher {
    /// AHash implementation (default, fast and well-distributed).
    #[default]
    AHash,
    /// FxHash implementation (faster but potentially less distributed).
    #[cfg(feature = "fxhash")]
    FxHash,
    /// Pass-through of the key's own hash value.
    Identity,
}

impl ShardHasher {
    /// Hash a key to determine which shard it belongs to.
    pub fn hash_key<K: Hash + ?Sized>(&self, key: &K) -> u64 {
        match self {
            ShardHasher::AHash => {
                let mut hasher = ahash::AHasher::default();
                key.hash(&mut hasher);
                hasher.finish()
            }
            #[cfg(feature = "fxhash")]
            ShardHasher::FxHash => {
                let mut hasher = fxhash::FxHasher::default();
                key.hash(&mut hasher);
                hasher.finish()
            }
            ShardHasher::Identity => {
                let mut hasher = IdentityHasher::default();
                key.hash(&mut hasher);
                hasher.finish()
            }
        }
    }
}

/// Hasher that returns the first integer it is fed unchanged.
///
/// A key whose `Hash` impl writes a single integer (`u32`, a newtype deriving
/// `Hash` over one, ...) therefore hashes to exactly that integer. Further
/// writes are mixed in, and raw bytes are folded with FNV-1a, so composite and
/// string keys still spread across shards.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityHasher {
    hash: u64,
    written: bool,
}

impl IdentityHasher {
    #[inline]
    fn mix(&mut self, value: u64) {
        if self.written {
            self.hash = (self.hash.rotate_left(5) ^ value).wrapping_mul(FNV_PRIME);
        } else {
            self.hash = value;
            self.written = true;
        }
    }
}

impl Hasher for IdentityHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        let mut hash = if self.written { self.hash } else { FNV_OFFSET };
        for byte in bytes {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        self.hash = hash;
        self.written = true;
    }

    #[inline]
    fn write_u8(&mut self, i: u8) {
        self.mix(u64::from(i));
    }

    #[inline]
    fn write_u16(&mut self, i: u16) {
        self.mix(u64::from(i));
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.mix(u64::from(i));
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.mix(i);
    }

    #[inline]
    fn write_u128(&mut self, i: u128) {
        self.mix((i as u64) ^ ((i >> 64) as u64));
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.mix(i as u64);
    }
}
