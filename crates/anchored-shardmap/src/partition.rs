use crate::config_constants::{NUM_SHARDS, NUM_SHARDS_U64};


/// The width of each shard's band of the key space, `2^64 / NUM_SHARDS`.
const BAND_WIDTH: u64 = u64::MAX / NUM_SHARDS_U64 + 1;

/// The process-wide partition of the `u64` key space into [`NUM_SHARDS`] bands.
///
/// Built at compile time, so reading it never requires synchronization.
pub static PARTITION_TABLE: PartitionTable = PartitionTable::new();


/// Ascending, contiguous, non-overlapping bands covering `0..=u64::MAX`, one per shard.
///
/// Band `i` covers the keys in `(upper_bound(i-1), upper_bound(i)]`, with band `0` starting at
/// `0` and the last band ending at `u64::MAX`. Since every key in band `i` is less than every
/// key in band `i+1`, visiting shards in index order visits keys in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionTable {
    upper_bounds: [u64; NUM_SHARDS],
}

impl PartitionTable {
    #[must_use]
    const fn new() -> Self {
        let mut upper_bounds = [0; NUM_SHARDS];
        let mut upper_bound = u64::MAX;
        let mut shard = NUM_SHARDS;

        while shard > 0 {
            shard -= 1;
            upper_bounds[shard] = upper_bound;
            // Wraps only after the last assignment, for shard `0`.
            upper_bound = upper_bound.wrapping_sub(BAND_WIDTH);
        }

        Self { upper_bounds }
    }

    /// The inclusive upper bound of each shard's band, in ascending order.
    #[inline]
    #[must_use]
    pub const fn upper_bounds(&self) -> &[u64; NUM_SHARDS] {
        &self.upper_bounds
    }

    /// Returns the index of the shard whose band contains `key`; that is, the smallest
    /// index whose upper bound is at least `key`.
    ///
    /// The returned value is always less than [`NUM_SHARDS`].
    #[inline]
    #[must_use]
    pub fn shard_of(&self, key: u64) -> usize {
        // The last upper bound is `u64::MAX`, so some band always matches.
        self.upper_bounds.partition_point(|&upper_bound| upper_bound < key)
    }
}

/// Returns the index of the shard owning `key` in the global [`PARTITION_TABLE`].
#[inline]
#[must_use]
pub fn shard_of(key: u64) -> usize {
    PARTITION_TABLE.shard_of(key)
}
