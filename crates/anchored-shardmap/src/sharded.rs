use std::array;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use tracing::Level as LogLevel;

use crate::{
    config_constants::{DEFAULT_MAX_LEVEL, MAX_LEVEL, NUM_SHARDS},
    entry::Entry,
    error::{Error, Result},
    node_heights::{recommended_max_level, shard_prng},
    partition::shard_of,
    shard::ShardSkiplist,
    value::MapValue,
};


/// An ordered map from `u64` keys to values, split into [`NUM_SHARDS`] independently locked
/// skiplists.
///
/// Each shard owns one contiguous band of the key space (see [`PartitionTable`]). Searches take
/// the owning shard's lock in shared mode, insertions and deletions take it exclusively, and no
/// operation ever holds more than one shard's lock at a time.
///
/// Whole-structure operations ([`len`], [`for_each`], [`sub`], [`snapshot`]) visit the shards
/// one at a time. Each shard is observed at a single instant, but different shards are observed
/// at different instants, so concurrent writes may be visible in some shards and not others.
///
/// To share the map between threads, wrap it in an [`Arc`].
///
/// [`PartitionTable`]: crate::PartitionTable
/// [`len`]: ShardedSkiplist::len
/// [`for_each`]: ShardedSkiplist::for_each
/// [`sub`]: ShardedSkiplist::sub
/// [`snapshot`]: ShardedSkiplist::snapshot
/// [`Arc`]: std::sync::Arc
pub struct ShardedSkiplist<V> {
    max_level: usize,
    shards:    Box<[ShardSkiplist<V>; NUM_SHARDS]>,
}

// ================================
//  Construction
// ================================

impl<V> ShardedSkiplist<V> {
    /// Create an empty map whose nodes have at most `max_level` forward pointers.
    ///
    /// Node levels are drawn from PRNGs seeded with OS entropy. A `max_level` of about
    /// `log4(N)` suits a map of `N` entries; see [`recommended_max_level`].
    ///
    /// # Errors
    /// Returns [`Error::InvalidMaxLevel`] if `max_level` is not in `1..=32`, or
    /// [`Error::Entropy`] if the OS entropy source fails.
    pub fn new(max_level: usize) -> Result<Self> {
        validate_max_level(max_level)?;
        let seed = getrandom::u64()?;
        Ok(Self::build(max_level, seed, false))
    }

    /// Create an empty map whose node levels are drawn deterministically from `seed`.
    ///
    /// Two maps with the same seed given the same operations in the same order have the same
    /// internal shape, which is useful for reproducible tests and benchmarks.
    ///
    /// # Errors
    /// Returns [`Error::InvalidMaxLevel`] if `max_level` is not in `1..=32`.
    pub fn new_seeded(max_level: usize, seed: u64) -> Result<Self> {
        validate_max_level(max_level)?;
        Ok(Self::build(max_level, seed, true))
    }

    /// Create an empty map with a `max_level` suited to about `expected_len` entries.
    ///
    /// # Errors
    /// Returns [`Error::Entropy`] if the OS entropy source fails.
    pub fn with_expected_len(expected_len: u64) -> Result<Self> {
        Self::new(recommended_max_level(expected_len))
    }

    #[must_use]
    fn build(max_level: usize, seed: u64, seeded: bool) -> Self {
        tracing::event!(
            LogLevel::DEBUG,
            max_level,
            shards = NUM_SHARDS,
            seeded,
            "creating sharded skiplist",
        );

        Self {
            max_level,
            shards: Box::new(array::from_fn(|shard| {
                ShardSkiplist::new(max_level, shard_prng(seed, shard))
            })),
        }
    }
}

fn validate_max_level(max_level: usize) -> Result<()> {
    if (1..=MAX_LEVEL).contains(&max_level) {
        Ok(())
    } else {
        tracing::event!(LogLevel::DEBUG, max_level, "rejected invalid skiplist max level");
        Err(Error::InvalidMaxLevel { max_level })
    }
}

impl<V> Default for ShardedSkiplist<V> {
    /// Create an empty map with a `max_level` of [`DEFAULT_MAX_LEVEL`].
    ///
    /// # Panics
    /// Panics if the OS entropy source fails.
    #[expect(clippy::expect_used, reason = "`Default` cannot report entropy failures")]
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LEVEL).expect("OS entropy should be available to seed the skiplist")
    }
}

// ================================
//  Size
// ================================

impl<V> ShardedSkiplist<V> {
    /// The maximum number of forward pointers of any node, as given at construction.
    #[inline]
    #[must_use]
    pub const fn level(&self) -> usize {
        self.max_level
    }

    /// The total number of entries, summed shard by shard without locking.
    ///
    /// With concurrent writers, the result is approximate: a write in flight during the sum may
    /// or may not be counted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shards.iter().map(ShardSkiplist::len).sum()
    }

    /// Whether every shard is empty, with the same caveats as [`len`].
    ///
    /// [`len`]: ShardedSkiplist::len
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(ShardSkiplist::is_empty)
    }

    /// The number of entries in each shard, in shard order.
    #[must_use]
    pub fn shard_lens(&self) -> [usize; NUM_SHARDS] {
        array::from_fn(|shard| self.shards.get(shard).map_or(0, ShardSkiplist::len))
    }

    #[expect(clippy::indexing_slicing, reason = "`shard_of` is always below `NUM_SHARDS`")]
    #[inline]
    #[must_use]
    fn shard(&self, key: u64) -> &ShardSkiplist<V> {
        &self.shards[shard_of(key)]
    }
}

// ================================
//  Point operations
// ================================

impl<V> ShardedSkiplist<V> {
    /// Call `f` on the value of `key`, if present, while its shard is read-locked.
    ///
    /// `f` must not access this map at all. Writing to the key's shard always deadlocks, and
    /// even a nested read of it deadlocks once a writer is waiting for the lock. Use [`search`]
    /// and work on the returned copy when the map must be touched again.
    ///
    /// [`search`]: ShardedSkiplist::search
    pub fn search_with<R, F: FnOnce(&V) -> R>(&self, key: u64, f: F) -> Option<R> {
        let shard = self.shard(key);
        if shard.is_empty() {
            return None;
        }

        shard.search_with(key, f)
    }

    /// Return a copy of the value of `key`, or `None` if `key` is absent.
    #[must_use]
    pub fn search(&self, key: u64) -> Option<V>
    where
        V: Clone,
    {
        self.search_with(key, V::clone)
    }

    #[must_use]
    pub fn contains(&self, key: u64) -> bool {
        self.search_with(key, |_| ()).is_some()
    }

    /// Insert `value` at `key`, overwriting the value already there, if any.
    ///
    /// An empty value (see [`MapValue`]) is silently ignored: the map is left untouched, and in
    /// particular an existing value at `key` is neither overwritten nor removed.
    pub fn insert(&self, key: u64, value: V)
    where
        V: MapValue,
    {
        if value.is_empty_value() {
            tracing::event!(LogLevel::TRACE, key, "ignored insertion of an empty value");
            return;
        }

        if self.shard(key).insert(key, value).is_some() {
            tracing::event!(LogLevel::TRACE, key, "overwrote value in place");
        }
    }

    /// Remove `key` from the map. Does nothing if `key` is absent.
    pub fn delete(&self, key: u64) {
        let shard = self.shard(key);
        if shard.is_empty() || shard.delete(key).is_none() {
            tracing::event!(LogLevel::TRACE, key, "deleted absent key");
        }
    }
}

// ================================
//  Whole-structure operations
// ================================

impl<V: Clone> ShardedSkiplist<V> {
    /// Visit every entry in ascending key order until `visit` returns `false`.
    ///
    /// Each non-empty shard is snapshotted before its entries are visited, so `visit` sees a
    /// consistent view of each shard and may freely read or write the map. Once `visit`
    /// returns `false`, no further entries or shards are visited.
    pub fn for_each<F: FnMut(&Entry<V>) -> bool>(&self, mut visit: F) {
        for shard in self.shards.iter() {
            if shard.is_empty() {
                continue;
            }

            for entry in &shard.snapshot() {
                if !visit(entry) {
                    tracing::event!(LogLevel::TRACE, key = entry.key(), "stopped iteration early");
                    return;
                }
            }
        }
    }

    /// Copy out every entry in ascending key order, one shard snapshot at a time.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Entry<V>> {
        let mut entries = Vec::with_capacity(self.len());
        for shard in self.shards.iter() {
            if !shard.is_empty() {
                entries.extend(shard.snapshot());
            }
        }
        entries
    }

    /// Return up to `count` entries in ascending key order, starting from the entry with rank
    /// `start_rank` (the 0-based position in the whole map's key order).
    ///
    /// The result has `min(count, len - start_rank)` entries, and is empty if `start_rank` is
    /// negative or at least [`len`], or if `count` is not positive.
    ///
    /// Shards which lie entirely before `start_rank` are skipped by their length alone, without
    /// being locked or copied.
    ///
    /// [`len`]: ShardedSkiplist::len
    #[must_use]
    pub fn sub(&self, start_rank: isize, count: isize) -> Vec<Entry<V>> {
        let (Ok(start_rank), Ok(count)) = (usize::try_from(start_rank), usize::try_from(count))
        else {
            return Vec::new();
        };

        let total_len = self.len();
        if count == 0 || start_rank >= total_len {
            return Vec::new();
        }

        let mut to_skip = start_rank;
        let mut to_take = count.min(total_len - start_rank);
        let mut entries = Vec::with_capacity(to_take);

        for shard in self.shards.iter() {
            if to_take == 0 {
                break;
            }

            let shard_len = shard.len();
            if shard_len <= to_skip {
                to_skip -= shard_len;
                continue;
            }

            let (slice, locked_len) = shard.snapshot_slice(to_skip, to_take);
            // The shard may have shrunk since `shard_len` was read.
            to_skip = to_skip.saturating_sub(locked_len);
            to_take -= slice.len();
            entries.extend(slice);
        }

        entries
    }
}

impl<V> Debug for ShardedSkiplist<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ShardedSkiplist")
            .field("max_level", &self.max_level)
            .field("len",       &self.len())
            .finish_non_exhaustive()
    }
}
