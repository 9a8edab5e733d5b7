//! A sharded, lock-protected [skiplist] map keyed by `u64`.
//!
//! The `u64` key space is split into [`NUM_SHARDS`] contiguous bands of equal width, and each
//! band is owned by an independent skiplist guarded by its own reader/writer lock. Operations
//! on keys in different bands never block each other. Because the bands are ascending and
//! contiguous, concatenating the shards in index order yields the whole map in ascending key
//! order, which is what [`ShardedSkiplist::for_each`] and the rank-based
//! [`ShardedSkiplist::sub`] rely on.
//!
//! Whole-structure operations ([`len`], [`for_each`], [`sub`], [`snapshot`]) visit one shard
//! at a time and are therefore not atomic with respect to concurrent writers.
//!
//! [skiplist]: https://en.wikipedia.org/wiki/Skip_list
//! [`len`]: ShardedSkiplist::len
//! [`for_each`]: ShardedSkiplist::for_each
//! [`sub`]: ShardedSkiplist::sub
//! [`snapshot`]: ShardedSkiplist::snapshot

// `parking_lot` is swapped out for `loom`'s locks in loom builds.
#[cfg(shardmap_loom)]
use parking_lot as _;
// Only used by integration tests and benchmarks.
#[cfg(test)]
use criterion as _;
#[cfg(test)]
use proptest as _;

mod config_constants;
mod entry;
mod error;
mod hash;
mod maybe_loom;
mod node_heights;
mod partition;
mod shard;
mod sharded;
mod value;


pub use self::{
    config_constants::{DEFAULT_MAX_LEVEL, MAX_LEVEL, NUM_SHARDS},
    entry::Entry,
    error::{Error, Result},
    hash::hash,
    node_heights::recommended_max_level,
    partition::{PARTITION_TABLE, PartitionTable, shard_of},
    sharded::ShardedSkiplist,
    value::MapValue,
};
