/// The number of independently locked shards which partition the `u64` key space.
pub const NUM_SHARDS: usize = 32;
/// The greatest `max_level` accepted by [`ShardedSkiplist`] constructors. The least is `1`.
///
/// [`ShardedSkiplist`]: crate::ShardedSkiplist
pub const MAX_LEVEL: usize = 32;
/// The `max_level` used by [`ShardedSkiplist::default`].
///
/// With the level distribution used by this crate, a level of `12` keeps searches
/// logarithmic for roughly 16 million entries.
///
/// [`ShardedSkiplist::default`]: crate::ShardedSkiplist
pub const DEFAULT_MAX_LEVEL: usize = 12;

/// A node's level is raised with probability `1 / LEVEL_UP_ODDS` at each step.
///
/// `4` uses less memory than `2`, and is what Redis and Google's LevelDB use.
pub(crate) const LEVEL_UP_ODDS: u32 = 4;

#[expect(clippy::as_conversions, reason = "`From` conversions do not yet work in const")]
pub(crate) const NUM_SHARDS_U64: u64 = NUM_SHARDS as u64;
