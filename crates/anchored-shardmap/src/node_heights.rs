use oorandom::Rand32;

use crate::config_constants::{LEVEL_UP_ODDS, MAX_LEVEL};


/// A simple PRNG trait, used for generating random levels for nodes in a skiplist.
pub(crate) trait Prng32 {
    /// Produces a random `u32` in the range `[0, u32::MAX]`.
    ///
    /// (See [`oorandom::Rand32::rand_u32`]; this function is the same interface.)
    #[must_use]
    fn rand_u32(&mut self) -> u32;
}

impl Prng32 for Rand32 {
    #[inline]
    fn rand_u32(&mut self) -> u32 {
        // Inherent impls take priority over traits, so this is the inherent method
        // of `Rand32` a.k.a. `Self`
        Self::rand_u32(self)
    }
}

/// Create the level generator of the shard with index `shard`.
///
/// Every shard uses a distinct PCG stream of the same seed, so shards do not draw identical
/// level sequences.
#[must_use]
pub(crate) fn shard_prng(seed: u64, shard: usize) -> Rand32 {
    #[expect(clippy::as_conversions, reason = "shard indices are far below `u64::MAX`")]
    let stream = shard as u64;
    Rand32::new_inc(seed, stream)
}

/// Return a random value in `1..=max_level`, in a geometric distribution: each level above `1`
/// is reached with probability `1/4` of the level below it.
///
/// Technically, `max_level` is `4/3` more likely than it would be in an exact and unbounded
/// geometric distribution, since what would be higher values are capped to `max_level`.
pub(crate) fn random_level<P: Prng32>(prng: &mut P, max_level: usize) -> usize {
    let mut level = 1;
    while level < max_level && prng.rand_u32() % LEVEL_UP_ODDS == 0 {
        level += 1;
    }
    level
}

/// Suggest a `max_level` for a map expected to hold about `expected_len` entries.
///
/// With a level-up probability of `p = 1/4`, a skiplist of `N` entries is best served by about
/// `log_{1/p}(N)` levels; for example, `10_000_000` entries suggest a level of `12`. The result
/// is clamped to `1..=32`.
#[must_use]
pub fn recommended_max_level(expected_len: u64) -> usize {
    let odds = u64::from(LEVEL_UP_ODDS);
    let mut level = 1;
    let mut capacity = odds;

    while capacity < expected_len && level < MAX_LEVEL {
        level += 1;
        capacity = capacity.saturating_mul(odds);
    }

    level
}
