use thiserror::Error;


pub type Result<T> = std::result::Result<T, Error>;


/// Errors which can occur while constructing a [`ShardedSkiplist`].
///
/// Per-key operations never fail; absent keys, rejected values, and out-of-range rank queries
/// are reported through their return values instead.
///
/// [`ShardedSkiplist`]: crate::ShardedSkiplist
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The requested maximum node level was outside `1..=32`.
    #[error("max level must be in the range 1..=32, but {max_level} was requested")]
    InvalidMaxLevel {
        max_level: usize,
    },
    /// The OS entropy source could not provide a seed for node level generation.
    #[error("could not seed node level generation from OS entropy: {0}")]
    Entropy(#[from] getrandom::Error),
}
