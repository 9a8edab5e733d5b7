use xxhash_rust::xxh64::xxh64;


/// The seed of the XXH64 digest computed by [`hash`]. With a seed of zero, the result is the
/// canonical XXH64 digest of the input.
const HASH_SEED: u64 = 0;

/// Hash arbitrary bytes into the `u64` key space with XXH64.
///
/// The map never calls this itself; it's provided for callers that need to derive keys from
/// arbitrary identifiers. The output is uniformly distributed, so hashed keys spread evenly
/// across shards.
///
/// This is not a cryptographic hash.
#[inline]
#[must_use]
pub fn hash(input: &[u8]) -> u64 {
    xxh64(input, HASH_SEED)
}
