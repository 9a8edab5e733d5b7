/// A detached copy of one key/value pair of a [`ShardedSkiplist`].
///
/// Entries are produced by snapshots, so they are unaffected by later writes to the map.
///
/// [`ShardedSkiplist`]: crate::ShardedSkiplist
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry<V> {
    key:   u64,
    value: V,
}

impl<V> Entry<V> {
    #[inline]
    #[must_use]
    pub(crate) const fn new(key: u64, value: V) -> Self {
        Self { key, value }
    }

    #[inline]
    #[must_use]
    pub const fn key(&self) -> u64 {
        self.key
    }

    #[inline]
    #[must_use]
    pub const fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (u64, V) {
        (self.key, self.value)
    }
}

impl<V> From<Entry<V>> for (u64, V) {
    #[inline]
    fn from(entry: Entry<V>) -> Self {
        entry.into_parts()
    }
}
