use std::mem;


/// The index of a node in its shard's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct NodeId(pub usize);

/// A forward pointer. `None` is the tail sentinel, which sorts after every key.
pub(super) type Link = Option<NodeId>;

/// A place in a shard from which forward pointers can be followed: either the head sentinel,
/// which sorts before every key, or a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Position {
    Head,
    Node(NodeId),
}


/// One stored key/value pair of a shard.
///
/// The level of a node (the number of its forward pointers) is fixed at creation.
/// Besides the forward pointers, only the value is ever mutated.
#[derive(Debug)]
pub(super) struct Node<V> {
    key:     u64,
    value:   V,
    /// `forward[level]` is the next node whose level is greater than `level`.
    forward: Box<[Link]>,
}

#[expect(unreachable_pub, reason = "control Node's visibility from one site, its definition")]
impl<V> Node<V> {
    /// Create an unlinked node with `level` forward pointers, all pointing at the tail.
    #[must_use]
    pub fn new(key: u64, value: V, level: usize) -> Self {
        debug_assert!(level >= 1, "a node must be linked into at least the bottom level");

        Self {
            key,
            value,
            forward: vec![None; level].into_boxed_slice(),
        }
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
    pub fn into_value(self) -> V {
        self.value
    }

    /// Overwrite the value in place, returning the previous value.
    #[inline]
    pub fn replace_value(&mut self, value: V) -> V {
        mem::replace(&mut self.value, value)
    }

    #[inline]
    #[must_use]
    pub fn level(&self) -> usize {
        self.forward.len()
    }

    /// The node after this one on `level`. Levels this node does not reach yield `None`.
    #[inline]
    #[must_use]
    pub fn next(&self, level: usize) -> Link {
        self.forward.get(level).copied().flatten()
    }

    /// # Panics
    /// May or may not panic if `level >= self.level()`.
    #[inline]
    pub fn set_next(&mut self, level: usize, link: Link) {
        debug_assert!(level < self.level(), "should not try to set a nonexistent link of a node");

        if let Some(slot) = self.forward.get_mut(level) {
            *slot = link;
        }
    }

    /// Point every forward pointer at the tail.
    #[inline]
    pub fn clear_links(&mut self) {
        self.forward.fill(None);
    }
}
