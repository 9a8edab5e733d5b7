use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::atomic::Ordering;

use oorandom::Rand32;
use slab::Slab;

use crate::{config_constants::MAX_LEVEL, entry::Entry, node_heights::random_level};
use crate::maybe_loom::{AtomicUsize, RwLock, RwLockReadGuard, RwLockWriteGuard};
use super::node::{Link, Node, NodeId, Position};


/// The last position strictly before some key on each level, from the top level down.
///
/// Only the first `max_level` positions are meaningful.
type Trace = [Position; MAX_LEVEL];


// ================================
//  Locked state
// ================================

/// Everything in a shard which is protected by its lock.
struct ShardState<V> {
    /// Nodes are stored in an arena and refer to each other by index.
    ///
    /// Invariant: every `NodeId` reachable from `head` refers to an occupied slot of `nodes`,
    /// and every occupied slot is reachable from `head` on level `0`.
    nodes: Slab<Node<V>>,
    /// The forward pointers of the head sentinel; there are exactly `max_level` of them.
    head:  Box<[Link]>,
    /// Only used while the state is write-locked.
    prng:  Rand32,
}

impl<V> ShardState<V> {
    #[must_use]
    fn new(max_level: usize, prng: Rand32) -> Self {
        Self {
            nodes: Slab::new(),
            head:  vec![None; max_level].into_boxed_slice(),
            prng,
        }
    }

    #[allow(clippy::indexing_slicing, reason = "links only ever refer to live nodes")]
    #[inline]
    #[must_use]
    fn node(&self, id: NodeId) -> &Node<V> {
        &self.nodes[id.0]
    }

    #[allow(clippy::indexing_slicing, reason = "links only ever refer to live nodes")]
    #[inline]
    #[must_use]
    fn node_mut(&mut self, id: NodeId) -> &mut Node<V> {
        &mut self.nodes[id.0]
    }

    #[must_use]
    fn next(&self, position: Position, level: usize) -> Link {
        match position {
            Position::Head     => self.head.get(level).copied().flatten(),
            Position::Node(id) => self.node(id).next(level),
        }
    }

    fn set_next(&mut self, position: Position, level: usize, link: Link) {
        match position {
            Position::Head => {
                if let Some(slot) = self.head.get_mut(level) {
                    *slot = link;
                }
            }
            Position::Node(id) => self.node_mut(id).set_next(level, link),
        }
    }

    /// Walk from the top level down, recording on each level the last position whose key is
    /// strictly less than `key`.
    ///
    /// The returned `Link` is the first node whose key is greater than or equal to `key`, if
    /// there is such a node. That node has the target key iff the key is in the shard.
    #[must_use]
    fn locate(&self, key: u64) -> (Trace, Link) {
        let mut trace = [Position::Head; MAX_LEVEL];
        let mut current = Position::Head;

        for level in (0..self.head.len()).rev() {
            while let Some(next) = self.next(current, level) {
                if self.node(next).key() < key {
                    current = Position::Node(next);
                } else {
                    break;
                }
            }

            if let Some(predecessor) = trace.get_mut(level) {
                *predecessor = current;
            }
        }

        (trace, self.next(current, 0))
    }

    #[must_use]
    fn find(&self, key: u64) -> Option<NodeId> {
        let (_, candidate) = self.locate(key);
        candidate.filter(|&id| self.node(id).key() == key)
    }

    /// Iterate over every node in ascending key order.
    #[must_use]
    fn chain(&self) -> Chain<'_, V> {
        Chain {
            state: self,
            link:  self.next(Position::Head, 0),
        }
    }
}

/// Follows the bottom level of a shard from the head to the tail.
struct Chain<'a, V> {
    state: &'a ShardState<V>,
    link:  Link,
}

impl<'a, V> Iterator for Chain<'a, V> {
    type Item = &'a Node<V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.state.node(self.link?);
        self.link = node.next(0);
        Some(node)
    }
}


// ================================
//  Shard
// ================================

/// One independently locked skiplist, owning one band of the key space.
///
/// Searches and snapshots take the lock in shared mode. Insertions and deletions hold the lock
/// exclusively across both the search for predecessors and the relinking, so the recorded
/// predecessors cannot be invalidated by another writer in between.
// Keep adjacent shards' locks and counts off of each other's cache lines.
#[repr(align(128))]
pub(crate) struct ShardSkiplist<V> {
    max_level: usize,
    /// The number of nodes in the shard. Only changed while `state` is write-locked, but may be
    /// read without the lock.
    len:       AtomicUsize,
    state:     RwLock<ShardState<V>>,
}

#[expect(unreachable_pub, reason = "control visibility at type definition")]
impl<V> ShardSkiplist<V> {
    /// `max_level` must be in `1..=MAX_LEVEL`.
    #[must_use]
    pub fn new(max_level: usize, prng: Rand32) -> Self {
        debug_assert!(
            (1..=MAX_LEVEL).contains(&max_level),
            "max level should be validated before creating shards",
        );

        Self {
            max_level,
            len:   AtomicUsize::new(0),
            state: RwLock::new(ShardState::new(max_level, prng)),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn read(&self) -> RwLockReadGuard<'_, ShardState<V>> {
        self.state.read()
    }

    #[inline]
    fn write(&self) -> RwLockWriteGuard<'_, ShardState<V>> {
        self.state.write()
    }

    /// If `key` is in the shard, call `f` on its value while the shard is read-locked.
    ///
    /// `f` must not access this shard. A write always deadlocks, and a nested read deadlocks
    /// once a writer is queued on the lock.
    pub fn search_with<R, F: FnOnce(&V) -> R>(&self, key: u64, f: F) -> Option<R> {
        let state = self.read();
        state.find(key).map(|id| f(state.node(id).value()))
    }

    /// Insert `key`, or overwrite its value if it is already present.
    ///
    /// Returns the previous value, if there was one. An overwrite leaves the node's level and
    /// links untouched.
    #[expect(clippy::indexing_slicing, reason = "levels are below `max_level <= MAX_LEVEL`")]
    pub fn insert(&self, key: u64, value: V) -> Option<V> {
        let mut state = self.write();
        let (trace, candidate) = state.locate(key);

        if let Some(id) = candidate.filter(|&id| state.node(id).key() == key) {
            return Some(state.node_mut(id).replace_value(value));
        }

        let level = random_level(&mut state.prng, self.max_level);
        let id = NodeId(state.nodes.insert(Node::new(key, value, level)));

        for level in (0..level).rev() {
            let predecessor = trace[level];
            let next = state.next(predecessor, level);
            // Point the new node at its successor before linking it in.
            state.node_mut(id).set_next(level, next);
            state.set_next(predecessor, level, Some(id));
        }

        self.len.fetch_add(1, Ordering::Release);
        None
    }

    /// Unlink and free the node with `key`, returning its value. Does nothing if `key` is absent.
    #[expect(clippy::indexing_slicing, reason = "levels are below `max_level <= MAX_LEVEL`")]
    pub fn delete(&self, key: u64) -> Option<V> {
        let mut state = self.write();
        let (trace, candidate) = state.locate(key);
        let id = candidate.filter(|&id| state.node(id).key() == key)?;

        for level in 0..state.node(id).level() {
            let next = state.node(id).next(level);
            state.set_next(trace[level], level, next);
        }

        let mut node = state.nodes.remove(id.0);
        node.clear_links();

        self.len.fetch_sub(1, Ordering::Release);
        Some(node.into_value())
    }

    /// Copy out up to `take` entries in ascending key order, starting from the entry at local
    /// position `skip`, all while the shard is read-locked.
    ///
    /// Also returns the number of entries the shard held at that moment.
    #[must_use]
    pub fn snapshot_slice(&self, skip: usize, take: usize) -> (Vec<Entry<V>>, usize)
    where
        V: Clone,
    {
        let state = self.read();
        let entries = state.chain()
            .skip(skip)
            .take(take)
            .map(|node| Entry::new(node.key(), node.value().clone()))
            .collect();

        (entries, state.nodes.len())
    }

    /// Copy out every entry of the shard in ascending key order.
    ///
    /// The copy is a single consistent view of this shard, unaffected by later writes.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Entry<V>>
    where
        V: Clone,
    {
        self.snapshot_slice(0, usize::MAX).0
    }
}

impl<V> Debug for ShardSkiplist<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ShardSkiplist")
            .field("max_level", &self.max_level)
            .field("len",       &self.len())
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
impl<V> ShardSkiplist<V> {
    /// Check the ordering of every level, and that each level holds exactly the nodes which
    /// reach it.
    pub(crate) fn assert_well_formed(&self) {
        let state = self.read();

        let bottom: Vec<u64> = state.chain().map(Node::key).collect();
        assert!(bottom.windows(2).all(|pair| pair[0] < pair[1]), "unordered: {bottom:?}");
        assert_eq!(bottom.len(), state.nodes.len());
        assert_eq!(bottom.len(), self.len());

        for level in 1..self.max_level {
            let mut expected: Vec<u64> = state.nodes.iter()
                .filter(|(_, node)| node.level() > level)
                .map(|(_, node)| node.key())
                .collect();
            expected.sort_unstable();

            let mut actual = Vec::new();
            let mut link = state.next(Position::Head, level);
            while let Some(id) = link {
                actual.push(state.node(id).key());
                link = state.node(id).next(level);
            }

            assert_eq!(actual, expected, "level {level} is malformed");
        }

        assert!(state.nodes.iter().all(|(_, node)| node.level() <= self.max_level));
    }
}
