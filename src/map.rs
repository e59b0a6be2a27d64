//! Ordered Map - the insertion-ordered key/value container.
//!
//! Entries live in an [`Arena`] and are threaded in insertion order by a
//! [`Chain`]. Lookup by key is a linear scan; there is no hash index.

use std::borrow::Borrow;
use std::fmt;
use std::iter::FusedIterator;

use crate::arena::{Arena, ArenaIndex, NULL_INDEX};
use crate::chain::Chain;

/// A map of unique keys to values that remembers insertion order.
///
/// Keys only need `PartialEq`. Updating a value never moves its entry;
/// erasing an entry closes the gap and keeps everything else in order.
///
/// # Examples
///
/// ```
/// use chain_map::OrderedMap;
///
/// let mut map = OrderedMap::new();
/// assert!(map.insert("a", 1));
/// assert!(map.insert("b", 2));
/// assert!(!map.insert("a", 10));
///
/// assert!(map.update(&"a", 3));
/// assert_eq!(map.get_index(0), Some((&"a", &3)));
/// assert_eq!(map.len(), 2);
/// ```
pub struct OrderedMap<K, V> {
    arena: Arena<K, V>,
    chain: Chain,
}

impl<K, V> OrderedMap<K, V> {
    /// Create a new empty map
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            chain: Chain::new(),
        }
    }

    /// Create a new map with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            chain: Chain::new(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Number of key/value pairs in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.chain.count as usize
    }

    /// The pair at ordinal position `index`, counting from the oldest entry.
    ///
    /// # Complexity
    /// O(index)
    pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
        let idx = self.chain.nth(&self.arena, index);
        if idx == NULL_INDEX {
            return None;
        }
        let node = self.arena.get(idx);
        Some((&node.key, &node.value))
    }

    /// Exchange the entire contents of two maps.
    ///
    /// # Complexity
    /// O(1), no allocation
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.chain.reset();
    }

    /// Iterate over entries from oldest to newest.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            arena: &self.arena,
            front: self.chain.head,
            back: self.chain.tail,
            remaining: self.len(),
        }
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Append a node for a key known to be absent.
    #[inline]
    fn push(&mut self, key: K, value: V) -> ArenaIndex {
        let idx = self.arena.alloc(key, value);
        self.chain.push_back(&mut self.arena, idx);
        debug_assert_eq!(self.arena.allocated(), self.chain.count);
        idx
    }

    #[cfg(test)]
    pub(crate) fn validate(&self) {
        self.chain.validate(&self.arena);
    }

    #[cfg(test)]
    pub(crate) fn arena(&self) -> &Arena<K, V> {
        &self.arena
    }
}

/// Lookups accept any borrowed form of the key, so an
/// `OrderedMap<String, _>` can be queried with a `&str`.
impl<K: PartialEq, V> OrderedMap<K, V> {
    #[inline]
    fn find<Q>(&self, key: &Q) -> ArenaIndex
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.chain.find(&self.arena, key)
    }

    /// Append `key` → `value` unless `key` is already present.
    ///
    /// Returns `false`, leaving the map untouched, on a duplicate key.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if self.find(&key) != NULL_INDEX {
            return false;
        }
        self.push(key, value);
        true
    }

    /// Replace the value of an existing key in place.
    ///
    /// Returns `false` if the key is absent; nothing is allocated.
    pub fn update<Q>(&mut self, key: &Q, value: V) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        let idx = self.find(key);
        if idx == NULL_INDEX {
            return false;
        }
        self.arena.get_mut(idx).value = value;
        true
    }

    /// Update the key if present, append it otherwise.
    ///
    /// Always returns `true`.
    pub fn insert_or_update(&mut self, key: K, value: V) -> bool {
        let idx = self.find(&key);
        if idx == NULL_INDEX {
            self.push(key, value);
        } else {
            self.arena.get_mut(idx).value = value;
        }
        true
    }

    /// Remove the entry for `key`, dropping its key and value.
    ///
    /// Returns `false` if the key is absent.
    pub fn erase<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        let idx = self.find(key);
        if idx == NULL_INDEX {
            return false;
        }
        self.chain.remove(&mut self.arena, idx);
        self.arena.free(idx);
        debug_assert_eq!(self.arena.allocated(), self.chain.count);
        true
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.find(key) != NULL_INDEX
    }

    /// The value stored for `key`, if any.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        let idx = self.find(key);
        if idx == NULL_INDEX {
            return None;
        }
        Some(&self.arena.get(idx).value)
    }
}

impl<K: Clone, V: Clone> Clone for OrderedMap<K, V> {
    /// Rebuilds the source's sequence from fresh nodes, so the clone's
    /// arena has no free slots.
    fn clone(&self) -> Self {
        let mut map = Self::with_capacity(self.len());
        for (key, value) in self {
            map.push(key.clone(), value.clone());
        }
        map
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        for (key, value) in source {
            self.push(key.clone(), value.clone());
        }
    }
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Two maps are equal when they hold the same pairs in the same order.
impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for OrderedMap<K, V> {}

/// Later duplicates of a key are ignored, as with [`OrderedMap::insert`].
impl<K: PartialEq, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: PartialEq, V> Extend<(K, V)> for OrderedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over an [`OrderedMap`], oldest entry first.
pub struct Iter<'a, K, V> {
    arena: &'a Arena<K, V>,
    front: ArenaIndex,
    back: ArenaIndex,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.arena.get(self.front);
        self.front = node.next;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.arena.get(self.back);
        self.back = node.prev;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}
