//! Chain - the insertion-ordered sequence threaded through the arena.
//!
//! Implements a doubly-linked list using arena indices for O(1)
//! append and removal from any position, and O(n) ordinal walks.

use std::borrow::Borrow;

use crate::arena::{Arena, ArenaIndex, NULL_INDEX};

/// First/last/count bookkeeping for one sequence of nodes.
///
/// The chain never owns node storage; it only rewires the `prev`/`next`
/// links of nodes living in the arena passed to each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chain {
    /// Index of the oldest entry
    pub head: ArenaIndex,
    /// Index of the newest entry
    pub tail: ArenaIndex,
    /// Number of linked nodes
    pub count: u32,
}

impl Chain {
    /// Create a new empty chain
    #[inline]
    pub const fn new() -> Self {
        Self {
            head: NULL_INDEX,
            tail: NULL_INDEX,
            count: 0,
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Append a node after the current tail.
    ///
    /// # Complexity
    /// O(1)
    #[inline]
    pub fn push_back<K, V>(&mut self, arena: &mut Arena<K, V>, index: ArenaIndex) {
        if self.tail == NULL_INDEX {
            // Empty chain: new node becomes both head and tail
            debug_assert!(self.head == NULL_INDEX && self.count == 0);
            self.head = index;
            self.tail = index;
            let node = arena.get_mut(index);
            node.prev = NULL_INDEX;
            node.next = NULL_INDEX;
        } else {
            arena.get_mut(self.tail).next = index;
            let node = arena.get_mut(index);
            node.prev = self.tail;
            node.next = NULL_INDEX;
            self.tail = index;
        }

        self.count += 1;
    }

    /// Unlink a node from anywhere in the chain.
    ///
    /// Handles all edge cases:
    /// - Only node (head == tail)
    /// - Removing head
    /// - Removing tail
    /// - Removing from middle
    ///
    /// # Returns
    /// `true` if the chain is now empty, `false` otherwise.
    /// The node is NOT freed from the arena; caller must do that.
    ///
    /// # Complexity
    /// O(1)
    #[inline]
    pub fn remove<K, V>(&mut self, arena: &mut Arena<K, V>, index: ArenaIndex) -> bool {
        let node = arena.get(index);
        let prev_idx = node.prev;
        let next_idx = node.next;

        // Case 1: Only node (head == tail == index)
        if prev_idx == NULL_INDEX && next_idx == NULL_INDEX {
            debug_assert!(self.head == index && self.tail == index);
            self.head = NULL_INDEX;
            self.tail = NULL_INDEX;
        }
        // Case 2: Removing head (prev is NULL, next exists)
        else if prev_idx == NULL_INDEX {
            debug_assert!(self.head == index);
            self.head = next_idx;
            arena.get_mut(next_idx).prev = NULL_INDEX;
        }
        // Case 3: Removing tail (next is NULL, prev exists)
        else if next_idx == NULL_INDEX {
            debug_assert!(self.tail == index);
            self.tail = prev_idx;
            arena.get_mut(prev_idx).next = NULL_INDEX;
        }
        // Case 4: Removing from middle (both prev and next exist)
        else {
            arena.get_mut(prev_idx).next = next_idx;
            arena.get_mut(next_idx).prev = prev_idx;
        }

        self.count -= 1;

        let node = arena.get_mut(index);
        node.prev = NULL_INDEX;
        node.next = NULL_INDEX;

        self.count == 0
    }

    /// Walk `n` steps forward from the head.
    ///
    /// # Returns
    /// Index of the `n`th node, or `NULL_INDEX` if `n >= count`.
    ///
    /// # Complexity
    /// O(n)
    pub fn nth<K, V>(&self, arena: &Arena<K, V>, n: usize) -> ArenaIndex {
        if n >= self.count as usize {
            return NULL_INDEX;
        }
        let mut cursor = self.head;
        for _ in 0..n {
            cursor = arena.get(cursor).next;
        }
        cursor
    }

    /// Scan from head to tail for the first node whose key matches.
    ///
    /// # Complexity
    /// O(n)
    pub fn find<K, V, Q>(&self, arena: &Arena<K, V>, key: &Q) -> ArenaIndex
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        let mut cursor = self.head;
        while cursor != NULL_INDEX {
            let node = arena.get(cursor);
            if node.key.borrow() == key {
                return cursor;
            }
            cursor = node.next;
        }
        NULL_INDEX
    }

    /// Forget every link. Node storage is left to the caller.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Check every structural invariant, panicking on the first violation.
    #[cfg(test)]
    pub fn validate<K, V>(&self, arena: &Arena<K, V>) {
        match self.count {
            0 => {
                assert_eq!(self.head, NULL_INDEX);
                assert_eq!(self.tail, NULL_INDEX);
            }
            1 => {
                assert_eq!(self.head, self.tail);
                assert_ne!(self.head, NULL_INDEX);
            }
            _ => assert_ne!(self.head, self.tail),
        }
        assert_eq!(self.count, arena.allocated());

        // Forward walk visits `count` nodes, backward walk mirrors it
        let mut forward = Vec::new();
        let mut cursor = self.head;
        let mut prev = NULL_INDEX;
        while cursor != NULL_INDEX {
            let node = arena.get(cursor);
            assert_eq!(node.prev, prev, "broken back link at {cursor}");
            forward.push(cursor);
            assert!(forward.len() <= self.count as usize, "cycle in chain");
            prev = cursor;
            cursor = node.next;
        }
        assert_eq!(forward.len(), self.count as usize);
        assert_eq!(prev, self.tail);

        let mut backward = Vec::new();
        let mut cursor = self.tail;
        while cursor != NULL_INDEX {
            backward.push(cursor);
            cursor = arena.get(cursor).prev;
        }
        backward.reverse();
        assert_eq!(forward, backward);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_arena_with_nodes(arena: &mut Arena<u64, u64>, count: u64) -> Vec<ArenaIndex> {
        (0..count).map(|i| arena.alloc(i, i * 100)).collect()
    }

    #[test]
    fn test_empty_chain() {
        let chain = Chain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.count, 0);
        assert_eq!(chain.head, NULL_INDEX);
        assert_eq!(chain.tail, NULL_INDEX);
    }

    #[test]
    fn test_push_single() {
        let mut arena = Arena::new();
        let mut chain = Chain::new();

        let idx = arena.alloc(1u64, 100u64);
        chain.push_back(&mut arena, idx);

        assert!(!chain.is_empty());
        assert_eq!(chain.count, 1);
        assert_eq!(chain.head, idx);
        assert_eq!(chain.tail, idx);
        chain.validate(&arena);
    }

    #[test]
    fn test_push_multiple_in_order() {
        let mut arena = Arena::new();
        let mut chain = Chain::new();
        let indices = setup_arena_with_nodes(&mut arena, 3);

        for &idx in &indices {
            chain.push_back(&mut arena, idx);
        }

        assert_eq!(chain.count, 3);
        assert_eq!(chain.head, indices[0]);
        assert_eq!(chain.tail, indices[2]);

        // Verify linkage
        assert_eq!(arena.get(indices[0]).next, indices[1]);
        assert_eq!(arena.get(indices[1]).prev, indices[0]);
        assert_eq!(arena.get(indices[1]).next, indices[2]);
        assert_eq!(arena.get(indices[2]).prev, indices[1]);
        chain.validate(&arena);
    }

    #[test]
    fn test_remove_only_node() {
        let mut arena = Arena::new();
        let mut chain = Chain::new();

        let idx = arena.alloc(1u64, 100u64);
        chain.push_back(&mut arena, idx);

        let is_empty = chain.remove(&mut arena, idx);

        assert!(is_empty);
        assert!(chain.is_empty());
        assert_eq!(chain.head, NULL_INDEX);
        assert_eq!(chain.tail, NULL_INDEX);
    }

    #[test]
    fn test_remove_head() {
        let mut arena = Arena::new();
        let mut chain = Chain::new();
        let indices = setup_arena_with_nodes(&mut arena, 3);

        for &idx in &indices {
            chain.push_back(&mut arena, idx);
        }

        let is_empty = chain.remove(&mut arena, indices[0]);
        arena.free(indices[0]);

        assert!(!is_empty);
        assert_eq!(chain.count, 2);
        assert_eq!(chain.head, indices[1]);
        assert_eq!(arena.get(indices[1]).prev, NULL_INDEX);
        chain.validate(&arena);
    }

    #[test]
    fn test_remove_tail() {
        let mut arena = Arena::new();
        let mut chain = Chain::new();
        let indices = setup_arena_with_nodes(&mut arena, 3);

        for &idx in &indices {
            chain.push_back(&mut arena, idx);
        }

        let is_empty = chain.remove(&mut arena, indices[2]);
        arena.free(indices[2]);

        assert!(!is_empty);
        assert_eq!(chain.count, 2);
        assert_eq!(chain.tail, indices[1]);
        assert_eq!(arena.get(indices[1]).next, NULL_INDEX);
        chain.validate(&arena);
    }

    #[test]
    fn test_remove_middle() {
        let mut arena = Arena::new();
        let mut chain = Chain::new();
        let indices = setup_arena_with_nodes(&mut arena, 3);

        for &idx in &indices {
            chain.push_back(&mut arena, idx);
        }

        let is_empty = chain.remove(&mut arena, indices[1]);
        arena.free(indices[1]);

        assert!(!is_empty);
        assert_eq!(chain.count, 2);
        assert_eq!(arena.get(indices[0]).next, indices[2]);
        assert_eq!(arena.get(indices[2]).prev, indices[0]);
        chain.validate(&arena);
    }

    #[test]
    fn test_remove_down_to_one() {
        let mut arena = Arena::new();
        let mut chain = Chain::new();
        let indices = setup_arena_with_nodes(&mut arena, 4);

        for &idx in &indices {
            chain.push_back(&mut arena, idx);
        }
        for &idx in &[indices[1], indices[3], indices[0]] {
            chain.remove(&mut arena, idx);
            arena.free(idx);
        }

        assert_eq!(chain.head, indices[2]);
        assert_eq!(chain.tail, indices[2]);
        chain.validate(&arena);
    }

    #[test]
    fn test_nth() {
        let mut arena = Arena::new();
        let mut chain = Chain::new();
        let indices = setup_arena_with_nodes(&mut arena, 5);

        for &idx in indices.iter().rev() {
            chain.push_back(&mut arena, idx);
        }

        assert_eq!(chain.nth(&arena, 0), indices[4]);
        assert_eq!(chain.nth(&arena, 4), indices[0]);
        assert_eq!(chain.nth(&arena, 5), NULL_INDEX);
    }

    #[test]
    fn test_find() {
        let mut arena = Arena::new();
        let mut chain = Chain::new();
        let indices = setup_arena_with_nodes(&mut arena, 3);

        for &idx in &indices {
            chain.push_back(&mut arena, idx);
        }

        assert_eq!(chain.find(&arena, &1), indices[1]);
        assert_eq!(chain.find(&arena, &7), NULL_INDEX);
    }
}
