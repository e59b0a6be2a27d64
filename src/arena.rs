//! Arena Allocator - growable slab of list nodes addressed by `u32` indices.
//!
//! Nodes never move once allocated, so an index stays valid until the node
//! is freed. Freed slots are threaded into a free list and handed out again
//! by the next allocation, giving O(1) allocation and deallocation.

/// Sentinel value representing a null/invalid index (like nullptr)
pub const NULL_INDEX: u32 = u32::MAX;

/// Type alias for arena indices - our "compressed pointers"
pub type ArenaIndex = u32;

/// A single key/value entry together with its sequence links.
pub struct Node<K, V> {
    /// Immutable once stored
    pub key: K,
    pub value: V,
    /// Index of the next node in sequence
    pub next: ArenaIndex,
    /// Index of the previous node in sequence
    pub prev: ArenaIndex,
}

impl<K, V> Node<K, V> {
    /// Create an unlinked node
    #[inline]
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            next: NULL_INDEX,
            prev: NULL_INDEX,
        }
    }
}

enum Slot<K, V> {
    Free { next_free: ArenaIndex },
    Occupied(Node<K, V>),
}

#[cold]
#[inline(never)]
fn assert_occupied(index: ArenaIndex) -> ! {
    panic!("arena slot {index} is free");
}

/// Memory pool of nodes with O(1) allocation and deallocation.
///
/// Unlike a fixed pool this arena grows on demand; the only hard limit is
/// the index space (`NULL_INDEX` is reserved).
pub struct Arena<K, V> {
    slots: Vec<Slot<K, V>>,

    /// Head of the free list (index of first reusable slot)
    free_head: ArenaIndex,

    /// Number of currently allocated nodes
    allocated_count: u32,
}

impl<K, V> Arena<K, V> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty arena with room for `capacity` nodes before it
    /// reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: NULL_INDEX,
            allocated_count: 0,
        }
    }

    /// Allocate an unlinked node holding `key` and `value`.
    ///
    /// Reuses the most recently freed slot if there is one.
    ///
    /// # Panics
    /// Panics if the arena already holds `u32::MAX` slots.
    ///
    /// # Complexity
    /// O(1) amortized
    #[inline]
    pub fn alloc(&mut self, key: K, value: V) -> ArenaIndex {
        let node = Node::new(key, value);
        let index = if self.free_head != NULL_INDEX {
            let index = self.free_head;
            let old = std::mem::replace(&mut self.slots[index as usize], Slot::Occupied(node));
            self.free_head = match old {
                Slot::Free { next_free } => next_free,
                Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
            };
            index
        } else {
            assert!(
                self.slots.len() < NULL_INDEX as usize,
                "arena index space exhausted"
            );
            let index = self.slots.len() as ArenaIndex;
            self.slots.push(Slot::Occupied(node));
            index
        };
        self.allocated_count += 1;
        index
    }

    /// Free a node back to the arena and hand it to the caller.
    ///
    /// The node must already be unlinked from any chain.
    ///
    /// # Panics
    /// Panics if the slot is already free (double free).
    ///
    /// # Complexity
    /// O(1) - pushes to head of free list
    #[inline]
    pub fn free(&mut self, index: ArenaIndex) -> Node<K, V> {
        debug_assert!((index as usize) < self.slots.len(), "Index out of bounds");
        let old = std::mem::replace(
            &mut self.slots[index as usize],
            Slot::Free {
                next_free: self.free_head,
            },
        );
        match old {
            Slot::Occupied(node) => {
                self.free_head = index;
                self.allocated_count -= 1;
                node
            }
            Slot::Free { .. } => assert_occupied(index),
        }
    }

    /// Get an immutable reference to a node.
    ///
    /// # Complexity
    /// O(1) - direct array access
    #[inline]
    pub fn get(&self, index: ArenaIndex) -> &Node<K, V> {
        match &self.slots[index as usize] {
            Slot::Occupied(node) => node,
            Slot::Free { .. } => assert_occupied(index),
        }
    }

    /// Get a mutable reference to a node.
    #[inline]
    pub fn get_mut(&mut self, index: ArenaIndex) -> &mut Node<K, V> {
        match &mut self.slots[index as usize] {
            Slot::Occupied(node) => node,
            Slot::Free { .. } => assert_occupied(index),
        }
    }

    /// Returns true if `index` refers to a live node.
    #[cfg(test)]
    pub fn is_occupied(&self, index: ArenaIndex) -> bool {
        matches!(self.slots.get(index as usize), Some(Slot::Occupied(_)))
    }

    /// Returns the number of currently allocated nodes.
    #[inline]
    pub fn allocated(&self) -> u32 {
        self.allocated_count
    }

    /// Returns the number of slots, live or free.
    #[cfg(test)]
    pub fn slots(&self) -> usize {
        self.slots.len()
    }

    /// Drop every node and forget the free list.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = NULL_INDEX;
        self.allocated_count = 0;
    }
}
