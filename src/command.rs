//! Command and Event types for the map engine.
//!
//! Commands are operations to apply to a map.
//! Events describe the outcome of each command.

// ============================================================================
// Input Commands
// ============================================================================

/// One operation against an [`OrderedMap`](crate::OrderedMap)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command<K, V> {
    /// Append a new key; rejected on duplicates
    Insert { key: K, value: V },
    /// Replace the value of an existing key
    Update { key: K, value: V },
    /// Update if present, append otherwise
    InsertOrUpdate { key: K, value: V },
    /// Remove a key
    Erase { key: K },
    /// Look up a value by key
    Get { key: K },
    /// Look up the pair at an ordinal position
    GetIndex { index: usize },
    /// Remove every entry
    Clear,
}

impl<K, V> Command<K, V> {
    /// Short lowercase name, matching the op-log spelling
    pub const fn name(&self) -> &'static str {
        match self {
            Command::Insert { .. } => "insert",
            Command::Update { .. } => "update",
            Command::InsertOrUpdate { .. } => "upsert",
            Command::Erase { .. } => "erase",
            Command::Get { .. } => "get",
            Command::GetIndex { .. } => "get_index",
            Command::Clear => "clear",
        }
    }
}

// ============================================================================
// Output Events
// ============================================================================

/// Reasons a command could not be applied
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RejectReason {
    /// Key already present (insert)
    DuplicateKey = 0,
    /// Key absent (update/erase/get)
    KeyNotFound = 1,
    /// Ordinal index not below the map's length
    IndexOutOfRange = 2,
}

/// Outcome of a single command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputEvent<K, V> {
    /// A new entry was appended at ordinal position `index`
    Inserted { index: usize },
    /// An existing entry's value was replaced
    Updated,
    /// An entry was removed
    Erased,
    /// Key lookup hit
    Found { value: V },
    /// Ordinal lookup hit
    FoundAt { key: K, value: V },
    /// The map was emptied
    Cleared { released: usize },
    /// Nothing changed
    Rejected { reason: RejectReason },
}

impl<K, V> OutputEvent<K, V> {
    #[inline]
    pub fn is_rejected(&self) -> bool {
        matches!(self, OutputEvent::Rejected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names() {
        let insert: Command<u64, u64> = Command::Insert { key: 1, value: 2 };
        let upsert: Command<u64, u64> = Command::InsertOrUpdate { key: 1, value: 2 };
        assert_eq!(insert.name(), "insert");
        assert_eq!(upsert.name(), "upsert");
        assert_eq!(Command::<u64, u64>::GetIndex { index: 0 }.name(), "get_index");
        assert_eq!(Command::<u64, u64>::Clear.name(), "clear");
    }

    #[test]
    fn test_is_rejected() {
        let rejected: OutputEvent<u64, u64> = OutputEvent::Rejected {
            reason: RejectReason::KeyNotFound,
        };
        let erased: OutputEvent<u64, u64> = OutputEvent::Erased;
        assert!(rejected.is_rejected());
        assert!(!erased.is_rejected());
    }
}
