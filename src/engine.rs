//! Engine - applies a stream of commands to a single map.
//!
//! The map has no internal synchronisation, so the engine is the single
//! owner that serialises every access. With the `runtime` feature it can
//! run as a busy loop fed through rtrb ring buffers.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;
use tracing::{debug, trace};

use crate::command::{Command, OutputEvent, RejectReason};
use crate::map::OrderedMap;

/// Single-writer driver around an [`OrderedMap`].
pub struct Engine<K, V> {
    /// The map all commands are applied to
    pub map: OrderedMap<K, V>,
    /// Commands processed so far, rejected ones included
    processed: u64,
}

impl<K, V> Engine<K, V> {
    /// Create an engine over an empty map.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an engine whose map has room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: OrderedMap::with_capacity(capacity),
            processed: 0,
        }
    }

    /// Number of entries in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Pin the current thread to the last available CPU core.
    ///
    /// The last core is typically isolated from OS interrupts.
    pub fn pin_to_core(&self) -> bool {
        match core_affinity::get_core_ids().and_then(|ids| ids.last().copied()) {
            Some(core) => core_affinity::set_for_current(core),
            None => false,
        }
    }

    /// Compute a hash of the current contents (for determinism testing).
    ///
    /// Covers the length and every pair in order, so two engines agree
    /// only if their maps hold the same sequence.
    pub fn state_hash(&self) -> u64
    where
        K: Hash,
        V: Hash,
    {
        let mut hasher = FxHasher::default();
        self.map.len().hash(&mut hasher);
        for (key, value) in &self.map {
            key.hash(&mut hasher);
            value.hash(&mut hasher);
        }
        hasher.finish()
    }
}

impl<K, V> Engine<K, V>
where
    K: PartialEq + Clone,
    V: Clone,
{
    /// Apply one command and report what happened.
    ///
    /// This is the main entry point for synchronous usage (testing, benchmarks).
    pub fn process_command(&mut self, cmd: Command<K, V>) -> OutputEvent<K, V> {
        self.processed += 1;
        let op = cmd.name();
        trace!(op, seq = self.processed, "processing command");

        let event = match cmd {
            Command::Insert { key, value } => {
                if self.map.insert(key, value) {
                    OutputEvent::Inserted {
                        index: self.map.len() - 1,
                    }
                } else {
                    reject(RejectReason::DuplicateKey)
                }
            }
            Command::Update { key, value } => {
                if self.map.update(&key, value) {
                    OutputEvent::Updated
                } else {
                    reject(RejectReason::KeyNotFound)
                }
            }
            Command::InsertOrUpdate { key, value } => {
                let existed = self.map.contains_key(&key);
                self.map.insert_or_update(key, value);
                if existed {
                    OutputEvent::Updated
                } else {
                    OutputEvent::Inserted {
                        index: self.map.len() - 1,
                    }
                }
            }
            Command::Erase { key } => {
                if self.map.erase(&key) {
                    OutputEvent::Erased
                } else {
                    reject(RejectReason::KeyNotFound)
                }
            }
            Command::Get { key } => match self.map.get(&key) {
                Some(value) => OutputEvent::Found {
                    value: value.clone(),
                },
                None => reject(RejectReason::KeyNotFound),
            },
            Command::GetIndex { index } => match self.map.get_index(index) {
                Some((key, value)) => OutputEvent::FoundAt {
                    key: key.clone(),
                    value: value.clone(),
                },
                None => reject(RejectReason::IndexOutOfRange),
            },
            Command::Clear => {
                let released = self.map.len();
                self.map.clear();
                OutputEvent::Cleared { released }
            }
        };

        if let OutputEvent::Rejected { reason } = &event {
            debug!(op, ?reason, len = self.map.len(), "command rejected");
        }
        event
    }

    /// Run the engine event loop.
    ///
    /// # Arguments
    /// * `input` - Consumer end of the command ring buffer
    /// * `output` - Producer end of the output event ring buffer
    /// * `pin_to_core` - Whether to pin to the last available CPU core
    ///
    /// # Note
    /// Returns once the producer side of `input` has been dropped and the
    /// buffer is drained.
    #[cfg(feature = "runtime")]
    pub fn run(
        &mut self,
        input: &mut rtrb::Consumer<Command<K, V>>,
        output: &mut rtrb::Producer<OutputEvent<K, V>>,
        pin_to_core: bool,
    ) {
        if pin_to_core && !self.pin_to_core() {
            debug!("could not pin engine thread");
        }
        tracing::info!(pinned = pin_to_core, "engine loop started");

        loop {
            // Checked before draining so nothing pushed ahead of the drop is lost
            let abandoned = input.is_abandoned();
            while let Ok(cmd) = input.pop() {
                let event = self.process_command(cmd);
                // Best effort - drop if full
                let _ = output.push(event);
            }
            if abandoned {
                break;
            }
            std::hint::spin_loop();
        }

        tracing::info!(processed = self.processed, "engine loop stopped");
    }
}

#[inline]
fn reject<K, V>(reason: RejectReason) -> OutputEvent<K, V> {
    OutputEvent::Rejected { reason }
}

impl<K, V> Default for Engine<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
