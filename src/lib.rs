//! # chain-map
//!
//! An insertion-ordered map backed by an arena-allocated doubly-linked list.
//!
//! ## Design Principles
//!
//! - **Insertion Order**: entries stay in the order they were first inserted;
//!   updates never move them
//! - **Eq-only Keys**: keys need `PartialEq`, nothing else (no hashing, no ordering)
//! - **Index Links**: nodes live in a slab and link to each other by `u32` index
//! - **Single-Writer**: no internal locks; one owner serialises all access
//!
//! ## Architecture
//!
//! ```text
//! [Command source] --> [Engine] --> [OrderedMap] --> [Chain] --> [Arena]
//!                          |
//!                   [Output Events]
//! ```

mod arena;
mod chain;
pub mod algebra;
pub mod command;
pub mod engine;
pub mod map;
pub mod oplog;

// Re-exports for convenience
pub use algebra::{combine, subtract};
pub use command::{Command, OutputEvent, RejectReason};
pub use engine::Engine;
pub use map::{Iter, OrderedMap};
pub use oplog::{read_commands, OpLogError, OpRow};
