//! Navigation Engine - stacks, overlays, tabs, and the engine that owns them.
//!
//! The engine manages the core data structures:
//! - Entry: one unit of navigable content (identity + lazily-built view)
//! - NavStack: one back-stack, root-first, root never removable
//! - OverlayStack: modally presented units, topmost-first dismissal
//! - TabRegistry: fixed identifier-to-stack mapping, type-erased tokens
//! - NavEngine: the single authoritative state machine for "what is on screen"
//!
//! # Architecture
//!
//! ```text
//! Router (facade)          NavEngine (source of truth)       HostAdapter
//!   push/pop/switch  ──▶     mutate stacks/registry   ──▶   realize change
//!   observable reads ◀──     signals (revision, ...)
//! ```
//!
//! Control flow is one-directional and synchronous: the facade forwards, the
//! engine mutates and publishes, the adapter displays.

mod core;
mod entry;
mod overlay;
mod stack;
mod tabs;

pub use self::core::*;
pub use entry::*;
pub use overlay::*;
pub use stack::*;
pub use tabs::*;
