//! # spark-nav
//!
//! Reactive Navigation Engine for declarative UIs in Rust.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity.
//!
//! ## Architecture
//!
//! Declarative code describes screens; the engine owns the imperative
//! navigation state - back-stacks, a modal-overlay stack, and a fixed tab
//! registry - and keeps the two execution models reconciled without losing
//! screen identity:
//!
//! ```text
//! Declarative tree               spark-nav                     Host platform
//! ────────────────              ───────────                   ─────────────
//! calls Router                   NavEngine OWNS:               HostAdapter
//!   → push(|| screen())            per-tab NavStacks             materialize
//!   → pop_to("checkout")           OverlayStack        ──────▶   push/pop
//!   → switch_tab(Tab::Home)        TabRegistry                   present
//!        │                              │                        dismiss
//!        │ reads signals                │ publishes
//!        ◀──────────────  revision / active tab / depth
//! ```
//!
//! Non-local jumps use advisory markers: `pop_to("checkout")` pops back to
//! the latest entry pushed with that marker, however many levels that is, in
//! one atomic step. Tab switches are never destructive - each tab keeps its
//! stack exactly as-is while another tab is visible.
//!
//! The engine is confined to the single UI thread; all mutations are
//! synchronous and published atomically (one revision bump per operation).
//! Visual transitions may lag behind - adapters converge to the final
//! logical state on their own schedule.
//!
//! ## Modules
//!
//! - [`types`] - Core types (ScreenId, Marker, PresentationStyle, ...)
//! - [`engine`] - NavStack, OverlayStack, TabRegistry, NavEngine
//! - [`router`] - The reactive facade handed to declarative code
//! - [`host`] - The adapter contract with the rendering layer

pub mod engine;
pub mod host;
pub mod router;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use engine::{
    NavEngine, NavStack, OverlayEntry, OverlayStack, ScreenEntry, StackState, TabLookup,
    TabRegistry, TabSpec,
};

pub use host::{HeadlessAdapter, HostAdapter};

pub use router::Router;
