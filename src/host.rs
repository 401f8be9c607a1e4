//! Host adapter - the contract with the excluded rendering layer.
//!
//! The engine decides *what* the navigation structure should be; the adapter
//! turns that decision into an on-screen hierarchy. The engine is the only
//! caller of an adapter, and it materializes every entry exactly once (at
//! push, present, or tab registration), so an adapter that keys its units by
//! [`ScreenId`](crate::ScreenId) never re-materializes an unchanged entry -
//! that is what keeps input focus and transient view state alive across
//! unrelated navigation events.
//!
//! Visual transitions may be asynchronous relative to the logical state
//! change: the engine never waits for an animation and issues the next
//! structural instruction immediately. Adapters must queue/serialize their
//! transitions so the final visual state converges to the final logical
//! state, collapsing intermediate animations if needed.
//!
//! Adapters must not call back into the engine from within a contract method.

use crate::engine::{OverlayEntry, ScreenEntry};
use crate::types::{PresentationStyle, TabBarMode};

/// Capability contract for displaying the engine's aggregate state.
///
/// `V` is the opaque view description type; `Unit` is whatever displayable
/// handle the host platform materializes from it.
pub trait HostAdapter<V> {
    type Unit;

    /// Produce a displayable unit for a back-stack entry.
    fn materialize(&mut self, entry: &ScreenEntry<V>) -> Self::Unit;

    /// Produce a displayable unit for a modal overlay (style is available on
    /// the entry itself).
    fn materialize_overlay(&mut self, overlay: &OverlayEntry<V>) -> Self::Unit;

    /// Install `unit` as the visible root of the implicit (tabless) stack.
    fn set_visible_root(&mut self, unit: Self::Unit);

    /// Install the root units of every registered tab, in registration order.
    /// Called at most once, at tab registration.
    fn install_tabs(&mut self, roots: Vec<Self::Unit>, mode: &TabBarMode<V>);

    /// Make the given tab's existing stack visible. Never destroys anything.
    fn select_tab(&mut self, index: usize);

    /// Push `unit` onto the visible stack.
    fn push(&mut self, unit: Self::Unit);

    /// Atomic non-local pop: shrink the visible stack so exactly `depth`
    /// units remain. Covers single pop, pop-to-marker, and pop-to-root in one
    /// primitive - never a loop of single pops.
    fn pop_to_depth(&mut self, depth: usize);

    /// Present a modal unit above everything currently shown.
    fn present(&mut self, unit: Self::Unit, style: &PresentationStyle);

    /// Dismiss the topmost presented overlay.
    fn dismiss_top(&mut self);

    /// Tab chrome visibility changed because the visible top entry changed.
    /// Only called while tabs are registered.
    fn set_tab_chrome_hidden(&mut self, _hidden: bool) {}
}

// =============================================================================
// Headless Adapter
// =============================================================================

/// No-op adapter: runs the engine without any display layer.
///
/// Units are the entries' own ids. Useful in tests and anywhere navigation
/// logic is exercised without a host platform.
#[derive(Debug, Default)]
pub struct HeadlessAdapter;

impl HeadlessAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl<V> HostAdapter<V> for HeadlessAdapter {
    type Unit = crate::types::ScreenId;

    fn materialize(&mut self, entry: &ScreenEntry<V>) -> Self::Unit {
        entry.id
    }

    fn materialize_overlay(&mut self, overlay: &OverlayEntry<V>) -> Self::Unit {
        overlay.id
    }

    fn set_visible_root(&mut self, _unit: Self::Unit) {}
    fn install_tabs(&mut self, _roots: Vec<Self::Unit>, _mode: &TabBarMode<V>) {}
    fn select_tab(&mut self, _index: usize) {}
    fn push(&mut self, _unit: Self::Unit) {}
    fn pop_to_depth(&mut self, _depth: usize) {}
    fn present(&mut self, _unit: Self::Unit, _style: &PresentationStyle) {}
    fn dismiss_top(&mut self) {}
}
