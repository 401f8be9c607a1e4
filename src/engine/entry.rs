//! Screen and overlay entries - the units of navigable content.
//!
//! An entry pairs an opaque view description with a process-unique identity.
//! The view value is produced by a zero-argument factory that the engine
//! invokes exactly once, at the moment the push/present call executes, so
//! captured state reflects the moment of navigation rather than the moment
//! the declaration was first rendered.

use std::cell::RefCell;

use crate::types::{Marker, PresentationStyle, ScreenId};

// =============================================================================
// Id Allocation
// =============================================================================

thread_local! {
    /// Counter for generating process-unique screen ids.
    ///
    /// The engine is confined to the single navigation thread (no internal
    /// locking anywhere in this crate), so a thread-local counter is enough.
    static ID_COUNTER: RefCell<u64> = const { RefCell::new(0) };
}

/// Allocate the next screen id. Ids are never reused.
pub(crate) fn next_screen_id() -> ScreenId {
    ID_COUNTER.with(|counter| {
        let mut counter = counter.borrow_mut();
        let id = ScreenId(*counter);
        *counter += 1;
        id
    })
}

// =============================================================================
// Screen Entry
// =============================================================================

/// One unit of navigable content on a back-stack.
///
/// Created when the engine executes a push (or builds a tab root at
/// registration), destroyed when popped. Immutable after creation. Tab
/// switches never destroy entries - the outgoing tab's stack keeps them.
pub struct ScreenEntry<V> {
    /// Process-unique, stable for the entry's lifetime.
    pub id: ScreenId,
    /// Opaque view description, already evaluated (navigation-time snapshot).
    pub view: V,
    /// Advisory label for non-local pops. Latest entry bearing it wins.
    pub marker: Option<Marker>,
    /// Whether tab chrome should be hidden while this entry is topmost.
    pub hides_tab_chrome: bool,
}

impl<V> ScreenEntry<V> {
    /// Evaluate `factory` now and wrap the result with a fresh id.
    pub(crate) fn create(
        factory: impl FnOnce() -> V,
        marker: Option<Marker>,
        hides_tab_chrome: bool,
    ) -> Self {
        Self {
            id: next_screen_id(),
            view: factory(),
            marker,
            hides_tab_chrome,
        }
    }
}

impl<V> std::fmt::Debug for ScreenEntry<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenEntry")
            .field("id", &self.id)
            .field("marker", &self.marker)
            .field("hides_tab_chrome", &self.hides_tab_chrome)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Overlay Entry
// =============================================================================

/// One modally presented unit, layered above the active stack.
pub struct OverlayEntry<V> {
    pub id: ScreenId,
    pub view: V,
    pub style: PresentationStyle,
}

impl<V> OverlayEntry<V> {
    pub(crate) fn create(factory: impl FnOnce() -> V, style: PresentationStyle) -> Self {
        Self {
            id: next_screen_id(),
            view: factory(),
            style,
        }
    }
}

impl<V> std::fmt::Debug for OverlayEntry<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayEntry")
            .field("id", &self.id)
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
