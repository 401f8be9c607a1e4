//! Router - the reactive handle handed to declarative UI code.
//!
//! A router is a projection, not a source of truth: it forwards every call to
//! the [`NavEngine`] and republishes the engine's observable state (current
//! tab, stack depth, overlay count, revision) through signal clones so
//! dependents re-render on change.
//!
//! The router holds a non-owning reference to the engine. Once the engine is
//! gone every forwarded call becomes a no-op - never a crash - and the
//! republished signals keep answering with the last published values.
//!
//! # Example
//!
//! ```ignore
//! use spark_nav::{NavEngine, Router, HeadlessAdapter};
//! use spark_signals::effect;
//!
//! let engine = NavEngine::shared(HeadlessAdapter::new());
//! let router = Router::new(&engine);
//!
//! // Re-render on every navigation change.
//! let _stop = effect({
//!     let router = router.clone();
//!     move || {
//!         let _ = router.revision();
//!         // rebuild the dependent view here
//!     }
//! });
//!
//! router.push(|| my_screen());
//! router.pop();
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use spark_signals::Signal;
use tracing::trace;

use crate::engine::NavEngine;
use crate::host::HostAdapter;
use crate::types::{Marker, PresentationStyle};

pub struct Router<V, A: HostAdapter<V>> {
    engine: Weak<RefCell<NavEngine<V, A>>>,
    active_index: Signal<i32>,
    depth: Signal<usize>,
    overlay_count: Signal<usize>,
    revision: Signal<u64>,
}

impl<V, A: HostAdapter<V>> Router<V, A> {
    /// Create a facade for `engine`. Cheap; create as many as UI scopes need.
    pub fn new(engine: &Rc<RefCell<NavEngine<V, A>>>) -> Self {
        let signals = engine.borrow();
        Self {
            engine: Rc::downgrade(engine),
            active_index: signals.active_index_signal(),
            depth: signals.depth_signal(),
            overlay_count: signals.overlay_count_signal(),
            revision: signals.revision_signal(),
        }
    }

    /// Whether the owning engine is still alive.
    pub fn is_attached(&self) -> bool {
        self.engine.strong_count() > 0
    }

    fn with_engine(&self, op: &'static str, f: impl FnOnce(&mut NavEngine<V, A>)) {
        match self.engine.upgrade() {
            Some(engine) => f(&mut engine.borrow_mut()),
            None => trace!(op, "router call after engine teardown; no-op"),
        }
    }

    // =========================================================================
    // Forwarded Operations
    // =========================================================================

    pub fn push(&self, factory: impl FnOnce() -> V) {
        self.with_engine("push", |engine| engine.push(factory));
    }

    pub fn push_with(
        &self,
        factory: impl FnOnce() -> V,
        marker: Option<Marker>,
        hides_tab_chrome: bool,
    ) {
        self.with_engine("push", |engine| {
            engine.push_with(factory, marker, hides_tab_chrome)
        });
    }

    pub fn pop(&self) {
        self.with_engine("pop", |engine| engine.pop());
    }

    pub fn pop_to_root(&self) {
        self.with_engine("pop_to_root", |engine| engine.pop_to_root());
    }

    pub fn pop_to(&self, marker: impl Into<Marker>) {
        self.with_engine("pop_to", |engine| engine.pop_to(marker));
    }

    pub fn switch_tab<T: PartialEq + 'static>(&self, tab: T) {
        self.with_engine("switch_tab", |engine| engine.switch_tab(tab));
    }

    pub fn present_overlay(
        &self,
        factory: impl FnOnce() -> V,
        style: PresentationStyle,
        allow_stacking: bool,
    ) {
        self.with_engine("present", |engine| {
            engine.present_overlay(factory, style, allow_stacking)
        });
    }

    pub fn present_sheet(&self, factory: impl FnOnce() -> V) {
        self.with_engine("present_sheet", |engine| engine.present_sheet(factory));
    }

    pub fn present_full_screen(&self, factory: impl FnOnce() -> V) {
        self.with_engine("present_full_screen", |engine| {
            engine.present_full_screen(factory)
        });
    }

    pub fn dismiss_overlay(&self) {
        self.with_engine("dismiss", |engine| engine.dismiss_overlay());
    }

    pub fn dismiss_all_overlays(&self) {
        self.with_engine("dismiss_all", |engine| engine.dismiss_all_overlays());
    }

    // =========================================================================
    // Observable Reads
    // =========================================================================

    /// Typed reactive read of the active tab. Establishes a dependency on the
    /// active-tab signal; None in tabless mode, for a mismatched identifier
    /// type, or once the engine is gone.
    pub fn active_tab<T: Clone + 'static>(&self) -> Option<T> {
        let index = self.active_index.get();
        if index < 0 {
            return None;
        }
        let engine = self.engine.upgrade()?;
        let tab = engine.borrow().active_tab::<T>();
        tab
    }

    /// Reactive read of the active tab slot index (-1 = tabless mode).
    pub fn active_tab_index(&self) -> i32 {
        self.active_index.get()
    }

    /// Reactive read of the active stack's depth.
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Reactive read of the presented-overlay count.
    pub fn overlay_count(&self) -> usize {
        self.overlay_count.get()
    }

    /// Reactive read of the engine revision. Reading this inside an effect
    /// re-runs the effect on every navigation change.
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }
}

impl<V, A: HostAdapter<V>> Clone for Router<V, A> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            active_index: self.active_index.clone(),
            depth: self.depth.clone(),
            overlay_count: self.overlay_count.clone(),
            revision: self.revision.clone(),
        }
    }
}

impl<V, A: HostAdapter<V>> std::fmt::Debug for Router<V, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("attached", &self.is_attached())
            .field("active_index", &self.active_index.get())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
