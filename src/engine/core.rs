//! Navigation engine - the single source of truth for "what is on screen".
//!
//! The engine owns one tab registry (possibly degenerate: a single implicit
//! tab), the overlay stack, and the host adapter. Declarative code reaches it
//! through the [`Router`](crate::Router) facade; the engine mutates its
//! structures synchronously and tells the adapter to realize the change.
//!
//! Every operation is a total function over the engine's state space: normal
//! misuse (unknown marker, pop on root, dismiss with nothing presented,
//! switching to the active tab) is a defined no-op, logged at trace/debug.
//! Caller misconfiguration (wrong identifier type, double registration) is
//! warned and ignored, never a crash. The only reportable failure is the
//! [`RegistrationError`] returned from [`NavEngine::register_tabs`].
//!
//! # Observation
//!
//! State-changing operations bump the `revision` signal exactly once, after
//! all mutation is done, so subscribed effects never observe a half-updated
//! stack. No-ops never bump it. Effects must not navigate synchronously from
//! inside their own run (the engine is confined to one logical thread and is
//! not re-entrant); schedule instead.

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{signal, Signal};
use tracing::{debug, trace, warn};

use crate::engine::entry::{OverlayEntry, ScreenEntry};
use crate::engine::overlay::OverlayStack;
use crate::engine::stack::StackState;
use crate::engine::tabs::{TabLookup, TabRegistry};
use crate::host::HostAdapter;
use crate::types::{
    EngineConfig, Marker, PresentationStyle, RegistrationError, ScreenId, TabBarMode,
};

// =============================================================================
// Tab Spec
// =============================================================================

/// One tab in the registration list: identifier, display metadata, and the
/// factory that builds the tab's root view (evaluated at registration).
pub struct TabSpec<T, V> {
    pub id: T,
    pub title: String,
    pub icon: Option<String>,
    pub root: Box<dyn FnOnce() -> V>,
}

impl<T, V> TabSpec<T, V> {
    pub fn new(id: T, title: impl Into<String>, root: impl FnOnce() -> V + 'static) -> Self {
        Self {
            id,
            title: title.into(),
            icon: None,
            root: Box::new(root),
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

// =============================================================================
// NavEngine
// =============================================================================

pub struct NavEngine<V, A: HostAdapter<V>> {
    registry: TabRegistry<V>,
    overlays: OverlayStack<V>,
    adapter: A,
    config: EngineConfig,
    tab_bar_mode: Option<TabBarMode<V>>,

    /// Active tab slot index; -1 in tabless mode (mirrors the -1 sentinel the
    /// focus system uses for "nothing focused").
    active_index: Signal<i32>,
    /// Depth of the active stack.
    depth: Signal<usize>,
    /// Number of presented overlays.
    overlay_count: Signal<usize>,
    /// Bumped once per state-changing operation.
    revision: Signal<u64>,

    /// Last chrome-hiding flag applied to the adapter.
    chrome_hidden: bool,
}

impl<V, A: HostAdapter<V>> NavEngine<V, A> {
    pub fn new(adapter: A) -> Self {
        Self::with_config(adapter, EngineConfig::default())
    }

    pub fn with_config(adapter: A, config: EngineConfig) -> Self {
        Self {
            registry: TabRegistry::new(),
            overlays: OverlayStack::new(),
            adapter,
            config,
            tab_bar_mode: None,
            active_index: signal(-1),
            depth: signal(0usize),
            overlay_count: signal(0usize),
            revision: signal(0u64),
            chrome_hidden: false,
        }
    }

    /// Engine wrapped for sharing with [`Router`](crate::Router) facades.
    pub fn shared(adapter: A) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(adapter)))
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Bind the tab set, typically once near application start.
    ///
    /// Evaluates every root factory, materializes all roots through the
    /// adapter, installs them together with `mode`, and selects `initial`
    /// (first tab when `None`). First call wins: a second call is warned,
    /// returns the error, and leaves the existing registration untouched.
    pub fn register_tabs<T: PartialEq + 'static>(
        &mut self,
        tabs: Vec<TabSpec<T, V>>,
        mode: TabBarMode<V>,
        initial: Option<T>,
    ) -> Result<(), RegistrationError> {
        if self.registry.is_registered() {
            let err = RegistrationError::AlreadyRegistered {
                existing: self.registry.count(),
            };
            warn!(%err, "tab registration rejected");
            return Err(err);
        }
        if tabs.is_empty() {
            warn!("tab registration rejected: empty tab set");
            return Err(RegistrationError::EmptyTabSet);
        }
        // Resolve the initial tab before any side effect so a bad initial
        // value leaves the engine fully untouched.
        let initial_index = match &initial {
            Some(tab) => match tabs.iter().position(|spec| spec.id == *tab) {
                Some(index) => index,
                None => {
                    warn!("tab registration rejected: initial tab not in the tab set");
                    return Err(RegistrationError::UnknownInitialTab);
                }
            },
            None => 0,
        };
        if self.registry.implicit_depth() > 0 {
            warn!(
                abandoned = self.registry.implicit_depth(),
                "entries pushed before tab registration are abandoned"
            );
        }

        let mut prepared = Vec::with_capacity(tabs.len());
        let mut units = Vec::with_capacity(tabs.len());
        for spec in tabs {
            let root = ScreenEntry::create(spec.root, None, false);
            units.push(self.adapter.materialize(&root));
            prepared.push((spec.id, spec.title, spec.icon, root));
        }
        self.registry.register::<T>(prepared)?;
        debug!(tabs = self.registry.count(), initial = initial_index, "tabs registered");

        self.adapter.install_tabs(units, &mode);
        self.tab_bar_mode = Some(mode);
        self.active_index.set(initial_index as i32);
        self.adapter.select_tab(initial_index);
        self.apply_chrome_flag();
        self.commit();
        Ok(())
    }

    // =========================================================================
    // Stack Operations
    // =========================================================================

    /// Push a new top entry onto the active stack. Always legal.
    ///
    /// The factory runs now - captured state reflects the moment of
    /// navigation. If an overlay is presenting, the topmost overlay is
    /// dismissed first so back-navigation never leaves a screen buried under
    /// a modal it didn't open.
    pub fn push(&mut self, factory: impl FnOnce() -> V) {
        self.push_with(factory, None, false);
    }

    /// [`push`](Self::push) with an advisory marker and/or chrome hiding.
    pub fn push_with(
        &mut self,
        factory: impl FnOnce() -> V,
        marker: Option<Marker>,
        hides_tab_chrome: bool,
    ) {
        if self.overlays.is_presenting() {
            debug!("push collapsed the topmost overlay");
            self.adapter.dismiss_top();
            self.overlays.pop_top();
        }

        let entry = ScreenEntry::create(factory, marker, hides_tab_chrome);
        debug!(id = %entry.id, marker = ?entry.marker, "push");
        let unit = self.adapter.materialize(&entry);

        let index = self.active_index.get();
        if self.registry.active_stack(index).state() == StackState::Empty {
            // First push in tabless mode establishes the implicit root.
            self.adapter.set_visible_root(unit);
        } else {
            self.adapter.push(unit);
        }
        self.registry.active_stack_mut(index).push(entry);
        self.apply_chrome_flag();
        self.commit();
    }

    /// Remove the top entry. No-op when the stack is rooted.
    pub fn pop(&mut self) {
        let index = self.active_index.get();
        let Some(removed) = self.registry.active_stack_mut(index).pop() else {
            trace!("pop ignored; stack is rooted");
            return;
        };
        debug!(id = %removed.id, "pop");
        let depth = self.registry.active_stack(index).depth();
        self.adapter.pop_to_depth(depth);
        self.apply_chrome_flag();
        self.commit();
    }

    /// Remove everything above the root in one step. No-op when rooted.
    pub fn pop_to_root(&mut self) {
        let index = self.active_index.get();
        let removed = self.registry.active_stack_mut(index).pop_to_root();
        if removed.is_empty() {
            trace!("pop_to_root ignored; stack is rooted");
            return;
        }
        debug!(removed = removed.len(), "pop to root");
        self.adapter.pop_to_depth(1);
        self.apply_chrome_flag();
        self.commit();
    }

    /// Pop back to the topmost entry bearing `marker`, removing everything
    /// strictly above it in one step. A missing marker is a benign no-op -
    /// markers are advisory, not required identifiers.
    pub fn pop_to(&mut self, marker: impl Into<Marker>) {
        let marker = marker.into();
        let index = self.active_index.get();
        let Some(target) = self.registry.active_stack(index).resolve_marker(&marker) else {
            debug!(%marker, "marker not found; no-op");
            return;
        };
        let removed = self.registry.active_stack_mut(index).pop_above(target);
        if removed.is_empty() {
            trace!(%marker, "marker already topmost; no-op");
            return;
        }
        debug!(%marker, removed = removed.len(), "pop to marker");
        self.adapter.pop_to_depth(target + 1);
        self.apply_chrome_flag();
        self.commit();
    }

    // =========================================================================
    // Tabs
    // =========================================================================

    /// Make another registered tab's stack visible. Never destructive: the
    /// outgoing tab keeps its stack exactly as-is.
    ///
    /// Unknown values and mismatched identifier types are caller errors,
    /// handled defensively: warned and ignored.
    pub fn switch_tab<T: PartialEq + 'static>(&mut self, tab: T) {
        match self.registry.resolve(&tab, std::any::type_name::<T>()) {
            TabLookup::Unregistered => {
                warn!("switch_tab before tab registration; no-op");
            }
            TabLookup::TypeMismatch { expected, got } => {
                warn!(expected, got, "tab identifier type mismatch; no-op");
            }
            TabLookup::UnknownTab => {
                warn!("unknown tab identifier value; no-op");
            }
            TabLookup::Found(index) => {
                if index as i32 == self.active_index.get() {
                    trace!(index, "tab already active; no-op");
                    return;
                }
                debug!(index, "switch tab");
                self.active_index.set(index as i32);
                self.adapter.select_tab(index);
                self.apply_chrome_flag();
                self.commit();
            }
        }
    }

    // =========================================================================
    // Overlays
    // =========================================================================

    /// Present a modal overlay above the active stack.
    ///
    /// With `allow_stacking` false the currently presented overlay (if any)
    /// is replaced instead of stacked on. Stacking a sheet on a full-screen
    /// cover additionally honors
    /// [`EngineConfig::allow_sheet_over_full_screen`].
    pub fn present_overlay(
        &mut self,
        factory: impl FnOnce() -> V,
        style: PresentationStyle,
        allow_stacking: bool,
    ) {
        if self.overlays.is_presenting() {
            let replace = if !allow_stacking {
                debug!("replace-not-stack: dismissing the current overlay");
                true
            } else if style.is_sheet()
                && !self.config.allow_sheet_over_full_screen
                && self.overlays.top().is_some_and(|top| top.style.is_full_screen())
            {
                debug!("sheet over full-screen disallowed by config; replacing");
                true
            } else {
                false
            };
            if replace {
                self.adapter.dismiss_top();
                self.overlays.pop_top();
            }
        }

        let overlay = OverlayEntry::create(factory, style);
        debug!(id = %overlay.id, style = ?overlay.style, "present");
        let unit = self.adapter.materialize_overlay(&overlay);
        self.adapter.present(unit, &overlay.style);
        self.overlays.push(overlay);
        self.commit();
    }

    /// Present a sheet with default detents, stacking allowed.
    pub fn present_sheet(&mut self, factory: impl FnOnce() -> V) {
        self.present_overlay(factory, PresentationStyle::sheet(), true);
    }

    /// Present a full-screen cover, stacking allowed.
    pub fn present_full_screen(&mut self, factory: impl FnOnce() -> V) {
        self.present_overlay(factory, PresentationStyle::FullScreen, true);
    }

    /// Dismiss the topmost overlay. No-op when nothing is presented.
    pub fn dismiss_overlay(&mut self) {
        let Some(dismissed) = self.overlays.pop_top() else {
            trace!("dismiss with empty overlay stack; no-op");
            return;
        };
        debug!(id = %dismissed.id, "dismiss");
        self.adapter.dismiss_top();
        self.commit();
    }

    /// Dismiss every overlay, topmost-first, one adapter dismissal per
    /// overlay so each one is visually valid at the moment it executes.
    pub fn dismiss_all_overlays(&mut self) {
        if !self.overlays.is_presenting() {
            trace!("dismiss_all with empty overlay stack; no-op");
            return;
        }
        let drained = self.overlays.drain_top_first();
        debug!(count = drained.len(), "dismiss all overlays");
        for overlay in &drained {
            trace!(id = %overlay.id, "dismissing");
            self.adapter.dismiss_top();
        }
        self.commit();
    }

    // =========================================================================
    // Observation & Snapshots
    // =========================================================================

    /// Signal bumped once per state-changing operation. Subscribe an effect
    /// to re-run on every navigation change.
    pub fn revision_signal(&self) -> Signal<u64> {
        self.revision.clone()
    }

    /// Active tab slot index signal (-1 = tabless mode).
    pub fn active_index_signal(&self) -> Signal<i32> {
        self.active_index.clone()
    }

    /// Depth signal of the active stack.
    pub fn depth_signal(&self) -> Signal<usize> {
        self.depth.clone()
    }

    /// Presented-overlay count signal.
    pub fn overlay_count_signal(&self) -> Signal<usize> {
        self.overlay_count.clone()
    }

    /// Typed read of the active tab identifier. None in tabless mode or when
    /// `T` is not the registered identifier type.
    pub fn active_tab<T: Clone + 'static>(&self) -> Option<T> {
        let index = self.active_index.get();
        if index < 0 {
            return None;
        }
        self.registry
            .token(index as usize)?
            .downcast_ref::<T>()
            .cloned()
    }

    pub fn depth(&self) -> usize {
        self.registry.active_stack(self.active_index.get()).depth()
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.count()
    }

    /// Depth state of the active stack (Rooted/Nested; Empty only before the
    /// first tabless push).
    pub fn stack_state(&self) -> StackState {
        self.registry.active_stack(self.active_index.get()).state()
    }

    /// Ids of the active stack, root-first.
    pub fn active_stack_ids(&self) -> Vec<ScreenId> {
        self.registry
            .active_stack(self.active_index.get())
            .entries()
            .iter()
            .map(|entry| entry.id)
            .collect()
    }

    /// Ids of a specific tab's stack, root-first. None when the identifier
    /// does not resolve.
    pub fn stack_ids_for<T: PartialEq + 'static>(&self, tab: &T) -> Option<Vec<ScreenId>> {
        match self.registry.resolve(tab, std::any::type_name::<T>()) {
            TabLookup::Found(index) => Some(
                self.registry
                    .stack(index)?
                    .entries()
                    .iter()
                    .map(|entry| entry.id)
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Style of the topmost presented overlay, if any.
    pub fn top_overlay_style(&self) -> Option<PresentationStyle> {
        self.overlays.top().map(|overlay| overlay.style.clone())
    }

    pub fn tabs(&self) -> &TabRegistry<V> {
        &self.registry
    }

    pub fn tab_bar_mode(&self) -> Option<&TabBarMode<V>> {
        self.tab_bar_mode.as_ref()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Reapply the top entry's chrome-hiding flag if it changed. Only
    /// meaningful once tabs exist.
    fn apply_chrome_flag(&mut self) {
        if !self.registry.is_registered() {
            return;
        }
        let hidden = self
            .registry
            .active_stack(self.active_index.get())
            .top()
            .is_some_and(|top| top.hides_tab_chrome);
        if hidden != self.chrome_hidden {
            self.chrome_hidden = hidden;
            self.adapter.set_tab_chrome_hidden(hidden);
        }
    }

    /// Publish the post-mutation state. Exactly one revision bump per
    /// state-changing operation; no-op paths never reach here.
    fn commit(&mut self) {
        self.depth
            .set(self.registry.active_stack(self.active_index.get()).depth());
        self.overlay_count.set(self.overlays.count());
        self.revision.set(self.revision.get() + 1);
    }
}

impl<V, A: HostAdapter<V>> std::fmt::Debug for NavEngine<V, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavEngine")
            .field("registry", &self.registry)
            .field("overlays", &self.overlays)
            .field("active_index", &self.active_index.get())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HeadlessAdapter;
    use std::cell::Cell;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum AppTab {
        Home,
        Profile,
    }

    fn engine() -> NavEngine<&'static str, HeadlessAdapter> {
        NavEngine::new(HeadlessAdapter::new())
    }

    fn engine_with_tabs() -> NavEngine<&'static str, HeadlessAdapter> {
        let mut engine = engine();
        engine
            .register_tabs(
                vec![
                    TabSpec::new(AppTab::Home, "Home", || "home-root"),
                    TabSpec::new(AppTab::Profile, "Profile", || "profile-root"),
                ],
                TabBarMode::Automatic,
                Some(AppTab::Home),
            )
            .unwrap();
        engine
    }

    #[test]
    fn test_tabless_push_roots_then_nests() {
        let mut engine = engine();
        assert_eq!(engine.stack_state(), StackState::Empty);

        engine.push(|| "root");
        assert_eq!(engine.stack_state(), StackState::Rooted);

        engine.push(|| "detail");
        assert_eq!(engine.stack_state(), StackState::Nested);
        assert_eq!(engine.depth(), 2);

        engine.pop();
        engine.pop();
        assert_eq!(engine.depth(), 1, "root is never removable");
    }

    #[test]
    fn test_factory_runs_at_push_time_not_declaration_time() {
        let mut engine = engine();
        let moment = Rc::new(Cell::new("declaration"));
        let moment_clone = moment.clone();
        let factory = move || moment_clone.get();

        moment.set("navigation");
        engine.push(factory);

        assert_eq!(
            engine.tabs().active_stack(-1).top().unwrap().view,
            "navigation",
            "captured state must reflect the moment of navigation"
        );
    }

    #[test]
    fn test_tab_switch_preserves_both_stacks() {
        let mut engine = engine_with_tabs();
        engine.push(|| "a");
        engine.push(|| "b");
        let home_before = engine.stack_ids_for(&AppTab::Home).unwrap();

        engine.switch_tab(AppTab::Profile);
        assert_eq!(engine.active_tab::<AppTab>(), Some(AppTab::Profile));
        assert_eq!(engine.depth(), 1);
        assert_eq!(
            engine.stack_ids_for(&AppTab::Home).unwrap(),
            home_before,
            "outgoing stack untouched while away"
        );

        engine.switch_tab(AppTab::Home);
        assert_eq!(
            engine.active_stack_ids(),
            home_before,
            "same ids, same order after switching back"
        );
    }

    #[test]
    fn test_switch_to_active_tab_is_silent_noop() {
        let mut engine = engine_with_tabs();
        let before = engine.revision_signal().get();
        engine.switch_tab(AppTab::Home);
        assert_eq!(engine.revision_signal().get(), before, "no revision bump");
    }

    #[test]
    fn test_switch_with_wrong_identifier_type_is_noop() {
        let mut engine = engine_with_tabs();
        let before = engine.revision_signal().get();
        engine.switch_tab(42u32);
        assert_eq!(engine.active_tab::<AppTab>(), Some(AppTab::Home));
        assert_eq!(engine.revision_signal().get(), before);
    }

    #[test]
    fn test_pop_to_marker_resolves_latest_bearer() {
        let mut engine = engine_with_tabs();
        engine.push_with(|| "x1", Some("x".into()), false);
        engine.push(|| "mid");
        engine.push_with(|| "x2", Some("x".into()), false);
        engine.push(|| "top");

        engine.pop_to("x");
        assert_eq!(engine.depth(), 4, "root + x1 + mid + x2 remain");
    }

    #[test]
    fn test_missing_marker_is_benign() {
        let mut engine = engine_with_tabs();
        engine.push(|| "a");
        let ids = engine.active_stack_ids();
        let before = engine.revision_signal().get();

        engine.pop_to("nonexistent");
        assert_eq!(engine.active_stack_ids(), ids);
        assert_eq!(engine.revision_signal().get(), before);
    }

    #[test]
    fn test_pop_to_root_is_one_revision() {
        let mut engine = engine_with_tabs();
        engine.push(|| "a");
        engine.push(|| "b");
        engine.push(|| "c");

        let before = engine.revision_signal().get();
        engine.pop_to_root();
        assert_eq!(engine.depth(), 1);
        assert_eq!(
            engine.revision_signal().get(),
            before + 1,
            "atomic: observers see exactly one change"
        );
    }

    #[test]
    fn test_push_collapses_topmost_overlay() {
        let mut engine = engine_with_tabs();
        engine.present_sheet(|| "sheet");
        assert_eq!(engine.overlay_count(), 1);

        let depth_before = engine.depth();
        engine.push(|| "detail");

        assert_eq!(engine.overlay_count(), 0, "overlay collapsed by the push");
        assert_eq!(engine.depth(), depth_before + 1);
    }

    #[test]
    fn test_replace_not_stack_policy() {
        let mut engine = engine_with_tabs();
        engine.present_sheet(|| "first");
        engine.present_overlay(|| "second", PresentationStyle::sheet(), false);
        assert_eq!(engine.overlay_count(), 1, "replaced, not stacked");
    }

    #[test]
    fn test_sheet_over_full_screen_policy_is_configurable() {
        let mut permissive = engine_with_tabs();
        permissive.present_full_screen(|| "cover");
        permissive.present_sheet(|| "sheet");
        assert_eq!(permissive.overlay_count(), 2, "allowed by default");

        let mut strict = NavEngine::with_config(
            HeadlessAdapter::new(),
            EngineConfig {
                allow_sheet_over_full_screen: false,
            },
        );
        strict.present_full_screen(|| "cover");
        strict.present_sheet(|| "sheet");
        assert_eq!(strict.overlay_count(), 1, "cover replaced by the sheet");
        assert!(strict.top_overlay_style().unwrap().is_sheet());
    }

    #[test]
    fn test_dismiss_all_drains_everything() {
        let mut engine = engine_with_tabs();
        engine.present_sheet(|| "o1");
        engine.present_sheet(|| "o2");
        engine.present_sheet(|| "o3");

        let before = engine.revision_signal().get();
        engine.dismiss_all_overlays();
        assert_eq!(engine.overlay_count(), 0);
        assert_eq!(engine.revision_signal().get(), before + 1);
    }

    #[test]
    fn test_dismiss_on_empty_overlay_stack_is_noop() {
        let mut engine = engine_with_tabs();
        let before = engine.revision_signal().get();
        engine.dismiss_overlay();
        engine.dismiss_all_overlays();
        assert_eq!(engine.revision_signal().get(), before);
    }

    #[test]
    fn test_double_registration_keeps_first() {
        let mut engine = engine_with_tabs();
        let result = engine.register_tabs(
            vec![TabSpec::new(AppTab::Home, "Again", || "again")],
            TabBarMode::Hidden,
            None,
        );
        assert_eq!(
            result,
            Err(RegistrationError::AlreadyRegistered { existing: 2 })
        );
        assert_eq!(engine.tabs().count(), 2);
        assert_eq!(engine.active_tab::<AppTab>(), Some(AppTab::Home));
    }

    #[test]
    fn test_unknown_initial_tab_leaves_engine_untouched() {
        let mut engine = engine();
        let result = engine.register_tabs(
            vec![TabSpec::new(AppTab::Home, "Home", || "home")],
            TabBarMode::Automatic,
            Some(AppTab::Profile),
        );
        assert_eq!(result, Err(RegistrationError::UnknownInitialTab));
        assert!(!engine.tabs().is_registered());
        assert_eq!(engine.active_tab::<AppTab>(), None);
    }
}
