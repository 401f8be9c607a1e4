//! Overlay stack - modally presented units above the active back-stack.
//!
//! Tracked independently of the back-stacks. Only the topmost overlay is
//! interactable/dismissible; draining removes topmost-first so each dismissal
//! is visually valid at the moment it executes.

use crate::engine::entry::OverlayEntry;

/// Ordered presented overlays, topmost last.
pub struct OverlayStack<V> {
    overlays: Vec<OverlayEntry<V>>,
}

impl<V> OverlayStack<V> {
    pub fn new() -> Self {
        Self {
            overlays: Vec::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.overlays.len()
    }

    /// Overlay dimension of the engine state machine: Clear / Presenting(n).
    pub fn is_presenting(&self) -> bool {
        !self.overlays.is_empty()
    }

    pub fn top(&self) -> Option<&OverlayEntry<V>> {
        self.overlays.last()
    }

    pub fn entries(&self) -> &[OverlayEntry<V>] {
        &self.overlays
    }

    /// Present a new topmost overlay.
    pub fn push(&mut self, overlay: OverlayEntry<V>) {
        self.overlays.push(overlay);
    }

    /// Remove the topmost overlay. None when nothing is presented.
    pub fn pop_top(&mut self) -> Option<OverlayEntry<V>> {
        self.overlays.pop()
    }

    /// Remove every overlay, topmost-first. The returned order is the order
    /// in which the host must dismiss them.
    pub fn drain_top_first(&mut self) -> Vec<OverlayEntry<V>> {
        let mut drained = std::mem::take(&mut self.overlays);
        drained.reverse();
        drained
    }
}

impl<V> Default for OverlayStack<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for OverlayStack<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayStack")
            .field("count", &self.overlays.len())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PresentationStyle;

    fn overlay(name: &'static str) -> OverlayEntry<&'static str> {
        OverlayEntry::create(move || name, PresentationStyle::sheet())
    }

    #[test]
    fn test_dismiss_removes_only_the_top() {
        let mut overlays = OverlayStack::new();
        overlays.push(overlay("o1"));
        overlays.push(overlay("o2"));

        let removed = overlays.pop_top().unwrap();
        assert_eq!(removed.view, "o2");
        assert_eq!(overlays.count(), 1);
        assert_eq!(overlays.top().unwrap().view, "o1");
    }

    #[test]
    fn test_pop_on_empty_is_none() {
        let mut overlays: OverlayStack<&str> = OverlayStack::new();
        assert!(overlays.pop_top().is_none());
        assert!(!overlays.is_presenting());
    }

    #[test]
    fn test_drain_is_topmost_first() {
        let mut overlays = OverlayStack::new();
        overlays.push(overlay("o1"));
        overlays.push(overlay("o2"));
        overlays.push(overlay("o3"));

        let drained = overlays.drain_top_first();
        let order: Vec<_> = drained.iter().map(|o| o.view).collect();
        assert_eq!(order, vec!["o3", "o2", "o1"]);
        assert_eq!(overlays.count(), 0);
    }
}
