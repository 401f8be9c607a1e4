//! Back-stack - the ordered navigation history of one tab.
//!
//! Index 0 is the root, the last entry is the visible top. Once a stack has a
//! root it is never empty again: single pops refuse to remove the root, and
//! the non-local pops (`pop_to_root`, pop-above-marker) remove their whole
//! range in one drain so observers never see a half-updated stack.

use crate::engine::entry::ScreenEntry;
use crate::types::Marker;

// =============================================================================
// Stack State
// =============================================================================

/// Depth state of a stack, as seen by the engine's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackState {
    /// No root yet. Only the implicit tabless stack starts here; the first
    /// push roots it.
    Empty,
    /// Exactly the root. No pop possible.
    Rooted,
    /// Two or more entries. Pop possible.
    Nested,
}

// =============================================================================
// NavStack
// =============================================================================

/// One back-stack: root-first, top-last.
pub struct NavStack<V> {
    entries: Vec<ScreenEntry<V>>,
}

impl<V> NavStack<V> {
    /// Empty stack. Used only for the implicit tabless stack; registered tabs
    /// are created rooted.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Stack rooted at `root`. The root can never be popped.
    pub fn with_root(root: ScreenEntry<V>) -> Self {
        Self {
            entries: vec![root],
        }
    }

    pub fn state(&self) -> StackState {
        match self.entries.len() {
            0 => StackState::Empty,
            1 => StackState::Rooted,
            _ => StackState::Nested,
        }
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn top(&self) -> Option<&ScreenEntry<V>> {
        self.entries.last()
    }

    pub fn entries(&self) -> &[ScreenEntry<V>] {
        &self.entries
    }

    /// Append a new top entry. Always legal; prior contents are untouched.
    pub fn push(&mut self, entry: ScreenEntry<V>) {
        self.entries.push(entry);
    }

    /// Remove the top entry, unless that would remove the root (or the stack
    /// is empty). Returns the removed entry.
    pub fn pop(&mut self) -> Option<ScreenEntry<V>> {
        if self.entries.len() <= 1 {
            return None;
        }
        self.entries.pop()
    }

    /// Remove everything above the root in one step. Returns the removed
    /// entries in stack order (bottom-most first). Empty when already rooted.
    pub fn pop_to_root(&mut self) -> Vec<ScreenEntry<V>> {
        if self.entries.len() <= 1 {
            return Vec::new();
        }
        self.entries.split_off(1)
    }

    /// Resolve a marker to the index of the topmost entry bearing it.
    ///
    /// Markers are advisory and not unique; recency of push breaks ties.
    pub fn resolve_marker(&self, marker: &Marker) -> Option<usize> {
        self.entries
            .iter()
            .rposition(|entry| entry.marker.as_ref() == Some(marker))
    }

    /// Remove every entry strictly above `index` in one step. Returns the
    /// removed entries in stack order. Empty when `index` is already the top.
    pub fn pop_above(&mut self, index: usize) -> Vec<ScreenEntry<V>> {
        debug_assert!(index < self.entries.len());
        if index + 1 >= self.entries.len() {
            return Vec::new();
        }
        self.entries.split_off(index + 1)
    }
}

impl<V> Default for NavStack<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for NavStack<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavStack")
            .field("depth", &self.entries.len())
            .field("state", &self.state())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScreenId;

    fn entry(marker: Option<&str>) -> ScreenEntry<&'static str> {
        ScreenEntry::create(|| "view", marker.map(Marker::from), false)
    }

    fn ids<V>(stack: &NavStack<V>) -> Vec<ScreenId> {
        stack.entries().iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_root_survives_pop_and_pop_to_root() {
        let mut stack = NavStack::with_root(entry(None));
        assert_eq!(stack.state(), StackState::Rooted);

        assert!(stack.pop().is_none(), "pop on rooted stack is a no-op");
        assert!(stack.pop_to_root().is_empty());
        assert_eq!(stack.depth(), 1);

        stack.push(entry(None));
        stack.push(entry(None));
        assert_eq!(stack.state(), StackState::Nested);

        let removed = stack.pop_to_root();
        assert_eq!(removed.len(), 2);
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.state(), StackState::Rooted);
    }

    #[test]
    fn test_pop_removes_exactly_the_top() {
        let mut stack = NavStack::with_root(entry(None));
        stack.push(entry(None));
        stack.push(entry(None));

        let before = ids(&stack);
        let removed = stack.pop().unwrap();

        assert_eq!(removed.id, before[2]);
        assert_eq!(ids(&stack), before[..2].to_vec(), "entries below unchanged");
    }

    #[test]
    fn test_marker_resolves_to_latest_bearer() {
        // [root(nil), "x", nil, "x", nil] - lookup must hit index 3.
        let mut stack = NavStack::with_root(entry(None));
        stack.push(entry(Some("x")));
        stack.push(entry(None));
        stack.push(entry(Some("x")));
        stack.push(entry(None));

        assert_eq!(stack.resolve_marker(&"x".into()), Some(3));

        let removed = stack.pop_above(3);
        assert_eq!(removed.len(), 1);
        assert_eq!(stack.depth(), 4, "root + 3 entries remain");
        assert_eq!(
            stack.top().unwrap().marker,
            Some(Marker::from("x")),
            "the later x is now the top"
        );
    }

    #[test]
    fn test_missing_marker_leaves_stack_untouched() {
        let mut stack = NavStack::with_root(entry(None));
        stack.push(entry(Some("a")));
        let before = ids(&stack);

        assert_eq!(stack.resolve_marker(&"nonexistent".into()), None);
        assert_eq!(ids(&stack), before);
    }

    #[test]
    fn test_pop_above_top_is_noop() {
        let mut stack = NavStack::with_root(entry(None));
        stack.push(entry(Some("here")));

        let idx = stack.resolve_marker(&"here".into()).unwrap();
        assert!(stack.pop_above(idx).is_empty());
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn test_implicit_stack_roots_on_first_push() {
        let mut stack: NavStack<&str> = NavStack::new();
        assert_eq!(stack.state(), StackState::Empty);

        stack.push(entry(None));
        assert_eq!(stack.state(), StackState::Rooted);
        assert!(stack.pop().is_none(), "first push became the root");
    }
}
