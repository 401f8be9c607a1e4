//! Tab registry - the fixed mapping from tab identifier to its own stack.
//!
//! The public API is generic over a concrete tab identifier type, but the
//! registry stores type-erased tokens: registration captures the concrete
//! type exactly once (`TypeId` tag plus an equality resolver built from it)
//! and any later call with a different type is rejected as a caller
//! misconfiguration, never a crash.
//!
//! Before registration the registry is degenerate: a single implicit,
//! identifier-less stack (tabless mode). Registration is at-most-once; the
//! tab set is immutable in number and identity for the engine's lifetime.

use std::any::{Any, TypeId};
use std::rc::Rc;

use crate::engine::entry::ScreenEntry;
use crate::engine::stack::NavStack;
use crate::types::RegistrationError;

// =============================================================================
// Lookup Result
// =============================================================================

/// Outcome of resolving a caller-supplied tab identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabLookup {
    /// No tabs registered yet (tabless mode).
    Unregistered,
    /// Identifier type differs from the registered type. Caller error.
    TypeMismatch {
        expected: &'static str,
        got: &'static str,
    },
    /// Right type, but the value is not one of the registered tabs.
    UnknownTab,
    /// Slot index of the matching tab.
    Found(usize),
}

// =============================================================================
// Tab Slot
// =============================================================================

/// One registered tab: its erased identifier token, display metadata, and the
/// stack it exclusively owns.
pub(crate) struct TabSlot<V> {
    token: Rc<dyn Any>,
    title: String,
    icon: Option<String>,
    stack: NavStack<V>,
}

/// Compares an erased query token against the stored tokens. Built once at
/// registration from the concrete identifier type.
type TokenResolver = Box<dyn Fn(&[Rc<dyn Any>], &dyn Any) -> Option<usize>>;

// =============================================================================
// TabRegistry
// =============================================================================

pub struct TabRegistry<V> {
    /// Tabless-mode stack; abandoned once tabs are registered.
    implicit: NavStack<V>,
    slots: Vec<TabSlot<V>>,
    type_tag: Option<TypeId>,
    type_name: Option<&'static str>,
    resolver: Option<TokenResolver>,
}

impl<V> TabRegistry<V> {
    pub fn new() -> Self {
        Self {
            implicit: NavStack::new(),
            slots: Vec::new(),
            type_tag: None,
            type_name: None,
            resolver: None,
        }
    }

    pub fn is_registered(&self) -> bool {
        !self.slots.is_empty()
    }

    pub fn count(&self) -> usize {
        self.slots.len()
    }

    /// Bind the tab set. First call wins; a second call fails without
    /// touching the existing registration.
    ///
    /// Each tuple is (identifier, title, icon reference, root entry). The
    /// root entries were already evaluated by the engine, so every tab's
    /// stack is born rooted.
    pub(crate) fn register<T: PartialEq + 'static>(
        &mut self,
        tabs: Vec<(T, String, Option<String>, ScreenEntry<V>)>,
    ) -> Result<(), RegistrationError> {
        if self.is_registered() {
            return Err(RegistrationError::AlreadyRegistered {
                existing: self.slots.len(),
            });
        }
        if tabs.is_empty() {
            return Err(RegistrationError::EmptyTabSet);
        }

        for (id, title, icon, root) in tabs {
            self.slots.push(TabSlot {
                token: Rc::new(id),
                title,
                icon,
                stack: NavStack::with_root(root),
            });
        }
        self.type_tag = Some(TypeId::of::<T>());
        self.type_name = Some(std::any::type_name::<T>());
        self.resolver = Some(Box::new(|tokens, query| {
            let query = query.downcast_ref::<T>()?;
            tokens
                .iter()
                .position(|token| token.downcast_ref::<T>().is_some_and(|id| id == query))
        }));
        Ok(())
    }

    /// Resolve an erased identifier to a slot index, reporting why resolution
    /// failed so the engine can diagnose caller errors precisely.
    pub fn resolve(&self, query: &dyn Any, query_type: &'static str) -> TabLookup {
        let Some(tag) = self.type_tag else {
            return TabLookup::Unregistered;
        };
        if query.type_id() != tag {
            return TabLookup::TypeMismatch {
                expected: self.type_name.unwrap_or("<unknown>"),
                got: query_type,
            };
        }
        let tokens: Vec<Rc<dyn Any>> = self.slots.iter().map(|s| s.token.clone()).collect();
        match self.resolver.as_ref().and_then(|r| r(&tokens, query)) {
            Some(index) => TabLookup::Found(index),
            None => TabLookup::UnknownTab,
        }
    }

    /// The identifier token of a slot, for typed reads on the router side.
    pub fn token(&self, index: usize) -> Option<Rc<dyn Any>> {
        self.slots.get(index).map(|s| s.token.clone())
    }

    pub fn title(&self, index: usize) -> Option<&str> {
        self.slots.get(index).map(|s| s.title.as_str())
    }

    pub fn icon(&self, index: usize) -> Option<&str> {
        self.slots.get(index).and_then(|s| s.icon.as_deref())
    }

    pub fn stack(&self, index: usize) -> Option<&NavStack<V>> {
        self.slots.get(index).map(|s| &s.stack)
    }

    /// The stack the engine currently mutates: slot `index` once registered,
    /// the implicit stack before that (`index` < 0).
    pub(crate) fn active_stack(&self, index: i32) -> &NavStack<V> {
        if index < 0 {
            &self.implicit
        } else {
            &self.slots[index as usize].stack
        }
    }

    pub(crate) fn active_stack_mut(&mut self, index: i32) -> &mut NavStack<V> {
        if index < 0 {
            &mut self.implicit
        } else {
            &mut self.slots[index as usize].stack
        }
    }

    /// Depth of the implicit stack, checked at registration to diagnose
    /// pushes that happened before tabs were established.
    pub(crate) fn implicit_depth(&self) -> usize {
        self.implicit.depth()
    }
}

impl<V> Default for TabRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for TabRegistry<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabRegistry")
            .field("tabs", &self.slots.len())
            .field("type", &self.type_name)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
