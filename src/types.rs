//! Core types for spark-nav.
//!
//! These types define the foundation that everything builds on.
//! They flow between the engine, the router facade, and the host adapter.

use thiserror::Error;

// =============================================================================
// Screen Identity
// =============================================================================

/// Process-unique identity of a screen entry.
///
/// Assigned once when the engine executes a push (or registers a tab root),
/// stable for the entry's lifetime, never reused. Using a plain integer for
/// exact comparison - no identity-based hashing of view objects needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(pub(crate) u64);

impl ScreenId {
    /// Raw numeric value, mainly useful for logging and host-side bookkeeping.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ScreenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s{}", self.0)
    }
}

// =============================================================================
// Marker
// =============================================================================

/// Advisory label enabling non-local "pop back to here" jumps.
///
/// Markers are not required to be unique within a stack. Lookups resolve to
/// the topmost (most recently pushed) entry bearing the marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Marker(String);

impl Marker {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Marker {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

impl From<String> for Marker {
    fn from(label: String) -> Self {
        Self(label)
    }
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Presentation Style
// =============================================================================

/// Sheet height hint passed through to the host adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detent {
    Medium,
    Large,
}

/// How a modal overlay is presented above the active stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationStyle {
    /// Partial-height modal with optional detent hints.
    Sheet { detents: Vec<Detent> },
    /// Covers the whole scene, including tab chrome.
    FullScreen,
}

impl PresentationStyle {
    /// Sheet with the default detents (medium, then large).
    pub fn sheet() -> Self {
        Self::Sheet {
            detents: vec![Detent::Medium, Detent::Large],
        }
    }

    /// Sheet with explicit detent hints.
    pub fn sheet_with(detents: Vec<Detent>) -> Self {
        Self::Sheet { detents }
    }

    pub fn is_sheet(&self) -> bool {
        matches!(self, Self::Sheet { .. })
    }

    pub fn is_full_screen(&self) -> bool {
        matches!(self, Self::FullScreen)
    }
}

// =============================================================================
// Tab Bar Mode
// =============================================================================

/// How the host should display tab chrome, fixed at registration time.
///
/// `V` is the crate-wide opaque view description type; a custom provider
/// produces the replacement chrome as a view description on demand.
pub enum TabBarMode<V> {
    /// Host decides (normally: show its native tab bar).
    Automatic,
    /// Never show tab chrome.
    Hidden,
    /// Caller-supplied chrome, built lazily by the provider.
    Custom(Box<dyn Fn() -> V>),
}

impl<V> std::fmt::Debug for TabBarMode<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Automatic => f.write_str("TabBarMode::Automatic"),
            Self::Hidden => f.write_str("TabBarMode::Hidden"),
            Self::Custom(_) => f.write_str("TabBarMode::Custom(..)"),
        }
    }
}

// =============================================================================
// Engine Config
// =============================================================================

/// Engine-wide policy knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Whether a sheet may be stacked on top of a presented full-screen
    /// overlay. When false, presenting a sheet in that situation replaces the
    /// full-screen overlay instead of stacking on it.
    pub allow_sheet_over_full_screen: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            allow_sheet_over_full_screen: true,
        }
    }
}

// =============================================================================
// Registration Errors
// =============================================================================

/// The one reportable failure surface: tab registration misconfiguration.
///
/// Everything else in the engine is a total function over its state space -
/// benign misses (unknown marker, pop on root, dismiss with nothing
/// presented) are defined as no-ops, not errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    /// Tabs were already registered on this engine. First call wins; the
    /// existing registration is left untouched.
    #[error("tabs already registered ({existing} tabs); registration happens at most once per engine")]
    AlreadyRegistered { existing: usize },

    /// Registration requires at least one tab.
    #[error("tab registration requires at least one tab")]
    EmptyTabSet,

    /// The requested initial tab is not one of the registered identifiers.
    #[error("initial tab is not among the registered tab identifiers")]
    UnknownInitialTab,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_from_str_and_equality() {
        let a: Marker = "checkout".into();
        let b = Marker::new(String::from("checkout"));
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "checkout");
    }

    #[test]
    fn test_default_sheet_detents() {
        let style = PresentationStyle::sheet();
        assert!(style.is_sheet());
        match style {
            PresentationStyle::Sheet { detents } => {
                assert_eq!(detents, vec![Detent::Medium, Detent::Large]);
            }
            PresentationStyle::FullScreen => unreachable!(),
        }
    }

    #[test]
    fn test_config_defaults_to_permissive_stacking() {
        let config = EngineConfig::default();
        assert!(config.allow_sheet_over_full_screen);
    }
}
