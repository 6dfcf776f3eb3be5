//! Editor configuration.

use serde::{Deserialize, Serialize};

/// What a style toggle does when nothing is selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollapsedToggle {
    /// Flip the sticky flag so the next typed text gets (or loses) the style.
    #[default]
    Sticky,
    /// Style the word under the caret.
    Word,
}

/// Settings for a `MarkupEditor`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    pub collapsed_style_toggle: CollapsedToggle,
    /// Check annotation invariants after every editor operation.
    pub assert_invariants: bool,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            collapsed_style_toggle: CollapsedToggle::default(),
            assert_invariants: cfg!(debug_assertions),
        }
    }
}
