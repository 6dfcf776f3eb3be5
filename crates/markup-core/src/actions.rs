//! Editor actions.
//!
//! The `EditorAction` enum represents semantic editing operations on a
//! `MarkupEditor`, decoupled from how they're triggered (toolbar, keyboard,
//! programmatic input).

use crate::annotation::SpanType;
use crate::types::Selection;

/// All possible editor actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    // === Text Insertion ===
    /// Insert text at the given range (replacing any selected content).
    Insert { text: String, range: Selection },

    // === Deletion ===
    /// Delete content backward (Backspace).
    DeleteBackward { range: Selection },

    /// Delete content forward (Delete key).
    DeleteForward { range: Selection },

    // === Formatting ===
    /// Toggle bold on selection, or the sticky bold flag at a caret.
    ToggleBold,

    /// Toggle italic on selection, or the sticky italic flag at a caret.
    ToggleItalic,

    /// Toggle a numbered list over the selected lines.
    ToggleOrderedList,

    /// Toggle a bulleted list over the selected lines.
    ToggleUnorderedList,

    // === Selection ===
    /// Select all content.
    SelectAll,

    // === Navigation ===
    /// Move cursor to position.
    MoveCursor { offset: usize },

    /// Extend selection to position.
    ExtendSelection { offset: usize },
}

impl EditorAction {
    /// Update the range in actions that use one.
    pub fn with_range(self, range: Selection) -> Self {
        match self {
            Self::Insert { text, .. } => Self::Insert { text, range },
            Self::DeleteBackward { .. } => Self::DeleteBackward { range },
            Self::DeleteForward { .. } => Self::DeleteForward { range },
            other => other,
        }
    }

    /// The formatting toggle this action performs, if any.
    pub fn span_type(&self) -> Option<SpanType> {
        match self {
            Self::ToggleBold => Some(SpanType::Bold),
            Self::ToggleItalic => Some(SpanType::Italic),
            Self::ToggleOrderedList => Some(SpanType::OrderedList),
            Self::ToggleUnorderedList => Some(SpanType::UnorderedList),
            _ => None,
        }
    }
}

impl From<SpanType> for EditorAction {
    fn from(span_type: SpanType) -> Self {
        match span_type {
            SpanType::Bold => Self::ToggleBold,
            SpanType::Italic => Self::ToggleItalic,
            SpanType::OrderedList => Self::ToggleOrderedList,
            SpanType::UnorderedList => Self::ToggleUnorderedList,
        }
    }
}
