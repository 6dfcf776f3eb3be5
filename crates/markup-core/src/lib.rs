//! markup-core: annotation interval algebra for rich-text editing.
//!
//! This crate provides:
//! - `AnnotationStore` trait and the `SpanArena` store
//! - `apply_style` / `apply_list` - style and list toggles over a selection
//! - `segment` - per-line list annotations derived from list blocks
//! - `on_text_changed` - typing continuation driven by sticky toggle flags
//! - `MarkupEditor` - a buffer, its annotations and a selection kept in step
//!
//! Everything is generic over `TextBuffer`; `EditorRope` is the ropey-backed
//! default.

pub mod actions;
pub mod algebra;
pub mod annotation;
pub mod boundary;
pub mod config;
pub mod continuation;
pub mod editor;
pub mod error;
pub mod execute;
pub mod list;
pub mod optimize;
pub mod store;
pub mod text;
pub mod types;

pub use actions::EditorAction;
pub use algebra::{apply_style, update_span};
pub use annotation::{
    Annotation, AnnotationId, AnnotationKind, KindFilter, ListKind, SpanType, StyleKind, overlaps,
};
pub use boundary::{
    WordRange, is_on_word, line_end, line_start, next_occurrence, next_word_boundary,
    previous_occurrence, previous_word_boundary, word_range_at,
};
pub use config::{CollapsedToggle, MarkupConfig};
pub use continuation::{ToggleState, on_text_changed};
pub use editor::{MarkupEditor, ToggleObserver};
pub use error::{InvariantViolation, StoreError};
pub use execute::execute_action;
pub use list::{apply_list, segment, segment_range};
pub use optimize::coalesce;
pub use smol_str::SmolStr;
pub use store::{AnnotationStore, SpanArena, check_invariants};
pub use text::{EditorRope, TextBuffer};
pub use types::{EditInfo, Selection};

#[cfg(test)]
mod tests;
