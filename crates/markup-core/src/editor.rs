//! Host-side document tying a buffer, its annotations and the toggle state
//! together.
//!
//! `MarkupEditor` owns the text and the annotation store and keeps them in
//! step: every buffer edit shifts the annotations, runs typing continuation
//! and re-segments touched list blocks; every selection change refreshes the
//! toggle flags and reports changes to an optional observer.

use std::ops::Range;

use crate::algebra::apply_style;
use crate::annotation::{Annotation, ListKind, SpanType, StyleKind};
use crate::config::{CollapsedToggle, MarkupConfig};
use crate::continuation::{ToggleState, on_text_changed};
use crate::error::StoreError;
use crate::list::apply_list;
use crate::store::{AnnotationStore, SpanArena, check_invariants};
use crate::text::{EditorRope, TextBuffer};
use crate::types::{EditInfo, Selection};

/// Receives toggle state changes, e.g. to light up toolbar buttons.
pub trait ToggleObserver {
    fn bold_toggled(&mut self, on: bool);

    fn italic_toggled(&mut self, on: bool);

    fn ordered_list_toggled(&mut self, _on: bool) {}

    fn unordered_list_toggled(&mut self, _on: bool) {}
}

/// An annotated text document with a selection.
pub struct MarkupEditor<T = EditorRope, S = SpanArena> {
    buffer: T,
    store: S,
    selection: Selection,
    toggles: ToggleState,
    config: MarkupConfig,
    observer: Option<Box<dyn ToggleObserver>>,
}

impl MarkupEditor {
    /// Create an editor over `text` with no annotations.
    pub fn from_str(text: &str) -> Self {
        Self::new(EditorRope::from_str(text))
    }
}

impl<T: TextBuffer + Default, S: AnnotationStore + Default> Default for MarkupEditor<T, S> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: TextBuffer, S: AnnotationStore> MarkupEditor<T, S> {
    /// Create an editor with an empty store and the default config.
    pub fn new(buffer: T) -> Self
    where
        S: Default,
    {
        Self::with_parts(buffer, S::default(), MarkupConfig::default())
    }

    /// Create an editor from existing parts.
    ///
    /// The store is trusted to hold annotations consistent with `buffer`.
    pub fn with_parts(buffer: T, store: S, config: MarkupConfig) -> Self {
        let mut editor = Self {
            buffer,
            store,
            selection: Selection::default(),
            toggles: ToggleState::default(),
            config,
            observer: None,
        };
        editor.toggles =
            ToggleState::at_selection(&editor.store, editor.buffer.len_chars(), editor.selection);
        editor
    }

    pub fn with_config(mut self, config: MarkupConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_observer(mut self, observer: Box<dyn ToggleObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn set_observer(&mut self, observer: Option<Box<dyn ToggleObserver>>) {
        self.observer = observer;
    }

    // === Accessors ===

    pub fn buffer(&self) -> &T {
        &self.buffer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Direct store access. Callers must leave the store consistent.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn config(&self) -> &MarkupConfig {
        &self.config
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn toggles(&self) -> ToggleState {
        self.toggles
    }

    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// All annotations, ordered by position.
    pub fn annotations(&self) -> Vec<Annotation> {
        self.store.snapshot()
    }

    // === Selection ===

    /// Move the selection, clamped to the buffer, and refresh toggle flags.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamp(self.buffer.len_chars());
        self.refresh_toggles();
    }

    pub fn select_all(&mut self) {
        self.set_selection(Selection::new(0, self.buffer.len_chars()));
    }

    // === Text operations ===

    /// Insert text at char offset, returning edit info.
    ///
    /// The caret ends up after the inserted text.
    pub fn insert(&mut self, offset: usize, text: &str) -> EditInfo {
        let edit = EditInfo {
            edit_char_pos: offset.min(self.buffer.len_chars()),
            inserted_len: text.chars().count(),
            deleted_len: 0,
        };

        self.buffer.insert(edit.edit_char_pos, text);
        let shifted = self
            .store
            .shift_for_insert(edit.edit_char_pos, edit.inserted_len);
        self.settle("shift for insert", shifted);

        self.finish_edit(&edit);
        edit
    }

    /// Delete char range, returning edit info.
    pub fn delete(&mut self, range: Range<usize>) -> EditInfo {
        let range = self.clamp_range(range);
        let edit = EditInfo {
            edit_char_pos: range.start,
            inserted_len: 0,
            deleted_len: range.len(),
        };

        self.buffer.delete(edit.deleted_range());
        let shifted = self.store.shift_for_delete(edit.deleted_range());
        self.settle("shift for delete", shifted);

        self.finish_edit(&edit);
        edit
    }

    /// Replace char range with text, returning edit info.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> EditInfo {
        let range = self.clamp_range(range);
        let edit = EditInfo {
            edit_char_pos: range.start,
            inserted_len: text.chars().count(),
            deleted_len: range.len(),
        };

        self.buffer.replace(edit.deleted_range(), text);
        let shifted = self
            .store
            .shift_for_delete(edit.deleted_range())
            .and_then(|_| {
                self.store
                    .shift_for_insert(edit.edit_char_pos, edit.inserted_len)
            });
        self.settle("shift for replace", shifted);

        self.finish_edit(&edit);
        edit
    }

    /// Delete the current selection, if it is not collapsed.
    pub fn delete_selection(&mut self) -> Option<EditInfo> {
        if self.selection.is_collapsed() {
            return None;
        }
        Some(self.delete(self.selection.to_range()))
    }

    // === Toggles ===

    /// Toggle a style at the current selection.
    ///
    /// With nothing selected this flips the sticky flag (or styles the word
    /// under the caret, if configured). Returns whether annotations changed.
    pub fn toggle_style(&mut self, style: StyleKind) -> bool {
        if self.selection.is_collapsed()
            && self.config.collapsed_style_toggle == CollapsedToggle::Sticky
        {
            let on = self.toggles.flip_style(style);
            tracing::debug!(target: "markup::editor", ?style, on, "sticky toggle");
            self.notify_style(style, on);
            return false;
        }

        let result = apply_style(&mut self.store, &self.buffer, self.selection, style);
        let changed = self.settle("apply style", result);
        self.refresh_toggles();
        self.verify();
        changed
    }

    pub fn toggle_bold(&mut self) -> bool {
        self.toggle_style(StyleKind::Bold)
    }

    pub fn toggle_italic(&mut self) -> bool {
        self.toggle_style(StyleKind::Italic)
    }

    /// Toggle a list over the lines touched by the selection.
    pub fn toggle_list(&mut self, kind: ListKind) -> bool {
        let result = apply_list(&mut self.store, &self.buffer, self.selection, kind);
        let changed = self.settle("apply list", result);
        self.refresh_toggles();
        self.verify();
        changed
    }

    pub fn toggle_ordered_list(&mut self) -> bool {
        self.toggle_list(ListKind::Numbered)
    }

    pub fn toggle_unordered_list(&mut self) -> bool {
        self.toggle_list(ListKind::Bullet)
    }

    /// Toggle by span type at the current selection.
    pub fn update_span(&mut self, span_type: SpanType) -> bool {
        match span_type {
            SpanType::Bold => self.toggle_bold(),
            SpanType::Italic => self.toggle_italic(),
            SpanType::OrderedList => self.toggle_ordered_list(),
            SpanType::UnorderedList => self.toggle_unordered_list(),
        }
    }

    // === Internals ===

    fn clamp_range(&self, range: Range<usize>) -> Range<usize> {
        let len = self.buffer.len_chars();
        let end = range.end.min(len);
        range.start.min(end)..end
    }

    fn finish_edit(&mut self, edit: &EditInfo) {
        let result = on_text_changed(
            &mut self.store,
            &self.buffer,
            &self.toggles,
            edit.affected_range(),
        );
        self.settle("typing continuation", result);

        self.selection = Selection::collapsed(edit.affected_range().end);
        self.refresh_toggles();
        self.verify();
    }

    /// Unwrap a store result, logging a fault instead of propagating it.
    fn settle<R: Default>(&self, op: &'static str, result: Result<R, StoreError>) -> R {
        result.unwrap_or_else(|err| {
            tracing::warn!(target: "markup::editor", op, %err, "annotation store fault");
            R::default()
        })
    }

    fn refresh_toggles(&mut self) {
        let next =
            ToggleState::at_selection(&self.store, self.buffer.len_chars(), self.selection);
        let prev = std::mem::replace(&mut self.toggles, next);

        let Some(observer) = self.observer.as_mut() else {
            return;
        };
        if prev.bold != next.bold {
            observer.bold_toggled(next.bold);
        }
        if prev.italic != next.italic {
            observer.italic_toggled(next.italic);
        }
        if prev.ordered_list != next.ordered_list {
            observer.ordered_list_toggled(next.ordered_list);
        }
        if prev.unordered_list != next.unordered_list {
            observer.unordered_list_toggled(next.unordered_list);
        }
    }

    fn notify_style(&mut self, style: StyleKind, on: bool) {
        if let Some(observer) = self.observer.as_mut() {
            match style {
                StyleKind::Bold => observer.bold_toggled(on),
                StyleKind::Italic => observer.italic_toggled(on),
            }
        }
    }

    fn verify(&self) {
        if !self.config.assert_invariants {
            return;
        }
        if let Err(violation) = check_invariants(&self.store, self.buffer.len_chars()) {
            tracing::error!(target: "markup::editor", %violation, "annotation invariant broken");
            debug_assert!(false, "annotation invariant broken: {violation}");
        }
    }
}
