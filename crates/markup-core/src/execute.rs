//! Action execution for markup editors.
//!
//! This module provides the `execute_action` function that applies
//! `EditorAction` operations to a `MarkupEditor`, whatever its buffer and
//! store types.

use crate::actions::EditorAction;
use crate::editor::MarkupEditor;
use crate::store::AnnotationStore;
use crate::text::TextBuffer;
use crate::types::Selection;

/// Execute an editor action.
///
/// This is the central dispatch point for all editor operations. Returns
/// true if the text or its annotations changed; selection moves and sticky
/// toggles return false.
pub fn execute_action<T, S>(editor: &mut MarkupEditor<T, S>, action: &EditorAction) -> bool
where
    T: TextBuffer,
    S: AnnotationStore,
{
    match action {
        EditorAction::Insert { text, range } => execute_insert(editor, text, *range),
        EditorAction::DeleteBackward { range } => execute_delete_backward(editor, *range),
        EditorAction::DeleteForward { range } => execute_delete_forward(editor, *range),
        EditorAction::ToggleBold => editor.toggle_bold(),
        EditorAction::ToggleItalic => editor.toggle_italic(),
        EditorAction::ToggleOrderedList => editor.toggle_ordered_list(),
        EditorAction::ToggleUnorderedList => editor.toggle_unordered_list(),
        EditorAction::SelectAll => {
            editor.select_all();
            false
        }
        EditorAction::MoveCursor { offset } => {
            editor.set_selection(Selection::collapsed(*offset));
            false
        }
        EditorAction::ExtendSelection { offset } => {
            let anchor = editor.selection().anchor;
            editor.set_selection(Selection::new(anchor, *offset));
            false
        }
    }
}

fn execute_insert<T, S>(editor: &mut MarkupEditor<T, S>, text: &str, range: Selection) -> bool
where
    T: TextBuffer,
    S: AnnotationStore,
{
    if range.is_collapsed() {
        if text.is_empty() {
            return false;
        }
        editor.insert(range.start(), text);
    } else {
        editor.replace(range.to_range(), text);
    }
    true
}

fn execute_delete_backward<T, S>(editor: &mut MarkupEditor<T, S>, range: Selection) -> bool
where
    T: TextBuffer,
    S: AnnotationStore,
{
    if !range.is_collapsed() {
        editor.delete(range.to_range());
        return true;
    }

    let caret = range.start().min(editor.len_chars());
    if caret == 0 {
        return false;
    }
    editor.delete(caret - 1..caret);
    true
}

fn execute_delete_forward<T, S>(editor: &mut MarkupEditor<T, S>, range: Selection) -> bool
where
    T: TextBuffer,
    S: AnnotationStore,
{
    if !range.is_collapsed() {
        editor.delete(range.to_range());
        return true;
    }

    if range.start() >= editor.len_chars() {
        return false;
    }
    editor.delete(range.start()..range.start() + 1);
    true
}
