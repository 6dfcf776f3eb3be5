//! Style toggling over a selection.
//!
//! `apply_style` computes the store edit that toggles a style over the user's
//! selection: splitting, trimming, extending or removing existing annotations
//! so that afterwards the selection is either fully covered by one annotation
//! of that style or fully free of it.

use std::ops::Range;

use crate::annotation::{AnnotationId, AnnotationKind, KindFilter, ListKind, SpanType, StyleKind};
use crate::boundary::{WordRange, word_range_at};
use crate::error::StoreError;
use crate::list::apply_list;
use crate::optimize::coalesce;
use crate::store::AnnotationStore;
use crate::text::TextBuffer;
use crate::types::Selection;

/// Toggle `style` over `selection`.
///
/// A collapsed selection on a word toggles the whole word. Offsets past the
/// end of the buffer are clamped and a reversed selection is normalized.
///
/// Returns whether the store changed.
pub fn apply_style<S, T>(
    store: &mut S,
    text: &T,
    selection: Selection,
    style: StyleKind,
) -> Result<bool, StoreError>
where
    S: AnnotationStore + ?Sized,
    T: TextBuffer + ?Sized,
{
    let len = text.len_chars();
    if len == 0 {
        tracing::debug!(target: "markup::algebra", ?style, "empty buffer, nothing to style");
        return Ok(false);
    }

    let selection = selection.clamp(len);
    let picked = selection.to_range();
    let word = if selection.is_collapsed() {
        word_range_at(text, picked.start)
    } else {
        None
    };
    let target = word.as_ref().map_or(picked.clone(), |w| w.word.clone());
    let filter = KindFilter::Style(style);

    let mut handled = false;
    for id in store.overlapping(picked.clone(), filter) {
        let span = store.range_of(id)?;
        if span == target {
            tracing::debug!(target: "markup::algebra", ?style, ?span, "exact match, removing");
            store.remove(id)?;
        } else if let Some(word) = &word {
            carve_word(store, id, span, word)?;
        } else {
            trim_or_split(store, id, span, &picked)?;
        }
        handled = true;
    }

    if !handled {
        if target.is_empty() {
            return Ok(false);
        }
        tracing::debug!(target: "markup::algebra", ?style, range = ?target, "new annotation");
        store.insert(AnnotationKind::Style(style), target.clone());
    }

    let candidates = store.overlapping(widen(&target, len), filter);
    coalesce(store, &candidates)?;
    Ok(true)
}

/// Route a toggle request to the style or list algebra.
pub fn update_span<S, T>(
    store: &mut S,
    text: &T,
    span_type: SpanType,
    selection: Selection,
) -> Result<bool, StoreError>
where
    S: AnnotationStore + ?Sized,
    T: TextBuffer + ?Sized,
{
    match span_type {
        SpanType::Bold => apply_style(store, text, selection, StyleKind::Bold),
        SpanType::Italic => apply_style(store, text, selection, StyleKind::Italic),
        SpanType::OrderedList => apply_list(store, text, selection, ListKind::Numbered),
        SpanType::UnorderedList => apply_list(store, text, selection, ListKind::Bullet),
    }
}

/// Cut the word out of an annotation that covers the caret.
fn carve_word<S>(
    store: &mut S,
    id: AnnotationId,
    span: Range<usize>,
    word: &WordRange,
) -> Result<(), StoreError>
where
    S: AnnotationStore + ?Sized,
{
    let kind = store.kind_of(id)?;
    tracing::debug!(target: "markup::algebra", %kind, ?span, word = ?word.word, "carving word");

    if span.start < word.previous {
        store.insert(kind, span.start..word.previous);
    }
    if span.end > word.next + 1 {
        store.insert(kind, word.next + 1..span.end);
    }
    store.remove(id)?;
    Ok(())
}

/// Reconcile one existing annotation with a non-word selection.
///
/// An annotation that starts at or before the selection and ends inside it
/// is extended to the selection end; one that contains the selection loses
/// the selected part (split in two when the selection is strictly inside).
/// An annotation starting inside the selection is extended back to the
/// selection start.
pub(crate) fn trim_or_split<S>(
    store: &mut S,
    id: AnnotationId,
    span: Range<usize>,
    selection: &Range<usize>,
) -> Result<(), StoreError>
where
    S: AnnotationStore + ?Sized,
{
    let (start, end) = (selection.start, selection.end);

    let case = if span.start <= start {
        if span.end < end {
            store.set_range(id, span.start..end)?;
            "extend end"
        } else if span.start == start && span.end > end {
            store.set_range(id, end..span.end)?;
            "trim head"
        } else if span.end > end {
            let kind = store.kind_of(id)?;
            store.set_range(id, span.start..start)?;
            store.insert(kind, end..span.end);
            "split"
        } else {
            store.set_range(id, span.start..start)?;
            "trim tail"
        }
    } else if span.end < end {
        store.set_range(id, start..end)?;
        "swallow"
    } else {
        store.set_range(id, start..span.end)?;
        "extend start"
    };

    tracing::debug!(target: "markup::algebra", case, ?span, ?selection, "trim/split");
    Ok(())
}

/// `range` grown by one char on each side, clamped to the buffer.
pub(crate) fn widen(range: &Range<usize>, len: usize) -> Range<usize> {
    range.start.saturating_sub(1)..(range.end + 1).min(len)
}
