//! Typing continuation: whether freshly inserted text carries a style.
//!
//! Each style has a sticky flag. After an insert, text typed while a flag is
//! on picks up that style, and text typed while it is off breaks an existing
//! run of it. List lines around the edit are re-segmented either way.

use std::ops::Range;

use crate::algebra::widen;
use crate::annotation::{AnnotationId, AnnotationKind, KindFilter, ListKind, StyleKind};
use crate::error::StoreError;
use crate::list::segment_range;
use crate::optimize::coalesce;
use crate::store::AnnotationStore;
use crate::text::TextBuffer;
use crate::types::Selection;

/// Per-kind toggle flags.
///
/// The style flags are sticky: they decide what the next typed text looks
/// like. The list flags only mirror whether the caret sits in a list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ToggleState {
    pub bold: bool,
    pub italic: bool,
    pub ordered_list: bool,
    pub unordered_list: bool,
}

impl ToggleState {
    pub fn style(&self, style: StyleKind) -> bool {
        match style {
            StyleKind::Bold => self.bold,
            StyleKind::Italic => self.italic,
        }
    }

    pub fn set_style(&mut self, style: StyleKind, on: bool) {
        match style {
            StyleKind::Bold => self.bold = on,
            StyleKind::Italic => self.italic = on,
        }
    }

    /// Flip a style flag, returning its new value.
    pub fn flip_style(&mut self, style: StyleKind) -> bool {
        let on = !self.style(style);
        self.set_style(style, on);
        on
    }

    pub fn list(&self, kind: ListKind) -> bool {
        match kind {
            ListKind::Numbered => self.ordered_list,
            ListKind::Bullet => self.unordered_list,
        }
    }

    /// Flags as implied by the annotations under `selection`.
    ///
    /// For a range, a flag is on when some annotation of that kind overlaps
    /// it. For a caret, a style flag follows the char before the caret (the
    /// first char at offset 0) and a list flag follows the caret's line.
    pub fn at_selection<S>(store: &S, len: usize, selection: Selection) -> Self
    where
        S: AnnotationStore + ?Sized,
    {
        let selection = selection.clamp(len);
        let (style_query, list_query) = if selection.is_collapsed() {
            let caret = selection.head;
            let list_query = if caret < len {
                caret..caret + 1
            } else {
                caret.saturating_sub(1)..caret
            };
            (caret.saturating_sub(1)..caret.max(1), list_query)
        } else {
            (selection.to_range(), selection.to_range())
        };

        let has = |range: &Range<usize>, filter| !store.overlapping(range.clone(), filter).is_empty();
        Self {
            bold: has(&style_query, KindFilter::Style(StyleKind::Bold)),
            italic: has(&style_query, KindFilter::Style(StyleKind::Italic)),
            ordered_list: has(&list_query, KindFilter::ListBlock(ListKind::Numbered)),
            unordered_list: has(&list_query, KindFilter::ListBlock(ListKind::Bullet)),
        }
    }
}

/// Reconcile styles and list lines after an edit.
///
/// `inserted` is the inserted text in post-edit offsets; the store must
/// already have been shifted for the edit. An empty range marks a pure
/// deletion at that point, which only re-joins annotations that now touch.
/// A range reaching past the end of the buffer is clamped to it.
pub fn on_text_changed<S, T>(
    store: &mut S,
    text: &T,
    toggles: &ToggleState,
    inserted: Range<usize>,
) -> Result<(), StoreError>
where
    S: AnnotationStore + ?Sized,
    T: TextBuffer + ?Sized,
{
    let len = text.len_chars();
    let end = inserted.end.min(len);
    let inserted = inserted.start.min(end)..end;
    let around = widen(&inserted, len);

    if inserted.is_empty() {
        let filters = StyleKind::ALL
            .map(KindFilter::Style)
            .into_iter()
            .chain([ListKind::Bullet, ListKind::Numbered].map(KindFilter::ListBlock));
        for filter in filters {
            let candidates = store.overlapping(around.clone(), filter);
            coalesce(store, &candidates)?;
        }
    } else {
        for style in StyleKind::ALL {
            let filter = KindFilter::Style(style);
            let found = store.overlapping(inserted.clone(), filter);
            let on = toggles.style(style);

            if found.is_empty() && on {
                tracing::debug!(target: "markup::continuation", ?style, ?inserted, "typed text picks up style");
                store.insert(AnnotationKind::Style(style), inserted.clone());
                let candidates = store.overlapping(around.clone(), filter);
                coalesce(store, &candidates)?;
            } else if !found.is_empty() && !on {
                tracing::debug!(target: "markup::continuation", ?style, ?inserted, "typed text sheds style");
                for id in found {
                    shed(store, id, &inserted)?;
                }
            }
        }
    }

    segment_range(store, text, around)?;
    Ok(())
}

/// Cut `inserted` out of an annotation, keeping what lies on either side.
fn shed<S>(store: &mut S, id: AnnotationId, inserted: &Range<usize>) -> Result<(), StoreError>
where
    S: AnnotationStore + ?Sized,
{
    let span = store.range_of(id)?;
    let kind = store.kind_of(id)?;

    if inserted.end < span.end {
        store.insert(kind, inserted.end..span.end);
    }
    if span.start < inserted.start {
        store.set_range(id, span.start..inserted.start)?;
    } else {
        store.remove(id)?;
    }
    Ok(())
}
