//! List blocks and their derived per-line annotations.
//!
//! A list block spans whole lines, trailing newline included. Each block is
//! tiled by `ListLine` annotations, one per text line, numbered from 1. Lines
//! are never patched: whenever a block or its text changes, its lines are
//! thrown away and emitted again.

use std::ops::Range;

use crate::algebra::{trim_or_split, widen};
use crate::annotation::{AnnotationId, AnnotationKind, KindFilter, ListKind};
use crate::boundary::{next_occurrence, previous_occurrence};
use crate::error::StoreError;
use crate::optimize::coalesce;
use crate::store::AnnotationStore;
use crate::text::TextBuffer;
use crate::types::Selection;

/// Toggle a list of `list` kind over the lines touched by `selection`.
///
/// Blocks of the other kind inside the selection are re-typed in place; a
/// block matching the selected lines exactly is removed; otherwise blocks are
/// trimmed, split or extended as for styles. Returns whether a block was
/// added, changed or removed.
pub fn apply_list<S, T>(
    store: &mut S,
    text: &T,
    selection: Selection,
    list: ListKind,
) -> Result<bool, StoreError>
where
    S: AnnotationStore + ?Sized,
    T: TextBuffer + ?Sized,
{
    store.remove_all(KindFilter::AnyListLine)?;

    let len = text.len_chars();
    if len == 0 {
        tracing::debug!(target: "markup::list", ?list, "empty buffer, nothing to list");
        return Ok(false);
    }

    let target = line_span(text, selection.clamp(len).to_range());
    if target.is_empty() {
        tracing::debug!(target: "markup::list", ?list, at = target.start, "no line under selection");
        segment(store, text)?;
        return Ok(false);
    }

    let block_kind = AnnotationKind::ListBlock(list);
    let mut hull = target.clone();
    let mut handled = false;
    for id in store.overlapping(target.clone(), KindFilter::AnyListBlock) {
        let span = store.range_of(id)?;
        hull = hull.start.min(span.start)..hull.end.max(span.end);

        if store.kind_of(id)? != block_kind {
            tracing::debug!(target: "markup::list", ?span, to = ?list, "re-typing list block");
            store.set_kind(id, block_kind)?;
        } else if span == target {
            tracing::debug!(target: "markup::list", ?span, "exact match, removing list block");
            store.remove(id)?;
        } else {
            trim_or_split(store, id, span, &target)?;
        }
        handled = true;
    }

    if !handled {
        tracing::debug!(target: "markup::list", ?list, range = ?target, "new list block");
        store.insert(block_kind, target.clone());
    }

    let candidates = store.overlapping(widen(&hull, len), KindFilter::AnyListBlock);
    coalesce(store, &candidates)?;
    segment(store, text)?;
    Ok(true)
}

/// Snap `range` outward to whole lines.
///
/// The start moves back to the start of its line. The end moves forward past
/// the next newline (or to the buffer end), unless it already sits right
/// after a newline. An empty range selects its own line.
fn line_span<T>(text: &T, range: Range<usize>) -> Range<usize>
where
    T: TextBuffer + ?Sized,
{
    let len = text.len_chars();

    let mut start = range.start;
    if start != 0 && text.char_at(start - 1) != Some('\n') {
        start = previous_occurrence(text, start - 1, '\n').map_or(0, |pos| pos + 1);
    }

    let mut end = range.end;
    if range.is_empty() || text.char_at(end - 1) != Some('\n') {
        end = next_occurrence(text, end, '\n').map_or(len, |pos| pos + 1);
    }

    start..end.max(start)
}

/// Regenerate the lines of every list block in the buffer.
///
/// Returns how many lines were emitted.
pub fn segment<S, T>(store: &mut S, text: &T) -> Result<usize, StoreError>
where
    S: AnnotationStore + ?Sized,
    T: TextBuffer + ?Sized,
{
    store.remove_all(KindFilter::AnyListLine)?;

    let mut emitted = 0;
    for id in store.of_kind(KindFilter::AnyListBlock) {
        emitted += emit_lines(store, text, id)?;
    }
    Ok(emitted)
}

/// Regenerate the lines of list blocks overlapping `range` only.
pub fn segment_range<S, T>(store: &mut S, text: &T, range: Range<usize>) -> Result<usize, StoreError>
where
    S: AnnotationStore + ?Sized,
    T: TextBuffer + ?Sized,
{
    let mut emitted = 0;
    for id in store.overlapping(range, KindFilter::AnyListBlock) {
        let span = store.range_of(id)?;
        if span.is_empty() {
            continue;
        }
        store.remove_overlapping(span, KindFilter::AnyListLine)?;
        emitted += emit_lines(store, text, id)?;
    }
    Ok(emitted)
}

fn emit_lines<S, T>(
    store: &mut S,
    text: &T,
    block: AnnotationId,
) -> Result<usize, StoreError>
where
    S: AnnotationStore + ?Sized,
    T: TextBuffer + ?Sized,
{
    let range = store.range_of(block)?;
    let AnnotationKind::ListBlock(kind) = store.kind_of(block)? else {
        return Ok(0);
    };
    if range.is_empty() {
        return Ok(0);
    }

    // A trailing newline closes the last line rather than opening an empty one.
    let mut body_end = range.end;
    if text.char_at(body_end - 1) == Some('\n') {
        body_end -= 1;
    }
    let body = text
        .slice(range.start..body_end)
        .ok_or_else(|| StoreError::invalid_range(&(range.start..body_end)))?;

    let mut pos = range.start;
    let mut count = 0;
    for (index, line) in body.split('\n').enumerate() {
        let end = (pos + line.chars().count() + 1).min(range.end);
        store.insert(
            AnnotationKind::ListLine {
                kind,
                ordinal: index + 1,
            },
            pos..end,
        );
        pos = end;
        count += 1;
    }

    tracing::trace!(target: "markup::list", ?kind, block = ?range, lines = count, "segmented list block");
    Ok(count)
}
