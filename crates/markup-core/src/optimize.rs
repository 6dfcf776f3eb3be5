//! Coalescing of overlapping or abutting same-kind annotations.

use crate::annotation::AnnotationId;
use crate::error::StoreError;
use crate::store::AnnotationStore;

/// Merge every pair of `candidates` that overlap or touch.
///
/// A single pairwise pass: the surviving annotation grows to the union of
/// both ranges and keeps absorbing later candidates, while absorbed ones are
/// skipped for the rest of the pass and removed at the end. Pairs whose kinds
/// do not merge (different styles or list kinds, list lines) are left alone.
///
/// Returns the number of annotations removed.
pub fn coalesce<S>(store: &mut S, candidates: &[AnnotationId]) -> Result<usize, StoreError>
where
    S: AnnotationStore + ?Sized,
{
    let mut absorbed = vec![false; candidates.len()];

    for lhs in 0..candidates.len() {
        if absorbed[lhs] {
            continue;
        }
        for rhs in 0..candidates.len() {
            if lhs == rhs || absorbed[rhs] {
                continue;
            }
            if merge_pair(store, candidates[lhs], candidates[rhs])? {
                absorbed[rhs] = true;
            }
        }
    }

    let mut removed = 0;
    for (id, _) in candidates.iter().zip(&absorbed).filter(|(_, gone)| **gone) {
        store.remove(*id)?;
        removed += 1;
    }
    if removed > 0 {
        tracing::trace!(target: "markup::algebra", removed, "coalesced annotations");
    }
    Ok(removed)
}

/// Grow `lhs` over `rhs` if they overlap or touch. Does not remove `rhs`.
fn merge_pair<S>(store: &mut S, lhs: AnnotationId, rhs: AnnotationId) -> Result<bool, StoreError>
where
    S: AnnotationStore + ?Sized,
{
    let left = store.get(lhs).cloned().ok_or(StoreError::StaleId(lhs))?;
    let right = store.get(rhs).cloned().ok_or(StoreError::StaleId(rhs))?;
    if !left.kind.merges_with(&right.kind) {
        return Ok(false);
    }

    let (l, r) = (left.range, right.range);
    let end = l.end.max(r.end);
    let merged = if l.start < r.start && r.start <= l.end {
        l.start..end
    } else if r.start <= l.start && l.start <= r.end {
        r.start..end
    } else {
        return Ok(false);
    };

    store.set_range(lhs, merged)?;
    Ok(true)
}
