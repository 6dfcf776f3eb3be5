//! Annotation storage.
//!
//! The `AnnotationStore` trait is the contract the algebra works against:
//! add, remove, re-range and re-kind records by id, and query them by kind
//! and overlap. `SpanArena` is the in-memory implementation, a generational
//! arena so that ids of removed annotations can never alias new ones.

use std::ops::Range;

use crate::annotation::{
    Annotation, AnnotationId, AnnotationKind, KindFilter, ListKind, StyleKind, overlaps,
};
use crate::error::{InvariantViolation, StoreError};

/// Storage for annotation records.
///
/// The store exclusively owns its records. Callers hold only ids and must
/// re-query after every mutation.
pub trait AnnotationStore {
    // === Required ===

    /// Add a record and return its id.
    fn insert(&mut self, kind: AnnotationKind, range: Range<usize>) -> AnnotationId;

    /// Remove a record, invalidating its id.
    fn remove(&mut self, id: AnnotationId) -> Result<Annotation, StoreError>;

    /// Look up a live record.
    fn get(&self, id: AnnotationId) -> Option<&Annotation>;

    /// Move a record to a new range.
    fn set_range(&mut self, id: AnnotationId, range: Range<usize>) -> Result<(), StoreError>;

    /// Change a record's kind in place, keeping its id and range.
    fn set_kind(&mut self, id: AnnotationId, kind: AnnotationKind) -> Result<(), StoreError>;

    /// Ids of all live records, in storage order.
    fn ids(&self) -> Vec<AnnotationId>;

    // === Provided: lookups ===

    fn len(&self) -> usize {
        self.ids().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn range_of(&self, id: AnnotationId) -> Result<Range<usize>, StoreError> {
        self.get(id)
            .map(|a| a.range.clone())
            .ok_or(StoreError::StaleId(id))
    }

    fn kind_of(&self, id: AnnotationId) -> Result<AnnotationKind, StoreError> {
        self.get(id).map(|a| a.kind).ok_or(StoreError::StaleId(id))
    }

    /// Ids of records matching `filter` that overlap `range`, ordered by
    /// position.
    ///
    /// See [`overlaps`] for the edge rules: a caret query also matches
    /// records that merely touch it.
    fn overlapping(&self, range: Range<usize>, filter: KindFilter) -> Vec<AnnotationId> {
        let mut found: Vec<(usize, usize, AnnotationId)> = self
            .ids()
            .into_iter()
            .filter_map(|id| {
                let a = self.get(id)?;
                (filter.matches(&a.kind) && overlaps(&a.range, &range))
                    .then_some((a.range.start, a.range.end, id))
            })
            .collect();
        found.sort_unstable();
        found.into_iter().map(|(_, _, id)| id).collect()
    }

    /// Ids of every record matching `filter`, ordered by position.
    fn of_kind(&self, filter: KindFilter) -> Vec<AnnotationId> {
        let mut found: Vec<(usize, usize, AnnotationId)> = self
            .ids()
            .into_iter()
            .filter_map(|id| {
                let a = self.get(id)?;
                filter
                    .matches(&a.kind)
                    .then_some((a.range.start, a.range.end, id))
            })
            .collect();
        found.sort_unstable();
        found.into_iter().map(|(_, _, id)| id).collect()
    }

    /// All records, ordered by position.
    fn snapshot(&self) -> Vec<Annotation> {
        self.of_kind(KindFilter::Any)
            .into_iter()
            .filter_map(|id| self.get(id).cloned())
            .collect()
    }

    // === Provided: bulk removal ===

    /// Remove every record matching `filter`. Returns how many were removed.
    fn remove_all(&mut self, filter: KindFilter) -> Result<usize, StoreError> {
        let ids = self.of_kind(filter);
        for id in &ids {
            self.remove(*id)?;
        }
        Ok(ids.len())
    }

    /// Remove records matching `filter` that overlap `range`.
    fn remove_overlapping(
        &mut self,
        range: Range<usize>,
        filter: KindFilter,
    ) -> Result<usize, StoreError> {
        let ids = self.overlapping(range, filter);
        for id in &ids {
            self.remove(*id)?;
        }
        Ok(ids.len())
    }

    // === Provided: buffer edit tracking ===

    /// Shift records for `inserted` chars inserted at `offset`.
    ///
    /// Boundaries are exclusive: text inserted exactly at a record's start or
    /// end lands outside it. Text inserted strictly inside grows it.
    fn shift_for_insert(&mut self, offset: usize, inserted: usize) -> Result<(), StoreError> {
        if inserted == 0 {
            return Ok(());
        }
        for id in self.ids() {
            let range = self.range_of(id)?;
            if range.start >= offset {
                self.set_range(id, range.start + inserted..range.end + inserted)?;
            } else if range.end > offset {
                self.set_range(id, range.start..range.end + inserted)?;
            }
        }
        Ok(())
    }

    /// Shift records for the removal of `deleted`.
    ///
    /// Records that collapse to nothing are dropped. Returns how many were
    /// dropped.
    fn shift_for_delete(&mut self, deleted: Range<usize>) -> Result<usize, StoreError> {
        if deleted.is_empty() {
            return Ok(0);
        }
        let removed = deleted.end - deleted.start;
        let remap = |offset: usize| {
            if offset <= deleted.start {
                offset
            } else if offset >= deleted.end {
                offset - removed
            } else {
                deleted.start
            }
        };

        let mut dropped = 0;
        for id in self.ids() {
            let range = self.range_of(id)?;
            let mapped = remap(range.start)..remap(range.end);
            if mapped.is_empty() {
                self.remove(id)?;
                dropped += 1;
            } else if mapped != range {
                self.set_range(id, mapped)?;
            }
        }
        Ok(dropped)
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    annotation: Option<Annotation>,
}

/// Generational arena of annotations.
#[derive(Clone, Debug, Default)]
pub struct SpanArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl SpanArena {
    pub fn new() -> Self {
        Self::default()
    }

    fn live_slot_mut(&mut self, id: AnnotationId) -> Result<&mut Annotation, StoreError> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.annotation.as_mut())
            .ok_or(StoreError::StaleId(id))
    }
}

impl AnnotationStore for SpanArena {
    fn insert(&mut self, kind: AnnotationKind, range: Range<usize>) -> AnnotationId {
        debug_assert!(range.start <= range.end, "reversed range {range:?}");
        let annotation = Annotation::new(kind, range);
        self.live += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.annotation = Some(annotation);
            return AnnotationId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            annotation: Some(annotation),
        });
        AnnotationId {
            index,
            generation: 0,
        }
    }

    fn remove(&mut self, id: AnnotationId) -> Result<Annotation, StoreError> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .ok_or(StoreError::StaleId(id))?;
        let annotation = slot.annotation.take().ok_or(StoreError::StaleId(id))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Ok(annotation)
    }

    fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.annotation.as_ref())
    }

    fn set_range(&mut self, id: AnnotationId, range: Range<usize>) -> Result<(), StoreError> {
        if range.start > range.end {
            return Err(StoreError::invalid_range(&range));
        }
        self.live_slot_mut(id)?.range = range;
        Ok(())
    }

    fn set_kind(&mut self, id: AnnotationId, kind: AnnotationKind) -> Result<(), StoreError> {
        self.live_slot_mut(id)?.kind = kind;
        Ok(())
    }

    fn ids(&self) -> Vec<AnnotationId> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                slot.annotation.as_ref().map(|_| AnnotationId {
                    index: index as u32,
                    generation: slot.generation,
                })
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.live
    }
}

impl FromIterator<Annotation> for SpanArena {
    fn from_iter<I: IntoIterator<Item = Annotation>>(iter: I) -> Self {
        let mut arena = SpanArena::new();
        for annotation in iter {
            arena.insert(annotation.kind, annotation.range);
        }
        arena
    }
}

/// Check the post-conditions every public operation must leave behind.
///
/// - every record lies inside `0..=len` and is non-empty
/// - same-kind styles and same-kind list blocks neither overlap nor abut
/// - list blocks of any kind never overlap
/// - list lines tile each list block exactly, numbered from 1
pub fn check_invariants<S>(store: &S, len: usize) -> Result<(), InvariantViolation>
where
    S: AnnotationStore + ?Sized,
{
    let all = store.snapshot();

    for a in &all {
        if a.range.start > a.range.end || a.range.end > len {
            return Err(InvariantViolation::OutOfBounds {
                kind: a.kind,
                range: a.range.clone(),
                len,
            });
        }
        if a.range.is_empty() {
            return Err(InvariantViolation::Empty {
                kind: a.kind,
                at: a.range.start,
            });
        }
    }

    let coalesced = StyleKind::ALL
        .into_iter()
        .map(KindFilter::Style)
        .chain([ListKind::Bullet, ListKind::Numbered].map(KindFilter::ListBlock));
    for filter in coalesced {
        let spans: Vec<&Annotation> = all.iter().filter(|a| filter.matches(&a.kind)).collect();
        for pair in spans.windows(2) {
            if pair[1].range.start <= pair[0].range.end {
                return Err(InvariantViolation::NotCoalesced {
                    kind: pair[0].kind,
                    first: pair[0].range.clone(),
                    second: pair[1].range.clone(),
                });
            }
        }
    }

    let blocks: Vec<&Annotation> = all.iter().filter(|a| a.kind.is_list_block()).collect();
    for pair in blocks.windows(2) {
        if pair[1].range.start < pair[0].range.end {
            return Err(InvariantViolation::ListOverlap {
                first: pair[0].range.clone(),
                second: pair[1].range.clone(),
            });
        }
    }

    let lines: Vec<&Annotation> = all.iter().filter(|a| a.kind.is_list_line()).collect();
    for line in &lines {
        let AnnotationKind::ListLine { kind, .. } = line.kind else {
            continue;
        };
        let enclosed = blocks.iter().any(|block| {
            block.kind == AnnotationKind::ListBlock(kind)
                && block.range.start <= line.range.start
                && line.range.end <= block.range.end
        });
        if !enclosed {
            return Err(InvariantViolation::OrphanLine {
                range: line.range.clone(),
            });
        }
    }

    for block in &blocks {
        let mut expected = block.range.start;
        let inside = lines.iter().filter(|line| {
            block.range.start <= line.range.start && line.range.end <= block.range.end
        });
        for (index, line) in inside.enumerate() {
            if line.range.start != expected {
                return Err(InvariantViolation::LineCoverage {
                    block: block.range.clone(),
                    at: expected,
                });
            }
            if let AnnotationKind::ListLine { ordinal, .. } = line.kind {
                if ordinal != index + 1 {
                    return Err(InvariantViolation::Ordinal {
                        range: line.range.clone(),
                        expected: index + 1,
                        found: ordinal,
                    });
                }
            }
            expected = line.range.end;
        }
        if expected != block.range.end {
            return Err(InvariantViolation::LineCoverage {
                block: block.range.clone(),
                at: expected,
            });
        }
    }

    Ok(())
}
