//! Error types for annotation store operations.

use std::ops::Range;

use miette::Diagnostic;
use thiserror::Error;

use crate::annotation::{AnnotationId, AnnotationKind};

/// Errors raised by an `AnnotationStore`.
///
/// The algebra only addresses ids it has just obtained from the store, so
/// these indicate a misbehaving store implementation or caller.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    /// The id refers to a removed annotation.
    #[error("annotation {0} no longer exists")]
    #[diagnostic(code(markup::store::stale_id))]
    StaleId(AnnotationId),

    /// A range whose start lies after its end.
    #[error("invalid annotation range {start}..{end}")]
    #[diagnostic(code(markup::store::invalid_range))]
    InvalidRange { start: usize, end: usize },
}

impl StoreError {
    pub(crate) fn invalid_range(range: &Range<usize>) -> Self {
        StoreError::InvalidRange {
            start: range.start,
            end: range.end,
        }
    }
}

/// A broken post-condition of the annotation set.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvariantViolation {
    /// An annotation reaches past the end of the buffer.
    #[error("{kind} annotation {range:?} lies outside buffer of length {len}")]
    #[diagnostic(code(markup::invariant::out_of_bounds))]
    OutOfBounds {
        kind: AnnotationKind,
        range: Range<usize>,
        len: usize,
    },

    /// A zero-length annotation.
    #[error("{kind} annotation is empty at {at}")]
    #[diagnostic(code(markup::invariant::empty))]
    Empty { kind: AnnotationKind, at: usize },

    /// Two same-kind annotations that should have been merged.
    #[error("{kind} annotations {first:?} and {second:?} overlap or abut")]
    #[diagnostic(code(markup::invariant::not_coalesced))]
    NotCoalesced {
        kind: AnnotationKind,
        first: Range<usize>,
        second: Range<usize>,
    },

    /// Two list blocks share text.
    #[error("list blocks {first:?} and {second:?} overlap")]
    #[diagnostic(code(markup::invariant::list_overlap))]
    ListOverlap {
        first: Range<usize>,
        second: Range<usize>,
    },

    /// A list line with no enclosing block of its kind.
    #[error("list line {range:?} is not inside a matching list block")]
    #[diagnostic(code(markup::invariant::orphan_line))]
    OrphanLine { range: Range<usize> },

    /// A list block whose lines leave a gap or overhang.
    #[error("list block {block:?} lines do not cover it (gap at {at})")]
    #[diagnostic(code(markup::invariant::line_coverage))]
    LineCoverage { block: Range<usize>, at: usize },

    /// A list line numbered out of sequence.
    #[error("list line {range:?} numbered {found}, expected {expected}")]
    #[diagnostic(code(markup::invariant::ordinal))]
    Ordinal {
        range: Range<usize>,
        expected: usize,
        found: usize,
    },
}
