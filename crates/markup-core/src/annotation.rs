//! Annotation records and kinds.
//!
//! An annotation is a `(kind, range)` pair over the text buffer. Kinds form a
//! closed set: inline styles, list blocks, and the per-line list items that
//! are derived from list blocks.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Inline character style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleKind {
    Bold,
    Italic,
}

impl StyleKind {
    pub const ALL: [StyleKind; 2] = [StyleKind::Bold, StyleKind::Italic];

    pub fn label(self) -> &'static str {
        match self {
            StyleKind::Bold => "Bold",
            StyleKind::Italic => "Italic",
        }
    }
}

/// List flavour of a list block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListKind {
    /// Unordered list.
    Bullet,
    /// Ordered list.
    Numbered,
}

/// What an annotation means.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationKind {
    Style(StyleKind),
    ListBlock(ListKind),
    /// One line of a list block. `ordinal` is 1-based and purely positional.
    ListLine { kind: ListKind, ordinal: usize },
}

impl AnnotationKind {
    pub fn is_style(&self) -> bool {
        matches!(self, AnnotationKind::Style(_))
    }

    pub fn is_list_block(&self) -> bool {
        matches!(self, AnnotationKind::ListBlock(_))
    }

    pub fn is_list_line(&self) -> bool {
        matches!(self, AnnotationKind::ListLine { .. })
    }

    /// Whether two annotations of these kinds may be coalesced into one.
    ///
    /// List lines are positional and never merge.
    pub fn merges_with(&self, other: &AnnotationKind) -> bool {
        match (self, other) {
            (AnnotationKind::Style(a), AnnotationKind::Style(b)) => a == b,
            (AnnotationKind::ListBlock(a), AnnotationKind::ListBlock(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationKind::Style(style) => write!(f, "{}", style.label()),
            AnnotationKind::ListBlock(kind) => write!(f, "{kind:?}List"),
            AnnotationKind::ListLine { kind, ordinal } => write!(f, "{kind:?}Item({ordinal})"),
        }
    }
}

/// Selects annotations by kind when querying a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KindFilter {
    Style(StyleKind),
    ListBlock(ListKind),
    AnyListBlock,
    AnyListLine,
    Any,
}

impl KindFilter {
    pub fn matches(&self, kind: &AnnotationKind) -> bool {
        match (self, kind) {
            (KindFilter::Any, _) => true,
            (KindFilter::Style(want), AnnotationKind::Style(have)) => want == have,
            (KindFilter::ListBlock(want), AnnotationKind::ListBlock(have)) => want == have,
            (KindFilter::AnyListBlock, AnnotationKind::ListBlock(_)) => true,
            (KindFilter::AnyListLine, AnnotationKind::ListLine { .. }) => true,
            _ => false,
        }
    }
}

/// A formatting or structure record over `range` (half-open, char offsets).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Annotation {
    pub kind: AnnotationKind,
    pub range: Range<usize>,
}

impl Annotation {
    pub fn new(kind: AnnotationKind, range: Range<usize>) -> Self {
        Self { kind, range }
    }
}

/// Stable handle to an annotation held by a store.
///
/// Removing the annotation invalidates the handle: the slot may be reused,
/// but with a new generation, so old handles never alias new records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl AnnotationId {
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Formatting request routed through `update_span`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpanType {
    Bold,
    Italic,
    OrderedList,
    UnorderedList,
}

impl From<StyleKind> for SpanType {
    fn from(style: StyleKind) -> Self {
        match style {
            StyleKind::Bold => SpanType::Bold,
            StyleKind::Italic => SpanType::Italic,
        }
    }
}

impl From<ListKind> for SpanType {
    fn from(kind: ListKind) -> Self {
        match kind {
            ListKind::Numbered => SpanType::OrderedList,
            ListKind::Bullet => SpanType::UnorderedList,
        }
    }
}

/// Overlap test used by every store query.
///
/// For a non-empty query, ranges must share at least one char; merely
/// touching at an edge does not count. An empty query (a caret) matches any
/// range that contains or touches it.
pub fn overlaps(span: &Range<usize>, query: &Range<usize>) -> bool {
    if query.is_empty() || span.is_empty() {
        span.start <= query.end && span.end >= query.start
    } else {
        span.start < query.end && span.end > query.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlaps_excludes_touching_for_ranges() {
        assert!(overlaps(&(0..5), &(4..8)));
        assert!(!overlaps(&(0..5), &(5..8)));
        assert!(!overlaps(&(5..8), &(0..5)));
        assert!(overlaps(&(2..3), &(0..10)));
    }

    #[test]
    fn test_overlaps_caret_touches() {
        assert!(overlaps(&(0..5), &(5..5)));
        assert!(overlaps(&(5..9), &(5..5)));
        assert!(overlaps(&(0..9), &(5..5)));
        assert!(!overlaps(&(6..9), &(5..5)));
    }

    #[test]
    fn test_merges_with() {
        let bold = AnnotationKind::Style(StyleKind::Bold);
        let italic = AnnotationKind::Style(StyleKind::Italic);
        let bullets = AnnotationKind::ListBlock(ListKind::Bullet);
        let numbers = AnnotationKind::ListBlock(ListKind::Numbered);
        let line = AnnotationKind::ListLine {
            kind: ListKind::Bullet,
            ordinal: 1,
        };
        assert!(bold.merges_with(&bold));
        assert!(!bold.merges_with(&italic));
        assert!(bullets.merges_with(&bullets));
        assert!(!bullets.merges_with(&numbers));
        assert!(!line.merges_with(&line));
    }

    #[test]
    fn test_kind_filter() {
        let line = AnnotationKind::ListLine {
            kind: ListKind::Numbered,
            ordinal: 3,
        };
        assert!(KindFilter::AnyListLine.matches(&line));
        assert!(!KindFilter::AnyListBlock.matches(&line));
        assert!(KindFilter::ListBlock(ListKind::Bullet)
            .matches(&AnnotationKind::ListBlock(ListKind::Bullet)));
        assert!(!KindFilter::Style(StyleKind::Bold)
            .matches(&AnnotationKind::Style(StyleKind::Italic)));
        assert!(KindFilter::Any.matches(&line));
    }

    #[test]
    fn test_display() {
        assert_eq!(AnnotationKind::Style(StyleKind::Italic).to_string(), "Italic");
        assert_eq!(
            AnnotationKind::ListLine {
                kind: ListKind::Numbered,
                ordinal: 2
            }
            .to_string(),
            "NumberedItem(2)"
        );
    }
}
