//! Word and line boundary lookups.
//!
//! All functions take char offsets and clamp out-of-range input instead of
//! panicking. A word boundary is any whitespace char (spaces and newlines
//! included).

use std::ops::Range;

use crate::text::TextBuffer;

/// Last index at or before `from` holding `ch`.
///
/// `from` is clamped to the last char of the buffer.
pub fn previous_occurrence<T>(text: &T, from: usize, ch: char) -> Option<usize>
where
    T: TextBuffer + ?Sized,
{
    let last = text.len_chars().checked_sub(1)?;
    (0..=from.min(last))
        .rev()
        .find(|&pos| text.char_at(pos) == Some(ch))
}

/// First index at or after `from` holding `ch`.
pub fn next_occurrence<T>(text: &T, from: usize, ch: char) -> Option<usize>
where
    T: TextBuffer + ?Sized,
{
    (from..text.len_chars()).find(|&pos| text.char_at(pos) == Some(ch))
}

fn is_boundary(c: char) -> bool {
    c.is_whitespace()
}

/// Nearest whitespace at or before `from`, or 0 when there is none.
pub fn previous_word_boundary<T>(text: &T, from: usize) -> usize
where
    T: TextBuffer + ?Sized,
{
    let Some(last) = text.len_chars().checked_sub(1) else {
        return 0;
    };
    (0..=from.min(last))
        .rev()
        .find(|&pos| text.char_at(pos).is_some_and(is_boundary))
        .unwrap_or(0)
}

/// Nearest whitespace at or after `from`, or the buffer length when there is
/// none.
pub fn next_word_boundary<T>(text: &T, from: usize) -> usize
where
    T: TextBuffer + ?Sized,
{
    let len = text.len_chars();
    (from..len)
        .find(|&pos| text.char_at(pos).is_some_and(is_boundary))
        .unwrap_or(len)
}

/// Find start of line containing offset.
pub fn line_start<T>(text: &T, offset: usize) -> usize
where
    T: TextBuffer + ?Sized,
{
    let mut pos = offset.min(text.len_chars());
    while pos > 0 {
        if let Some('\n') = text.char_at(pos - 1) {
            return pos;
        }
        pos -= 1;
    }
    0
}

/// Find end of line containing offset (position of newline or end of buffer).
pub fn line_end<T>(text: &T, offset: usize) -> usize
where
    T: TextBuffer + ?Sized,
{
    next_occurrence(text, offset, '\n').unwrap_or(text.len_chars())
}

/// Whether a caret at `caret` sits on or just after a word.
pub fn is_on_word<T>(text: &T, caret: usize) -> bool
where
    T: TextBuffer + ?Sized,
{
    let before = caret
        .checked_sub(1)
        .and_then(|pos| text.char_at(pos))
        .is_some_and(char::is_alphanumeric);
    match text.char_at(caret) {
        Some(c) if c.is_alphanumeric() => true,
        Some(c) if c.is_whitespace() => before,
        Some(_) => false,
        // Caret at the end of the buffer.
        None => before,
    }
}

/// Word surrounding a caret, as used by collapsed style toggles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordRange {
    /// Whitespace (or buffer start) before the word.
    pub previous: usize,
    /// Whitespace (or buffer end) after the word.
    pub next: usize,
    /// The word itself, leading whitespace trimmed.
    pub word: Range<usize>,
}

/// The word at `caret`, or `None` if the caret is not on a word.
pub fn word_range_at<T>(text: &T, caret: usize) -> Option<WordRange>
where
    T: TextBuffer + ?Sized,
{
    let caret = caret.min(text.len_chars());
    if !is_on_word(text, caret) {
        return None;
    }

    let next = next_word_boundary(text, caret);
    let mut previous = previous_word_boundary(text, caret);
    if previous == next {
        // Caret sits on the whitespace right after a word.
        previous = previous_word_boundary(text, caret.saturating_sub(1));
    }

    let start = match text.char_at(previous) {
        Some(c) if is_boundary(c) => previous + 1,
        _ => previous,
    };
    Some(WordRange {
        previous,
        next,
        word: start.min(next)..next,
    })
}
