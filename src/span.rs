//! Character spans and line chunks of an original input text.
//!
//! All offsets are counted in Unicode scalar values (`char`s), not bytes, so
//! they stay meaningful to consumers that index the text by character.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open `[start, end)` character range into the original input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start offset
    pub start: usize,
    /// Exclusive end offset
    pub end: usize,
}

impl Span {
    /// Create a new span.
    ///
    /// `end` is clamped so that `start <= end` always holds.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Number of characters covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Move the span right by `offset` characters.
    pub fn shift(self, offset: usize) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }

    /// Returns true if `other` lies completely within this span.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Extract the covered text from `text`.
    ///
    /// Returns `None` when the span runs past the end of `text`.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        let start = byte_offset(text, self.start)?;
        let end = byte_offset(text, self.end)?;
        text.get(start..end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{})", self.start, self.end)
    }
}

/// Convert a character offset into a byte offset of `text`.
///
/// The offset one past the last character maps to `text.len()`.
pub(crate) fn byte_offset(text: &str, char_offset: usize) -> Option<usize> {
    text.char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(text.len()))
        .nth(char_offset)
}

/// Number of characters in `text` before byte position `byte`.
pub(crate) fn char_offset(text: &str, byte: usize) -> usize {
    text[..byte].chars().count()
}

/// One line of the input text together with its span.
///
/// The span includes the line break that terminated the line, so consecutive
/// chunks are contiguous: `chunks[i].span.end == chunks[i + 1].span.start`.
/// The text excludes the line break (and a preceding carriage return).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Zero-based line number
    pub line: usize,
    /// Line content without its terminator
    pub text: &'a str,
    /// Span of the line in the original text, terminator included
    pub span: Span,
}

impl<'a> Chunk<'a> {
    /// Returns true if the line holds only whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Split `text` into line chunks covering `[0, len(text))` without gaps.
///
/// A trailing line break does not produce an extra empty chunk.
pub fn split_chunks(text: &str) -> Vec<Chunk<'_>> {
    let mut chunks = Vec::new();
    let mut chunk_start = 0;

    for (line, raw) in text.split_inclusive('\n').enumerate() {
        let chunk_end = chunk_start + raw.chars().count();
        let content = raw.strip_suffix('\n').unwrap_or(raw);
        let content = content.strip_suffix('\r').unwrap_or(content);
        chunks.push(Chunk {
            line,
            text: content,
            span: Span::new(chunk_start, chunk_end),
        });
        chunk_start = chunk_end;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunks_cover_text() {
        let text = "The fox jumps.\nIt ran.";
        let chunks = split_chunks(text);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].span, Span::new(0, 15));
        assert_eq!(chunks[1].span, Span::new(15, 22));
        assert_eq!(chunks[0].text, "The fox jumps.");
        assert_eq!(chunks[1].text, "It ran.");
    }

    #[test]
    fn test_chunks_are_contiguous() {
        for text in ["", "a", "a\n", "\n\n", "one\r\ntwo\n\nthree", "été\nnaïve\n"] {
            let chunks = split_chunks(text);
            let mut expected_start = 0;
            for chunk in &chunks {
                assert_eq!(chunk.span.start, expected_start, "gap in {:?}", text);
                expected_start = chunk.span.end;
            }
            assert_eq!(expected_start, text.chars().count(), "coverage of {:?}", text);
        }
    }

    #[test]
    fn test_blank_chunks() {
        let chunks = split_chunks("first\n   \nlast");
        assert_eq!(chunks.len(), 3);
        assert!(!chunks[0].is_blank());
        assert!(chunks[1].is_blank());
        assert_eq!(chunks[2].span, Span::new(10, 14));
    }

    #[test]
    fn test_carriage_return_is_not_content() {
        let chunks = split_chunks("ab\r\ncd");
        assert_eq!(chunks[0].text, "ab");
        assert_eq!(chunks[0].span, Span::new(0, 4));
        assert_eq!(chunks[1].span, Span::new(4, 6));
    }

    #[test]
    fn test_slice_by_characters() {
        let text = "naïve fox";
        assert_eq!(Span::new(0, 5).slice(text), Some("naïve"));
        assert_eq!(Span::new(6, 9).slice(text), Some("fox"));
        assert_eq!(Span::new(6, 10).slice(text), None);
    }

    #[test]
    fn test_span_display() {
        insta::assert_snapshot!(Span::new(4, 7).to_string(), @"[4,7)");
    }
}
