//! Byte positions into one source unit.
//!
//! Tokens, nodes and diagnostics all point back into the source with a
//! `TextRange`. Line and column numbers are only computed when a diagnostic
//! is rendered, through a `LineMap`.

use std::fmt;
use std::ops::Range;

/// A byte offset into the source.
pub type TextPos = u32;

/// A half-open byte range `pos..end`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct TextRange {
    pub pos: TextPos,
    pub end: TextPos,
}

impl TextRange {
    #[inline]
    pub fn new(pos: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= pos, "inverted range {pos}..{end}");
        Self { pos, end }
    }

    /// The zero-width range where a missing token would sit.
    #[inline]
    pub fn empty(pos: TextPos) -> Self {
        Self { pos, end: pos }
    }

    #[inline]
    pub fn from_usize(pos: usize, end: usize) -> Self {
        Self::new(pos as TextPos, end as TextPos)
    }

    #[inline]
    pub fn len(&self) -> TextPos {
        self.end - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.pos as usize..self.end as usize
    }

    #[inline]
    pub fn contains(&self, pos: TextPos) -> bool {
        (self.pos..self.end).contains(&pos)
    }

    /// Whether `other` nests inside this range. Empty ranges at either edge
    /// nest too.
    #[inline]
    pub fn contains_range(&self, other: TextRange) -> bool {
        self.pos <= other.pos && other.end <= self.end
    }

    /// The smallest range spanning both.
    pub fn cover(&self, other: TextRange) -> TextRange {
        TextRange {
            pos: self.pos.min(other.pos),
            end: self.end.max(other.end),
        }
    }

    /// The source text under this range, or `""` if it splits a character.
    pub fn slice<'t>(&self, text: &'t str) -> &'t str {
        text.get(self.to_range()).unwrap_or_default()
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.pos, self.end)
    }
}

impl From<Range<usize>> for TextRange {
    fn from(range: Range<usize>) -> Self {
        Self::from_usize(range.start, range.end)
    }
}

/// A 1-based line and a 1-based byte column, as editors print them.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Start offsets of every line of a source, for offset to line lookups.
#[derive(Debug, Clone)]
pub struct LineMap {
    starts: Vec<TextPos>,
}

impl LineMap {
    pub fn new(text: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(memchr::memchr_iter(b'\n', text.as_bytes()).map(|i| (i + 1) as TextPos))
            .collect();
        Self { starts }
    }

    /// The line and column of `pos`. A newline belongs to the line it ends.
    pub fn line_col(&self, pos: TextPos) -> LineCol {
        let index = self.starts.partition_point(|&start| start <= pos) - 1;
        LineCol {
            line: index as u32 + 1,
            col: pos - self.starts[index] + 1,
        }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_and_contains() {
        let head = TextRange::new(0, 2);
        let tail = TextRange::new(7, 9);
        let whole = head.cover(tail);
        assert_eq!(whole, TextRange::new(0, 9));
        assert!(whole.contains_range(tail));
        assert!(whole.contains_range(TextRange::empty(9)));
        assert!(!whole.contains(9));
    }

    #[test]
    fn test_slice() {
        assert_eq!(TextRange::new(3, 4).slice("fn f() {}"), "f");
        assert_eq!(TextRange::from(1..2).slice("é"), "");
    }

    #[test]
    fn test_line_col() {
        let map = LineMap::new("fn f() {\n    x\n}\n");
        assert_eq!(map.line_count(), 4);
        assert_eq!(map.line_col(0), LineCol { line: 1, col: 1 });
        assert_eq!(map.line_col(8), LineCol { line: 1, col: 9 });
        assert_eq!(map.line_col(13), LineCol { line: 2, col: 5 });
        assert_eq!(map.line_col(15).to_string(), "3:1");
    }
}
