// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source location tracking.
//!
//! Every token and AST node carries a `Span` indicating its position in the
//! source file. Spans record both byte offsets (for slicing and `miette`
//! labels) and 1-based line/column pairs (for source maps).

use std::ops::Range;

use super::SourceId;

/// A position in a source buffer.
///
/// `line` and `column` are 1-based. Columns count Unicode scalar values;
/// identifiers advance the column by the length of their NFC form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    /// Byte offset from the beginning of the buffer.
    pub offset: u32,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
}

impl Location {
    /// The location of the first character in a buffer.
    pub const START: Self = Self {
        offset: 0,
        line: 1,
        column: 1,
    };

    /// Creates a new location.
    #[must_use]
    pub const fn new(offset: u32, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::START
    }
}

/// A half-open range of source code in a particular file.
///
/// # Examples
///
/// ```
/// use escalier_core::source_analysis::{Location, SourceId, Span};
///
/// let span = Span::new(Location::new(0, 1, 1), Location::new(10, 1, 11), SourceId::new(0));
/// assert_eq!(span.start().offset, 0);
/// assert_eq!(span.end().column, 11);
/// assert_eq!(span.len(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    start: Location,
    end: Location,
    source: SourceId,
}

impl Span {
    /// Creates a new span. `start` must not be after `end`.
    #[must_use]
    pub const fn new(start: Location, end: Location, source: SourceId) -> Self {
        Self { start, end, source }
    }

    /// Creates a zero-width span at `at`.
    #[must_use]
    pub const fn empty_at(at: Location, source: SourceId) -> Self {
        Self {
            start: at,
            end: at,
            source,
        }
    }

    /// Returns the start location.
    #[must_use]
    pub const fn start(self) -> Location {
        self.start
    }

    /// Returns the end location (exclusive).
    #[must_use]
    pub const fn end(self) -> Location {
        self.end
    }

    /// Returns the file this span belongs to.
    #[must_use]
    pub const fn source_id(self) -> SourceId {
        self.source
    }

    /// Returns the length of the span in bytes.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.end.offset - self.start.offset
    }

    /// Returns true if the span is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Returns true if `other` is fully contained within `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.start.offset <= other.start.offset && other.end.offset <= self.end.offset
    }

    /// Creates a span that covers both `self` and `other`.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        let start = if self.start.offset < other.start.offset {
            self.start
        } else {
            other.start
        };
        let end = if self.end.offset > other.end.offset {
            self.end
        } else {
            other.end
        };
        Self {
            start,
            end,
            source: self.source,
        }
    }

    /// Converts to a `Range<usize>` for indexing into source text.
    #[must_use]
    pub const fn as_range(self) -> Range<usize> {
        self.start.offset as usize..self.end.offset as usize
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.as_range()
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start.offset as usize, span.len() as usize).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: u32, end: u32) -> Span {
        Span::new(
            Location::new(start, 1, start + 1),
            Location::new(end, 1, end + 1),
            SourceId::default(),
        )
    }

    #[test]
    fn span_new_and_accessors() {
        let span = span(5, 15);
        assert_eq!(span.start().offset, 5);
        assert_eq!(span.end().offset, 15);
        assert_eq!(span.end().column, 16);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
    }

    #[test]
    fn span_empty() {
        let span = Span::empty_at(Location::new(5, 2, 3), SourceId::new(4));
        assert!(span.is_empty());
        assert_eq!(span.len(), 0);
        assert_eq!(span.source_id(), SourceId::new(4));
    }

    #[test]
    fn span_merge_keeps_locations() {
        let a = Span::new(Location::new(5, 1, 6), Location::new(10, 1, 11), SourceId::new(1));
        let b = Span::new(Location::new(15, 2, 3), Location::new(20, 2, 8), SourceId::new(1));
        let merged = a.merge(b);
        assert_eq!(merged.start(), Location::new(5, 1, 6));
        assert_eq!(merged.end(), Location::new(20, 2, 8));
        assert_eq!(merged.source_id(), SourceId::new(1));
    }

    #[test]
    fn span_contains() {
        assert!(span(0, 10).contains(span(2, 4)));
        assert!(span(0, 10).contains(span(10, 10)));
        assert!(!span(2, 4).contains(span(0, 10)));
    }

    #[test]
    fn span_into_miette() {
        let source_span: miette::SourceSpan = span(3, 7).into();
        assert_eq!(source_span.offset(), 3);
        assert_eq!(source_span.len(), 4);
    }

    #[test]
    fn span_as_range() {
        let range: Range<usize> = span(5, 15).into();
        assert_eq!(range, 5..15);
    }
}
