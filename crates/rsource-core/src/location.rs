// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source location tracking.
//!
//! Three related types describe where things live in a source buffer:
//!
//! - [`Position`] — a zero-based (row, column) coordinate, totally ordered
//!   lexicographically so positions can be compared and binary-searched.
//! - [`Range`] — a pair of positions covering a region of source.
//! - [`Span`] — a byte-offset range into the buffer, used to slice out the
//!   exact text of a token or syntax-tree node.
//!
//! Tokens carry both a [`Span`] (for slicing) and a [`Position`] (for
//! row/column diagnostics); nodes widen both as children are attached.

use std::fmt;

/// A zero-based row/column coordinate in a source buffer.
///
/// Positions are ordered lexicographically by `(row, column)`, so the derived
/// `Ord` compares rows first and columns second. Columns count bytes, not
/// display width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    /// Zero-based row (line) index.
    pub row: u32,
    /// Zero-based column (byte) index within the row.
    pub column: u32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Returns this position shifted right by `columns` on the same row.
    #[must_use]
    pub const fn shifted(self, columns: u32) -> Self {
        Self {
            row: self.row,
            column: self.column + columns,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}

/// A region of source described by a start and end [`Position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    /// The first position covered.
    pub start: Position,
    /// The position one past the last covered column.
    pub end: Position,
}

impl Range {
    /// Creates a new range.
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Returns `true` if `position` falls inside this range.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position < self.end
    }

    /// Creates the smallest range covering both `self` and `other`.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{}]", self.start, self.end)
    }
}

/// A byte-offset range into the source buffer.
///
/// Spans slice the original buffer to recover token and node text; no token
/// owns a copy of its contents.
///
/// # Examples
///
/// ```
/// use rsource_core::location::Span;
///
/// let span = Span::new(5, 10);
/// assert_eq!(span.len(), 5);
/// assert_eq!(&"x <- value"[span.as_range()], "value");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    start: u32,
    end: u32,
}

impl Span {
    /// Creates a new span from start and end byte offsets.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Returns the start byte offset.
    #[must_use]
    pub const fn start(self) -> u32 {
        self.start
    }

    /// Returns the end byte offset (exclusive).
    #[must_use]
    pub const fn end(self) -> u32 {
        self.end
    }

    /// Returns the length of the span in bytes.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.end - self.start
    }

    /// Returns `true` if the span covers no bytes.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if `other` is fully contained within `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Creates the smallest span covering both `self` and `other`.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        let start = if self.start < other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end > other.end { self.end } else { other.end };
        Self { start, end }
    }

    /// Converts to a `Range<usize>` for indexing into source text.
    #[must_use]
    pub const fn as_range(self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl From<std::ops::Range<u32>> for Span {
    fn from(range: std::ops::Range<u32>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl From<std::ops::Range<usize>> for Span {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start as u32, range.end as u32)
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(span: Span) -> Self {
        span.as_range()
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start as usize, span.len() as usize).into()
    }
}
