//! Points and ranges.
//!
//! Both coordinates of a [`Point`] are 0-indexed and the column counts
//! Unicode scalar values, matching `ropey`'s char indexing. A byte offset
//! never appears in this API.
//!
//! A [`Range`] is *directional*: `start` is where a motion began and `end`
//! is where it landed, so `end` may precede `start`. Callers that mutate
//! text call [`Range::sorted`] first.

use std::cmp::Ordering;
use std::fmt;

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A location in a buffer: (line, column), 0-indexed, rune-based.
///
/// Points order by line first and then by column, which is document order.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub line: usize,
    pub col: usize,
}

impl Point {
    /// Line 0, column 0.
    pub const ZERO: Self = Self { line: 0, col: 0 };

    /// A point at `line`, `col`, both 0-indexed.
    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// Same line, different column.
    #[inline]
    #[must_use]
    pub const fn with_col(self, col: usize) -> Self {
        Self {
            line: self.line,
            col,
        }
    }
}

impl Ord for Point {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then(self.col.cmp(&other.col))
    }
}

impl PartialOrd for Point {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pt({}:{})", self.line, self.col)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Status-line style, 1-indexed.
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// A pair of points. Not necessarily ordered; see [`Range::sorted`].
///
/// Whether `end` is inclusive is decided by whoever built the range (a
/// motion marks itself exclusive or inclusive), not by this type.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Point,
    pub end: Point,
}

impl Range {
    /// A range from `start` to `end`, in that direction.
    #[inline]
    #[must_use]
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// A zero-width range at `pt`.
    #[inline]
    #[must_use]
    pub const fn point(pt: Point) -> Self {
        Self { start: pt, end: pt }
    }

    /// The same range with `start <= end` in document order.
    #[inline]
    #[must_use]
    pub fn sorted(self) -> Self {
        if self.start <= self.end {
            self
        } else {
            Self {
                start: self.end,
                end: self.start,
            }
        }
    }

    /// True when the motion went backwards.
    #[inline]
    #[must_use]
    pub fn is_reversed(self) -> bool {
        self.end < self.start
    }

    /// Start and end are the same point.
    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// True when both ends sit on the same line.
    #[inline]
    #[must_use]
    pub const fn is_single_line(self) -> bool {
        self.start.line == self.end.line
    }

    /// Inclusive containment, after sorting.
    #[must_use]
    pub fn contains(self, pt: Point) -> bool {
        let r = self.sorted();
        pt >= r.start && pt <= r.end
    }

    /// Number of lines touched, counting both ends.
    #[inline]
    #[must_use]
    pub fn line_span(self) -> usize {
        let r = self.sorted();
        r.end.line - r.start.line + 1
    }

    /// The smallest range covering both `self` and `other`, sorted.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        let a = self.sorted();
        let b = other.sorted();
        Self {
            start: a.start.min(b.start),
            end: a.end.max(b.end),
        }
    }
}

impl fmt::Debug for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Range({:?} .. {:?})", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
