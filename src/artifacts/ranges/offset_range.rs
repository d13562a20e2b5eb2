//! Half-open offset ranges
//!
//! An `OffsetRange` addresses a contiguous run of elements `[start, end_exclusive)`
//! in a 0-based index space (line indices or character offsets).
//!
//! ## Construction
//!
//! - `OffsetRange::new` is used by the engine itself and panics on an inverted range,
//!   since that can only come from a bug in the algorithms.
//! - `OffsetRange::try_new` validates ranges coming from outside (e.g. decoded wire data).

use std::fmt;
use std::ops::Range;

/// Half-open range `[start, end_exclusive)` over a 0-based index space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct OffsetRange {
    start: usize,
    end_exclusive: usize,
}

impl OffsetRange {
    pub fn new(start: usize, end_exclusive: usize) -> Self {
        assert!(
            start <= end_exclusive,
            "invalid offset range: start {start} is after end {end_exclusive}"
        );

        Self {
            start,
            end_exclusive,
        }
    }

    /// Validate and build a range from untrusted bounds
    ///
    /// # Returns
    ///
    /// The range, or an error if `start > end_exclusive`
    pub fn try_new(start: usize, end_exclusive: usize) -> anyhow::Result<Self> {
        if start > end_exclusive {
            anyhow::bail!(
                "invalid offset range: start {} is after end {}",
                start,
                end_exclusive
            );
        }

        Ok(Self {
            start,
            end_exclusive,
        })
    }

    pub fn of_length(length: usize) -> Self {
        Self::new(0, length)
    }

    pub fn of_start_and_length(start: usize, length: usize) -> Self {
        Self::new(start, start + length)
    }

    pub fn empty_at(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end_exclusive(&self) -> usize {
        self.end_exclusive
    }

    pub fn len(&self) -> usize {
        self.end_exclusive - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end_exclusive
    }

    /// Move both ends by `offset`
    pub fn delta(&self, offset: isize) -> Self {
        Self::new(shift(self.start, offset), shift(self.end_exclusive, offset))
    }

    pub fn delta_start(&self, offset: isize) -> Self {
        Self::new(shift(self.start, offset), self.end_exclusive)
    }

    pub fn delta_end(&self, offset: isize) -> Self {
        Self::new(self.start, shift(self.end_exclusive, offset))
    }

    /// Smallest range covering both `self` and `other`
    pub fn join(&self, other: &Self) -> Self {
        Self::new(
            self.start.min(other.start),
            self.end_exclusive.max(other.end_exclusive),
        )
    }

    /// Common part of both ranges
    ///
    /// Two ranges that only touch intersect in an empty range at the touching point.
    /// Returns `None` when they are disjoint.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end_exclusive = self.end_exclusive.min(other.end_exclusive);

        (start <= end_exclusive).then(|| Self::new(start, end_exclusive))
    }

    /// True if the ranges share at least one element
    pub fn intersects(&self, other: &Self) -> bool {
        self.start.max(other.start) < self.end_exclusive.min(other.end_exclusive)
    }

    pub fn intersects_or_touches(&self, other: &Self) -> bool {
        self.start.max(other.start) <= self.end_exclusive.min(other.end_exclusive)
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end_exclusive
    }

    pub fn contains_range(&self, other: &Self) -> bool {
        self.start <= other.start && other.end_exclusive <= self.end_exclusive
    }

    pub fn is_before(&self, other: &Self) -> bool {
        self.end_exclusive <= other.start
    }

    pub fn is_after(&self, other: &Self) -> bool {
        self.start >= other.end_exclusive
    }

    /// Clamp `value` into `[start, end_exclusive - 1]`
    pub fn clip(&self, value: usize) -> usize {
        assert!(!self.is_empty(), "cannot clip into an empty range {self}");
        value.clamp(self.start, self.end_exclusive - 1)
    }

    pub fn slice<'s, T>(&self, items: &'s [T]) -> &'s [T] {
        &items[self.start..self.end_exclusive]
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end_exclusive
    }
}

impl From<Range<usize>> for OffsetRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl fmt::Display for OffsetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end_exclusive)
    }
}

/// Offset arithmetic that must never leave the index space
pub(crate) fn shift(value: usize, delta: isize) -> usize {
    match value.checked_add_signed(delta) {
        Some(shifted) => shifted,
        None => panic!("offset {value} shifted by {delta} leaves the index space"),
    }
}
