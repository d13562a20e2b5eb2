//! Half-open ranges of 1-based line numbers
//!
//! `LineRange { start_line_number: 3, end_line_number_exclusive: 5 }` covers lines 3 and 4.
//! An empty range (`start == end`) marks an insertion point before `start`.

use crate::artifacts::ranges::offset_range::{OffsetRange, shift};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineRange {
    start_line_number: usize,
    end_line_number_exclusive: usize,
}

impl LineRange {
    pub fn new(start_line_number: usize, end_line_number_exclusive: usize) -> Self {
        assert!(
            start_line_number >= 1,
            "line numbers are 1-based, got {start_line_number}"
        );
        assert!(
            start_line_number <= end_line_number_exclusive,
            "invalid line range: start {start_line_number} is after end {end_line_number_exclusive}"
        );

        Self {
            start_line_number,
            end_line_number_exclusive,
        }
    }

    /// Validate and build a line range from untrusted bounds
    pub fn try_new(start_line_number: usize, end_line_number_exclusive: usize) -> anyhow::Result<Self> {
        if start_line_number == 0 {
            anyhow::bail!("line numbers are 1-based, got 0");
        }
        if start_line_number > end_line_number_exclusive {
            anyhow::bail!(
                "invalid line range: start {} is after end {}",
                start_line_number,
                end_line_number_exclusive
            );
        }

        Ok(Self {
            start_line_number,
            end_line_number_exclusive,
        })
    }

    /// Convert 0-based line indices into 1-based line numbers
    pub fn from_offset_range(range: OffsetRange) -> Self {
        Self::new(range.start() + 1, range.end_exclusive() + 1)
    }

    pub fn start_line_number(&self) -> usize {
        self.start_line_number
    }

    pub fn end_line_number_exclusive(&self) -> usize {
        self.end_line_number_exclusive
    }

    pub fn len(&self) -> usize {
        self.end_line_number_exclusive - self.start_line_number
    }

    pub fn is_empty(&self) -> bool {
        self.start_line_number == self.end_line_number_exclusive
    }

    pub fn contains(&self, line_number: usize) -> bool {
        self.start_line_number <= line_number && line_number < self.end_line_number_exclusive
    }

    pub fn delta(&self, offset: isize) -> Self {
        Self::new(
            shift(self.start_line_number, offset),
            shift(self.end_line_number_exclusive, offset),
        )
    }

    pub fn join(&self, other: &Self) -> Self {
        Self::new(
            self.start_line_number.min(other.start_line_number),
            self.end_line_number_exclusive
                .max(other.end_line_number_exclusive),
        )
    }

    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let start = self.start_line_number.max(other.start_line_number);
        let end = self
            .end_line_number_exclusive
            .min(other.end_line_number_exclusive);

        (start <= end).then(|| Self::new(start, end))
    }

    pub fn overlap_or_touch(&self, other: &Self) -> bool {
        self.start_line_number <= other.end_line_number_exclusive
            && other.start_line_number <= self.end_line_number_exclusive
    }

    /// 0-based line indices covered by this range
    pub fn to_offset_range(&self) -> OffsetRange {
        OffsetRange::new(
            self.start_line_number - 1,
            self.end_line_number_exclusive - 1,
        )
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{})",
            self.start_line_number, self.end_line_number_exclusive
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_offset_range_conversion() {
        let lines = LineRange::from_offset_range(OffsetRange::new(1, 3));

        assert_eq!(lines, LineRange::new(2, 4));
        assert_eq!(lines.to_offset_range(), OffsetRange::new(1, 3));
        assert_eq!(lines.len(), 2);
        assert!(lines.contains(3));
        assert!(!lines.contains(4));
    }

    #[test]
    fn test_overlap_or_touch() {
        let a = LineRange::new(2, 4);

        assert!(a.overlap_or_touch(&LineRange::new(4, 6)));
        assert!(a.overlap_or_touch(&LineRange::new(1, 2)));
        assert!(a.overlap_or_touch(&LineRange::new(3, 3)));
        assert!(!a.overlap_or_touch(&LineRange::new(5, 6)));
    }

    #[test]
    fn test_join_and_intersect() {
        let a = LineRange::new(2, 4);
        let b = LineRange::new(3, 7);

        assert_eq!(a.join(&b), LineRange::new(2, 7));
        assert_eq!(a.intersect(&b), Some(LineRange::new(3, 4)));
        assert_eq!(a.intersect(&LineRange::new(5, 6)), None);
    }

    #[test]
    fn test_empty_range_marks_insertion_point() {
        let insertion = LineRange::new(3, 3);

        assert!(insertion.is_empty());
        assert_eq!(insertion.len(), 0);
        assert_eq!(insertion.to_string(), "[3,3)");
    }

    #[test]
    fn test_try_new_rejects_malformed_ranges() {
        assert!(LineRange::try_new(0, 2).is_err());
        assert!(LineRange::try_new(5, 4).is_err());
        assert_eq!(LineRange::try_new(4, 4).unwrap(), LineRange::new(4, 4));
    }

    #[test]
    #[should_panic(expected = "1-based")]
    fn test_zero_line_number_panics() {
        LineRange::new(0, 1);
    }
}
