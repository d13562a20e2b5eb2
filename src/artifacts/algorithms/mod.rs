//! Sequence alignment
//!
//! This module contains the alignment algorithms and the types they exchange:
//!
//! - `deadline`: Cooperative time budget polled by the algorithms
//! - `dynamic_programming`: Exact O(N·M) alignment with a weighted scoring function
//! - `myers`: Myers' O(N·D) greedy alignment for larger inputs
//!
//! Both algorithms report the non-matching regions of two sequences as a sorted
//! list of `SequenceDiff`s. The equal regions are everything in between.

pub mod deadline;
pub mod dynamic_programming;
pub mod myers;

use crate::artifacts::algorithms::deadline::Deadline;
use crate::artifacts::algorithms::dynamic_programming::DynamicProgrammingDiffing;
use crate::artifacts::algorithms::myers::MyersDiffing;
use crate::artifacts::ranges::offset_range::{OffsetRange, shift};
use crate::artifacts::sequence::Sequence;
use std::fmt;
use tracing::debug;

/// Reward for aligning `seq1[offset1]` with `seq2[offset2]`
pub type EqualityScore<'a> = dyn Fn(usize, usize) -> f64 + 'a;

/// A point in the edit graph of two sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OffsetPair {
    pub offset1: usize,
    pub offset2: usize,
}

impl OffsetPair {
    pub const ZERO: OffsetPair = OffsetPair {
        offset1: 0,
        offset2: 0,
    };

    pub fn new(offset1: usize, offset2: usize) -> Self {
        Self { offset1, offset2 }
    }

    pub fn delta(&self, offset: isize) -> Self {
        if offset == 0 {
            return *self;
        }

        Self::new(shift(self.offset1, offset), shift(self.offset2, offset))
    }
}

impl fmt::Display for OffsetPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.offset1, self.offset2)
    }
}

/// A region of `seq1` that was replaced by a region of `seq2`
///
/// Either side may be empty (pure insertion or deletion), but never both once
/// an algorithm has reported it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceDiff {
    pub seq1_range: OffsetRange,
    pub seq2_range: OffsetRange,
}

impl SequenceDiff {
    pub fn new(seq1_range: OffsetRange, seq2_range: OffsetRange) -> Self {
        Self {
            seq1_range,
            seq2_range,
        }
    }

    pub fn from_offset_pairs(start: OffsetPair, end_exclusive: OffsetPair) -> Self {
        Self::new(
            OffsetRange::new(start.offset1, end_exclusive.offset1),
            OffsetRange::new(start.offset2, end_exclusive.offset2),
        )
    }

    /// The equal regions between `diffs`, including the leading and trailing ones
    pub fn invert(diffs: &[SequenceDiff], seq1_len: usize) -> Vec<SequenceDiff> {
        let mut result = Vec::with_capacity(diffs.len() + 1);
        let mut previous: Option<&SequenceDiff> = None;

        for next in diffs.iter().map(Some).chain(std::iter::once(None)) {
            let start = previous.map_or(OffsetPair::ZERO, |prev| prev.end_exclusives());
            let end = match next {
                Some(next) => next.starts(),
                None => {
                    let seq2_end = match previous {
                        Some(prev) => {
                            seq1_len + prev.seq2_range.end_exclusive()
                                - prev.seq1_range.end_exclusive()
                        }
                        None => seq1_len,
                    };
                    OffsetPair::new(seq1_len, seq2_end)
                }
            };

            result.push(Self::from_offset_pairs(start, end));
            previous = next;
        }

        result
    }

    /// Panics unless `diffs` are ordered and non-overlapping on both sides
    pub fn assert_sorted(diffs: &[SequenceDiff]) {
        for pair in diffs.windows(2) {
            let (last, cur) = (&pair[0], &pair[1]);
            assert!(
                last.seq1_range.end_exclusive() <= cur.seq1_range.start()
                    && last.seq2_range.end_exclusive() <= cur.seq2_range.start(),
                "sequence diffs must be sorted: {last} is not before {cur}"
            );
        }
    }

    pub fn swap(&self) -> Self {
        Self::new(self.seq2_range, self.seq1_range)
    }

    pub fn join(&self, other: &Self) -> Self {
        Self::new(
            self.seq1_range.join(&other.seq1_range),
            self.seq2_range.join(&other.seq2_range),
        )
    }

    pub fn delta(&self, offset: isize) -> Self {
        if offset == 0 {
            return *self;
        }
        Self::new(self.seq1_range.delta(offset), self.seq2_range.delta(offset))
    }

    pub fn delta_start(&self, offset: isize) -> Self {
        if offset == 0 {
            return *self;
        }
        Self::new(
            self.seq1_range.delta_start(offset),
            self.seq2_range.delta_start(offset),
        )
    }

    pub fn delta_end(&self, offset: isize) -> Self {
        if offset == 0 {
            return *self;
        }
        Self::new(
            self.seq1_range.delta_end(offset),
            self.seq2_range.delta_end(offset),
        )
    }

    pub fn intersects_or_touches(&self, other: &Self) -> bool {
        self.seq1_range.intersects_or_touches(&other.seq1_range)
            || self.seq2_range.intersects_or_touches(&other.seq2_range)
    }

    /// Intersection on both sides, `None` if either side is disjoint
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let seq1 = self.seq1_range.intersect(&other.seq1_range)?;
        let seq2 = self.seq2_range.intersect(&other.seq2_range)?;

        Some(Self::new(seq1, seq2))
    }

    pub fn starts(&self) -> OffsetPair {
        OffsetPair::new(self.seq1_range.start(), self.seq2_range.start())
    }

    pub fn end_exclusives(&self) -> OffsetPair {
        OffsetPair::new(
            self.seq1_range.end_exclusive(),
            self.seq2_range.end_exclusive(),
        )
    }
}

impl fmt::Display for SequenceDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.seq1_range, self.seq2_range)
    }
}

/// Output of a single alignment run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmResult {
    pub diffs: Vec<SequenceDiff>,
    pub hit_timeout: bool,
}

impl AlgorithmResult {
    pub fn new(diffs: Vec<SequenceDiff>, hit_timeout: bool) -> Self {
        Self { diffs, hit_timeout }
    }

    /// Everything in `seq1` replaced by everything in `seq2`
    pub fn trivial<S: Sequence + ?Sized>(seq1: &S, seq2: &S) -> Self {
        Self::new(Self::whole(seq1, seq2), false)
    }

    pub fn trivial_timed_out<S: Sequence + ?Sized>(seq1: &S, seq2: &S) -> Self {
        Self::new(Self::whole(seq1, seq2), true)
    }

    fn whole<S: Sequence + ?Sized>(seq1: &S, seq2: &S) -> Vec<SequenceDiff> {
        if seq1.is_empty() && seq2.is_empty() {
            return Vec::new();
        }

        vec![SequenceDiff::new(
            OffsetRange::of_length(seq1.len()),
            OffsetRange::of_length(seq2.len()),
        )]
    }
}

/// An alignment algorithm over two sequences of the same kind
pub trait DiffAlgorithm {
    /// Compute the non-matching regions of `seq1` and `seq2`
    ///
    /// Implementations poll `deadline` and return the trivial result with
    /// `hit_timeout` set once it expires. `score` is only consulted for
    /// positions whose elements are equal.
    fn compute<S: Sequence + ?Sized>(
        &self,
        seq1: &S,
        seq2: &S,
        deadline: &Deadline,
        score: Option<&EqualityScore<'_>>,
    ) -> AlgorithmResult;
}

/// Size-dependent choice between the two algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    DynamicProgramming,
    Myers,
}

impl Algorithm {
    /// DP below `threshold` combined elements, Myers from there on
    pub fn select(combined_len: usize, threshold: usize) -> Self {
        if combined_len < threshold {
            Algorithm::DynamicProgramming
        } else {
            Algorithm::Myers
        }
    }

    pub fn compute<S: Sequence + ?Sized>(
        &self,
        seq1: &S,
        seq2: &S,
        deadline: &Deadline,
        score: Option<&EqualityScore<'_>>,
    ) -> AlgorithmResult {
        debug!(
            algorithm = ?self,
            len1 = seq1.len(),
            len2 = seq2.len(),
            "aligning sequences"
        );

        match self {
            Algorithm::DynamicProgramming => {
                DynamicProgrammingDiffing.compute(seq1, seq2, deadline, score)
            }
            Algorithm::Myers => MyersDiffing.compute(seq1, seq2, deadline, score),
        }
    }
}
