//! Weighted LCS alignment by dynamic programming
//!
//! Fills an N×M table where every cell holds the best alignment score of the
//! prefixes `seq1[..=i]` and `seq2[..=j]`. A match extends the diagonal score by
//! the pair's weight plus the length of the diagonal run that ends right before
//! it, so long contiguous matches beat scattered ones of the same size.
//!
//! Quadratic in time and memory, only used below the selector threshold.

use crate::artifacts::algorithms::deadline::Deadline;
use crate::artifacts::algorithms::{AlgorithmResult, DiffAlgorithm, EqualityScore, SequenceDiff};
use crate::artifacts::ranges::offset_range::OffsetRange;
use crate::artifacts::sequence::Sequence;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Direction {
    #[default]
    None,
    /// Advance in `seq1` only
    Horizontal,
    /// Advance in `seq2` only
    Vertical,
    Diagonal,
}

/// Dense row-major table
struct Grid<T> {
    width: usize,
    cells: Vec<T>,
}

impl<T: Copy + Default> Grid<T> {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            cells: vec![T::default(); width * height],
        }
    }

    fn get(&self, x: usize, y: usize) -> T {
        self.cells[x + y * self.width]
    }

    fn set(&mut self, x: usize, y: usize, value: T) {
        self.cells[x + y * self.width] = value;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicProgrammingDiffing;

impl DiffAlgorithm for DynamicProgrammingDiffing {
    fn compute<S: Sequence + ?Sized>(
        &self,
        seq1: &S,
        seq2: &S,
        deadline: &Deadline,
        score: Option<&EqualityScore<'_>>,
    ) -> AlgorithmResult {
        let (len1, len2) = (seq1.len(), seq2.len());
        if len1 == 0 || len2 == 0 {
            return AlgorithmResult::trivial(seq1, seq2);
        }

        let mut lcs = Grid::<f64>::new(len1, len2);
        let mut directions = Grid::<Direction>::new(len1, len2);
        let mut lengths = Grid::<usize>::new(len1, len2);

        for s1 in 0..len1 {
            for s2 in 0..len2 {
                if !deadline.is_valid() {
                    warn!(len1, len2, "deadline expired during dynamic programming alignment");
                    return AlgorithmResult::trivial_timed_out(seq1, seq2);
                }

                let horizontal = if s1 == 0 { 0.0 } else { lcs.get(s1 - 1, s2) };
                let vertical = if s2 == 0 { 0.0 } else { lcs.get(s1, s2 - 1) };

                let extended = if seq1.element(s1) == seq2.element(s2) {
                    let mut extended = 0.0;
                    if s1 > 0 && s2 > 0 {
                        extended = lcs.get(s1 - 1, s2 - 1);
                        if directions.get(s1 - 1, s2 - 1) == Direction::Diagonal {
                            extended += lengths.get(s1 - 1, s2 - 1) as f64;
                        }
                    }
                    extended + score.map_or(1.0, |score| score(s1, s2))
                } else {
                    -1.0
                };

                let best = horizontal.max(vertical).max(extended);

                if best == extended {
                    let previous = if s1 > 0 && s2 > 0 {
                        lengths.get(s1 - 1, s2 - 1)
                    } else {
                        0
                    };
                    lengths.set(s1, s2, previous + 1);
                    directions.set(s1, s2, Direction::Diagonal);
                } else if best == horizontal {
                    lengths.set(s1, s2, 0);
                    directions.set(s1, s2, Direction::Horizontal);
                } else {
                    lengths.set(s1, s2, 0);
                    directions.set(s1, s2, Direction::Vertical);
                }

                lcs.set(s1, s2, best);
            }
        }

        // Walk back from the bottom-right corner. `p1`/`p2` are one past the
        // cell being inspected so the walk never needs negative indices.
        let mut diffs = Vec::new();
        let mut last1 = len1;
        let mut last2 = len2;
        let mut report = |p1: usize, p2: usize, diffs: &mut Vec<SequenceDiff>| {
            if p1 != last1 || p2 != last2 {
                diffs.push(SequenceDiff::new(
                    OffsetRange::new(p1, last1),
                    OffsetRange::new(p2, last2),
                ));
            }
            last1 = p1.saturating_sub(1);
            last2 = p2.saturating_sub(1);
        };

        let (mut p1, mut p2) = (len1, len2);
        while p1 > 0 && p2 > 0 {
            match directions.get(p1 - 1, p2 - 1) {
                Direction::Diagonal => {
                    report(p1, p2, &mut diffs);
                    p1 -= 1;
                    p2 -= 1;
                }
                Direction::Horizontal => p1 -= 1,
                _ => p2 -= 1,
            }
        }
        report(0, 0, &mut diffs);

        diffs.reverse();
        AlgorithmResult::new(diffs, false)
    }
}
