//! Myers' greedy O(N·D) alignment
//!
//! Walks the edit graph one edit distance `d` at a time, keeping for every
//! diagonal `k = x - y` the furthest reaching x coordinate. Each diagonal also
//! remembers the chain of snakes (runs of equal elements) that led to it, so the
//! alignment can be read back once the bottom-right corner is reached.

use crate::artifacts::algorithms::deadline::Deadline;
use crate::artifacts::algorithms::{AlgorithmResult, DiffAlgorithm, EqualityScore, SequenceDiff};
use crate::artifacts::ranges::offset_range::OffsetRange;
use crate::artifacts::sequence::Sequence;
use tracing::warn;

/// Growable array indexed by a signed diagonal
///
/// Unset slots read as `T::default()`.
struct DiagonalArray<T> {
    positive: Vec<T>,
    negative: Vec<T>,
}

impl<T: Copy + Default> DiagonalArray<T> {
    fn new() -> Self {
        Self {
            positive: Vec::new(),
            negative: Vec::new(),
        }
    }

    fn slot(k: isize) -> (bool, usize) {
        if k < 0 {
            (false, (-k - 1) as usize)
        } else {
            (true, k as usize)
        }
    }

    fn get(&self, k: isize) -> T {
        let (positive, idx) = Self::slot(k);
        let side = if positive { &self.positive } else { &self.negative };
        side.get(idx).copied().unwrap_or_default()
    }

    fn set(&mut self, k: isize, value: T) {
        let (positive, idx) = Self::slot(k);
        let side = if positive {
            &mut self.positive
        } else {
            &mut self.negative
        };
        if idx >= side.len() {
            side.resize(idx + 1, T::default());
        }
        side[idx] = value;
    }
}

/// A run of equal elements starting at `(x, y)`, linked to the snake before it
#[derive(Debug, Clone, Copy)]
struct SnakePath {
    prev: Option<usize>,
    x: usize,
    y: usize,
    length: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MyersDiffing;

impl DiffAlgorithm for MyersDiffing {
    fn compute<S: Sequence + ?Sized>(
        &self,
        seq1: &S,
        seq2: &S,
        deadline: &Deadline,
        _score: Option<&EqualityScore<'_>>,
    ) -> AlgorithmResult {
        let (len_x, len_y) = (seq1.len(), seq2.len());
        if len_x == 0 || len_y == 0 {
            return AlgorithmResult::trivial(seq1, seq2);
        }

        let snake = |mut x: usize, mut y: usize| {
            while x < len_x && y < len_y && seq1.element(x) == seq2.element(y) {
                x += 1;
                y += 1;
            }
            x
        };

        let mut arena: Vec<SnakePath> = Vec::new();
        let mut v = DiagonalArray::<isize>::new();
        let mut paths = DiagonalArray::<Option<usize>>::new();

        let first = snake(0, 0);
        v.set(0, first as isize);
        if first > 0 {
            arena.push(SnakePath {
                prev: None,
                x: 0,
                y: 0,
                length: first,
            });
            paths.set(0, Some(0));
        }

        let (len_x, len_y) = (len_x as isize, len_y as isize);
        let mut d: isize = 0;
        let found = 'search: loop {
            d += 1;
            let lower = -d.min(len_y + d % 2);
            let upper = d.min(len_x + d % 2);

            let mut k = lower;
            while k <= upper {
                // polled per diagonal, a single round can take O(N) steps
                if !deadline.is_valid() {
                    warn!(d, k, "deadline expired during Myers alignment");
                    return AlgorithmResult::trivial_timed_out(seq1, seq2);
                }

                let top = if k == upper { -1 } else { v.get(k + 1) };
                let left = if k == lower { -1 } else { v.get(k - 1) + 1 };
                let x = top.max(left).min(len_x);
                let y = x - k;

                if x > len_x || y > len_y {
                    k += 2;
                    continue;
                }

                // y < 0 lies outside the grid; it still records the diagonal's reach
                let new_max_x = if y < 0 {
                    x
                } else {
                    snake(x as usize, y as usize) as isize
                };
                v.set(k, new_max_x);

                let last_path = if x == top {
                    paths.get(k + 1)
                } else {
                    paths.get(k - 1)
                };
                let path = if new_max_x != x {
                    arena.push(SnakePath {
                        prev: last_path,
                        x: x as usize,
                        y: y as usize,
                        length: (new_max_x - x) as usize,
                    });
                    Some(arena.len() - 1)
                } else {
                    last_path
                };
                paths.set(k, path);

                if new_max_x == len_x && new_max_x - k == len_y {
                    break 'search k;
                }
                k += 2;
            }
        };

        let mut diffs = Vec::new();
        let mut last1 = len_x as usize;
        let mut last2 = len_y as usize;
        let mut path = paths.get(found).map(|idx| arena[idx]);
        loop {
            let (end_x, end_y) = path.map_or((0, 0), |p| (p.x + p.length, p.y + p.length));
            if end_x != last1 || end_y != last2 {
                diffs.push(SequenceDiff::new(
                    OffsetRange::new(end_x, last1),
                    OffsetRange::new(end_y, last2),
                ));
            }

            let Some(current) = path else {
                break;
            };
            last1 = current.x;
            last2 = current.y;
            path = current.prev.map(|idx| arena[idx]);
        }

        diffs.reverse();
        AlgorithmResult::new(diffs, false)
    }
}
