use crate::artifacts::algorithms::SequenceDiff;
use crate::artifacts::heuristics::BOUNDARY_SHIFT_LIMIT;
use crate::artifacts::ranges::offset_range::OffsetRange;
use crate::artifacts::sequence::Sequence;

/// Join and align diffs whose position is ambiguous
///
/// A pure insertion or deletion next to repeated content can be placed anywhere
/// inside the repetition. This first joins such diffs with their neighbours when
/// sliding makes them touch, then slides the remaining ones to the best scored
/// boundary.
pub fn optimize_sequence_diffs<S: Sequence + ?Sized>(
    seq1: &S,
    seq2: &S,
    diffs: Vec<SequenceDiff>,
) -> Vec<SequenceDiff> {
    let diffs = join_sequence_diffs_by_shifting(seq1, seq2, diffs);
    // a second round catches joins enabled by the first one
    let diffs = join_sequence_diffs_by_shifting(seq1, seq2, diffs);
    shift_sequence_diffs(seq1, seq2, diffs)
}

pub fn join_sequence_diffs_by_shifting<S: Sequence + ?Sized>(
    seq1: &S,
    seq2: &S,
    diffs: Vec<SequenceDiff>,
) -> Vec<SequenceDiff> {
    let mut diffs = diffs.into_iter();
    let Some(first) = diffs.next() else {
        return Vec::new();
    };

    // Slide every pure insertion/deletion left, merging into the previous diff on contact
    let mut left: Vec<SequenceDiff> = Vec::with_capacity(diffs.len() + 1);
    let mut prev = first;
    for mut cur in diffs {
        if cur.seq1_range.is_empty() || cur.seq2_range.is_empty() {
            let length = cur.seq1_range.start() - prev.seq1_range.end_exclusive();
            let mut d = 0;
            while d < length && slides(seq1, seq2, &cur, -(d as isize) - 1) {
                d += 1;
            }

            if d == length {
                prev = SequenceDiff::new(
                    OffsetRange::new(
                        prev.seq1_range.start(),
                        cur.seq1_range.end_exclusive() - length,
                    ),
                    OffsetRange::new(
                        prev.seq2_range.start(),
                        cur.seq2_range.end_exclusive() - length,
                    ),
                );
                continue;
            }
            cur = cur.delta(-(d as isize));
        }

        left.push(prev);
        prev = cur;
    }
    left.push(prev);

    // Then slide them right, merging into the next diff on contact
    let mut result = Vec::with_capacity(left.len());
    for i in 0..left.len() {
        let mut cur = left[i];
        let Some(&next) = left.get(i + 1) else {
            result.push(cur);
            break;
        };

        if cur.seq1_range.is_empty() || cur.seq2_range.is_empty() {
            let length = next.seq1_range.start() - cur.seq1_range.end_exclusive();
            let mut d = 0;
            while d < length && slides(seq1, seq2, &cur, d as isize) {
                d += 1;
            }

            if d == length {
                left[i + 1] = SequenceDiff::new(
                    OffsetRange::new(
                        cur.seq1_range.start() + length,
                        next.seq1_range.end_exclusive(),
                    ),
                    OffsetRange::new(
                        cur.seq2_range.start() + length,
                        next.seq2_range.end_exclusive(),
                    ),
                );
                continue;
            }
            cur = cur.delta(d as isize);
        }

        result.push(cur);
    }

    result
}

/// Whether the element entering the diff at `offset` equals the one leaving it
///
/// For a negative `offset` this compares the elements just before the start and
/// just before the end; for a non-negative one, the elements at start and end.
fn slides<S: Sequence + ?Sized>(seq1: &S, seq2: &S, diff: &SequenceDiff, offset: isize) -> bool {
    let at = |range: &OffsetRange| {
        let shifted = range.delta(offset);
        (shifted.start(), shifted.end_exclusive())
    };
    let (s1, e1) = at(&diff.seq1_range);
    let (s2, e2) = at(&diff.seq2_range);

    seq1.is_strongly_equal(s1, e1) && seq2.is_strongly_equal(s2, e2)
}

/// Slide each pure insertion/deletion to the best scored position between its neighbours
pub fn shift_sequence_diffs<S: Sequence + ?Sized>(
    seq1: &S,
    seq2: &S,
    mut diffs: Vec<SequenceDiff>,
) -> Vec<SequenceDiff> {
    if seq1.boundary_score(0).is_none() || seq2.boundary_score(0).is_none() {
        return diffs;
    }

    for i in 0..diffs.len() {
        let prev = i.checked_sub(1).map(|idx| diffs[idx]);
        let next = diffs.get(i + 1).copied();
        let diff = diffs[i];

        let window1 = (
            prev.map_or(0, |p| p.seq1_range.end_exclusive() + 1),
            next.map_or(seq1.len(), |n| n.seq1_range.start().saturating_sub(1)),
        );
        let window2 = (
            prev.map_or(0, |p| p.seq2_range.end_exclusive() + 1),
            next.map_or(seq2.len(), |n| n.seq2_range.start().saturating_sub(1)),
        );

        if diff.seq1_range.is_empty() {
            diffs[i] = shift_diff_to_better_position(diff, seq1, seq2, window1, window2);
        } else if diff.seq2_range.is_empty() {
            diffs[i] =
                shift_diff_to_better_position(diff.swap(), seq2, seq1, window2, window1).swap();
        }
    }

    diffs
}

/// Slide an insertion (empty `seq1_range`) inside the given windows
///
/// Windows are `(start, end_exclusive)` bounds that keep the diff clear of its
/// neighbours. Among equally scored positions the leftmost one wins.
fn shift_diff_to_better_position<S: Sequence + ?Sized>(
    diff: SequenceDiff,
    seq1: &S,
    seq2: &S,
    window1: (usize, usize),
    window2: (usize, usize),
) -> SequenceDiff {
    let (start1, start2, end2) = (
        diff.seq1_range.start(),
        diff.seq2_range.start(),
        diff.seq2_range.end_exclusive(),
    );

    let mut delta_before = 0;
    while delta_before + 1 < BOUNDARY_SHIFT_LIMIT
        && start1 >= window1.0 + delta_before + 1
        && start2 >= window2.0 + delta_before + 1
        && seq2.is_strongly_equal(start2 - delta_before - 1, end2 - delta_before - 1)
    {
        delta_before += 1;
    }

    let mut delta_after = 0;
    while delta_after < BOUNDARY_SHIFT_LIMIT
        && start1 + delta_after < window1.1
        && end2 + delta_after < window2.1
        && seq2.is_strongly_equal(start2 + delta_after, end2 + delta_after)
    {
        delta_after += 1;
    }

    if delta_before == 0 && delta_after == 0 {
        return diff;
    }

    let score = |delta: isize| -> i32 {
        let at = |offset: usize| offset.checked_add_signed(delta).unwrap_or(0);
        seq1.boundary_score(at(start1)).unwrap_or(0)
            + seq2.boundary_score(at(start2)).unwrap_or(0)
            + seq2.boundary_score(at(end2)).unwrap_or(0)
    };

    let mut best_delta: isize = 0;
    let mut best_score = -1;
    for delta in -(delta_before as isize)..=(delta_after as isize) {
        let candidate = score(delta);
        if candidate > best_score {
            best_score = candidate;
            best_delta = delta;
        }
    }

    diff.delta(best_delta)
}
