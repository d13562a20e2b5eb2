//! Post-processing of raw alignments
//!
//! The algorithms produce *an* optimal alignment, not necessarily the one a
//! reader expects. These passes rewrite the raw diff list into a more readable
//! one without changing what it describes:
//!
//! - `shifting`: Join diffs that can slide into each other and align the rest to boundaries
//! - `smoothing`: Merge diffs separated by tiny unchanged regions
//! - `words`: Widen mostly changed words to whole-word changes

pub mod shifting;
pub mod smoothing;
pub mod words;

pub use shifting::optimize_sequence_diffs;
pub use smoothing::{
    remove_short_matches, remove_very_short_matching_lines_between_diffs,
    remove_very_short_matching_text_between_long_diffs,
};
pub use words::extend_diffs_to_entire_word;

use crate::artifacts::algorithms::SequenceDiff;
use crate::artifacts::sequence::{CharSequence, LineSequence};
use tracing::debug;

/// Largest unchanged gap (in elements) that still gets merged away
pub const SMOOTHING_GAP: usize = 2;

/// How far a diff may slide in each direction looking for a better boundary
pub const BOUNDARY_SHIFT_LIMIT: usize = 20;

const MAX_PIPELINE_ROUNDS: usize = 16;

/// Post-process the raw alignment of two line sequences
///
/// Re-running this on its own output returns it unchanged.
pub fn postprocess_line_diffs(
    seq1: &LineSequence<'_>,
    seq2: &LineSequence<'_>,
    diffs: Vec<SequenceDiff>,
) -> Vec<SequenceDiff> {
    until_stable(diffs, |diffs| {
        let diffs = optimize_sequence_diffs(seq1, seq2, diffs);
        let diffs = remove_short_matches(diffs);
        remove_very_short_matching_lines_between_diffs(seq1, diffs)
    })
}

/// Post-process the raw alignment of two char sequences
///
/// Re-running this on its own output returns it unchanged.
pub fn postprocess_char_diffs(
    seq1: &CharSequence,
    seq2: &CharSequence,
    diffs: Vec<SequenceDiff>,
) -> Vec<SequenceDiff> {
    until_stable(diffs, |diffs| {
        let diffs = optimize_sequence_diffs(seq1, seq2, diffs);
        let diffs = extend_diffs_to_entire_word(seq1, seq2, diffs);
        let diffs = remove_short_matches(diffs);
        remove_very_short_matching_text_between_long_diffs(seq1, seq2, diffs)
    })
}

/// A merge can bring diffs close enough for another pass to join them, so one
/// run of the passes is not always a fixed point.
fn until_stable(
    mut diffs: Vec<SequenceDiff>,
    passes: impl Fn(Vec<SequenceDiff>) -> Vec<SequenceDiff>,
) -> Vec<SequenceDiff> {
    for round in 0..MAX_PIPELINE_ROUNDS {
        let next = passes(diffs.clone());
        if next == diffs {
            debug!(round, diffs = diffs.len(), "post-processing settled");
            return diffs;
        }
        diffs = next;
    }

    debug!(diffs = diffs.len(), "post-processing stopped before settling");
    diffs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::algorithms::deadline::Deadline;
    use crate::artifacts::algorithms::myers::MyersDiffing;
    use crate::artifacts::algorithms::tests::diff;
    use crate::artifacts::algorithms::{Algorithm, DiffAlgorithm};
    use crate::artifacts::ranges::position::TextRange;
    use crate::artifacts::sequence::{LineHashes, Sequence};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn text_range(lines: &[&str]) -> TextRange {
        let last = lines.last().map_or(0, |line| line.chars().count());
        TextRange::new(1, 1, lines.len(), last + 1)
    }

    /// Equal regions must still pair equal elements after post-processing
    fn assert_describes_same_edit<S: Sequence>(seq1: &S, seq2: &S, diffs: &[SequenceDiff]) {
        SequenceDiff::assert_sorted(diffs);
        for equal in SequenceDiff::invert(diffs, seq1.len()) {
            assert_eq!(equal.seq1_range.len(), equal.seq2_range.len());
            for k in 0..equal.seq1_range.len() {
                assert_eq!(
                    seq1.element(equal.seq1_range.start() + k),
                    seq2.element(equal.seq2_range.start() + k)
                );
            }
        }
    }

    #[test]
    fn test_word_insertion_stays_one_diff() {
        let seq1 = CharSequence::new(&["hello world"], text_range(&["hello world"]), true);
        let seq2 = CharSequence::new(
            &["hello brave world"],
            text_range(&["hello brave world"]),
            true,
        );
        let raw = Algorithm::DynamicProgramming
            .compute(&seq1, &seq2, &Deadline::infinite(), None)
            .diffs;

        let diffs = postprocess_char_diffs(&seq1, &seq2, raw);

        assert_eq!(diffs, vec![diff(5, 5, 5, 11)]);
    }

    #[test]
    fn test_changes_two_lines_apart_are_merged() {
        let original = ["a1", "b1", "c1", "d1", "e1"];
        let modified = ["X9", "b1", "c1", "Y9", "e1"];
        let mut hashes = LineHashes::new();
        let seq1 = LineSequence::new(&original, &mut hashes);
        let seq2 = LineSequence::new(&modified, &mut hashes);

        let diffs = postprocess_line_diffs(
            &seq1,
            &seq2,
            vec![diff(0, 1, 0, 1), diff(3, 4, 3, 4)],
        );

        assert_eq!(diffs, vec![diff(0, 4, 0, 4)]);
    }

    #[test]
    fn test_char_pipeline_settles_after_late_merge() {
        let lines1 = ["", "a", "c", "c", "", "", " "];
        let lines2 = ["a", "cac ", "", ""];
        let seq1 = CharSequence::new(&lines1, text_range(&lines1), true);
        let seq2 = CharSequence::new(&lines2, text_range(&lines2), true);
        let raw = MyersDiffing.compute(&seq1, &seq2, &Deadline::infinite(), None).diffs;

        let once = postprocess_char_diffs(&seq1, &seq2, raw);
        let twice = postprocess_char_diffs(&seq1, &seq2, once.clone());

        assert_eq!(once, twice);
        assert_describes_same_edit(&seq1, &seq2, &once);
    }

    proptest! {
        #[test]
        fn test_char_pipeline_is_idempotent(
            a in "[ac ,\n]{0,30}",
            b in "[ac ,\n]{0,30}",
        ) {
            let lines1: Vec<&str> = a.split('\n').collect();
            let lines2: Vec<&str> = b.split('\n').collect();
            let seq1 = CharSequence::new(&lines1, text_range(&lines1), true);
            let seq2 = CharSequence::new(&lines2, text_range(&lines2), true);
            let raw = MyersDiffing.compute(&seq1, &seq2, &Deadline::infinite(), None).diffs;

            let once = postprocess_char_diffs(&seq1, &seq2, raw);
            let twice = postprocess_char_diffs(&seq1, &seq2, once.clone());

            prop_assert_eq!(&once, &twice);
            assert_describes_same_edit(&seq1, &seq2, &once);
        }

        #[test]
        fn test_line_pipeline_is_idempotent(
            a in prop::collection::vec("[ab]{0,2}", 1..12),
            b in prop::collection::vec("[ab]{0,2}", 1..12),
        ) {
            let lines1: Vec<&str> = a.iter().map(String::as_str).collect();
            let lines2: Vec<&str> = b.iter().map(String::as_str).collect();
            let mut hashes = LineHashes::new();
            let seq1 = LineSequence::new(&lines1, &mut hashes);
            let seq2 = LineSequence::new(&lines2, &mut hashes);
            let raw = MyersDiffing.compute(&seq1, &seq2, &Deadline::infinite(), None).diffs;

            let once = postprocess_line_diffs(&seq1, &seq2, raw);
            let twice = postprocess_line_diffs(&seq1, &seq2, once.clone());

            prop_assert_eq!(&once, &twice);
            assert_describes_same_edit(&seq1, &seq2, &once);
        }
    }
}
