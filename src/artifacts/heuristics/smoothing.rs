use crate::artifacts::algorithms::{OffsetPair, SequenceDiff};
use crate::artifacts::heuristics::SMOOTHING_GAP;
use crate::artifacts::ranges::offset_range::OffsetRange;
use crate::artifacts::sequence::{CharSequence, LineSequence, Sequence};

const MAX_ABSORB_ROUNDS: usize = 10;

/// Merge diffs separated by at most `SMOOTHING_GAP` equal elements on either side
pub fn remove_short_matches(diffs: Vec<SequenceDiff>) -> Vec<SequenceDiff> {
    let mut result: Vec<SequenceDiff> = Vec::with_capacity(diffs.len());

    for diff in diffs {
        match result.last_mut() {
            Some(last)
                if diff.seq1_range.start() - last.seq1_range.end_exclusive() <= SMOOTHING_GAP
                    || diff.seq2_range.start() - last.seq2_range.end_exclusive()
                        <= SMOOTHING_GAP =>
            {
                *last = last.join(&diff);
            }
            _ => result.push(diff),
        }
    }

    result
}

/// Repeatedly join neighbours for which `should_join(before, after)` holds
fn absorb_rounds(
    mut diffs: Vec<SequenceDiff>,
    should_join: impl Fn(&SequenceDiff, &SequenceDiff) -> bool,
) -> Vec<SequenceDiff> {
    for _ in 0..=MAX_ABSORB_ROUNDS {
        let mut joined = false;
        let mut result: Vec<SequenceDiff> = Vec::with_capacity(diffs.len());

        for cur in diffs {
            match result.last_mut() {
                Some(last) if should_join(last, &cur) => {
                    *last = last.join(&cur);
                    joined = true;
                }
                _ => result.push(cur),
            }
        }

        diffs = result;
        if !joined {
            break;
        }
    }

    diffs
}

/// Absorb tiny unchanged line runs sitting between two diffs when one of them is large
///
/// The unchanged text qualifies when it has at most 4 non-whitespace chars, and a
/// neighbour qualifies when it spans more than 5 lines across both sides.
pub fn remove_very_short_matching_lines_between_diffs(
    seq1: &LineSequence<'_>,
    diffs: Vec<SequenceDiff>,
) -> Vec<SequenceDiff> {
    absorb_rounds(diffs, |before, after| {
        let unchanged = OffsetRange::new(before.seq1_range.end_exclusive(), after.seq1_range.start());
        let significant = seq1
            .text(unchanged)
            .chars()
            .filter(|c| !c.is_whitespace())
            .count();

        significant <= 4
            && (before.seq1_range.len() + before.seq2_range.len() > 5
                || after.seq1_range.len() + after.seq2_range.len() > 5)
    })
}

/// Absorb short unchanged text between long char diffs, then grow long diffs over
/// near-empty line prefixes and suffixes
pub fn remove_very_short_matching_text_between_long_diffs(
    seq1: &CharSequence,
    seq2: &CharSequence,
    diffs: Vec<SequenceDiff>,
) -> Vec<SequenceDiff> {
    if diffs.is_empty() {
        return diffs;
    }

    let diffs = absorb_rounds(diffs, |before, after| {
        let unchanged = OffsetRange::new(before.seq1_range.end_exclusive(), after.seq1_range.start());
        if seq1.count_lines_in(unchanged) > 5 || unchanged.len() > 500 {
            return false;
        }

        let text = seq1.text(unchanged);
        let text = text.trim();
        if text.chars().count() > 20 || text.contains(['\r', '\n']) {
            return false;
        }

        let weight = |diff: &SequenceDiff| {
            let side1 = cap((seq1.count_lines_in(diff.seq1_range) * 40 + diff.seq1_range.len()) as f64);
            let side2 = cap((seq2.count_lines_in(diff.seq2_range) * 40 + diff.seq2_range.len()) as f64);
            (side1.powf(1.5) + side2.powf(1.5)).powf(1.5)
        };

        weight(before) + weight(after) > LONG_DIFF_CAP.powf(1.5).powf(1.5) * 1.3
    });

    let mut result: Vec<SequenceDiff> = Vec::with_capacity(diffs.len());
    for (i, cur) in diffs.iter().enumerate() {
        let should_mark_as_changed = |text: &str| {
            !text.is_empty()
                && text.trim().chars().count() <= 3
                && cur.seq1_range.len() + cur.seq2_range.len() > 100
        };

        let mut grown = *cur;
        let full = seq1.extend_to_full_lines(cur.seq1_range);

        let prefix = seq1.text(OffsetRange::new(full.start(), cur.seq1_range.start()));
        if should_mark_as_changed(&prefix) {
            let n = prefix.chars().count();
            grown = SequenceDiff::from_offset_pairs(
                OffsetPair::new(
                    grown.seq1_range.start().saturating_sub(n),
                    grown.seq2_range.start().saturating_sub(n),
                ),
                grown.end_exclusives(),
            );
        }
        let suffix = seq1.text(OffsetRange::new(cur.seq1_range.end_exclusive(), full.end_exclusive()));
        if should_mark_as_changed(&suffix) {
            grown = grown.delta_end(suffix.chars().count() as isize);
        }

        let available = SequenceDiff::from_offset_pairs(
            i.checked_sub(1)
                .map_or(OffsetPair::ZERO, |prev| diffs[prev].end_exclusives()),
            diffs
                .get(i + 1)
                .map_or(OffsetPair::new(seq1.len(), seq2.len()), |next| next.starts()),
        );
        let grown = grown.intersect(&available).unwrap_or(*cur);

        match result.last_mut() {
            Some(last) if last.end_exclusives() == grown.starts() => *last = last.join(&grown),
            _ => result.push(grown),
        }
    }

    result
}

const LONG_DIFF_CAP: f64 = (2 * 40 + 50) as f64;

fn cap(value: f64) -> f64 {
    value.min(LONG_DIFF_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::algorithms::tests::diff;
    use crate::artifacts::ranges::position::TextRange;
    use crate::artifacts::sequence::LineHashes;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(vec![diff(0, 1, 0, 1), diff(3, 4, 3, 4)], vec![diff(0, 4, 0, 4)])]
    #[case(vec![diff(0, 1, 0, 1), diff(4, 5, 4, 5)], vec![diff(0, 1, 0, 1), diff(4, 5, 4, 5)])]
    #[case(vec![diff(0, 1, 0, 0), diff(5, 6, 2, 3)], vec![diff(0, 6, 0, 3)])]
    #[case(vec![], vec![])]
    fn test_remove_short_matches(#[case] input: Vec<SequenceDiff>, #[case] expected: Vec<SequenceDiff>) {
        assert_eq!(remove_short_matches(input), expected);
    }

    #[test]
    fn test_blank_lines_between_a_large_diff_are_absorbed() {
        let lines = ["a", "b", "c", "", "}", "d", "e", "f"];
        let mut hashes = LineHashes::new();
        let seq1 = LineSequence::new(&lines, &mut hashes);
        let diffs = vec![diff(0, 3, 0, 4), diff(5, 8, 6, 7)];

        let result = remove_very_short_matching_lines_between_diffs(&seq1, diffs);

        assert_eq!(result, vec![diff(0, 8, 0, 7)]);
    }

    #[test]
    fn test_meaningful_lines_between_diffs_are_kept() {
        let lines = ["a", "let value = 1;", "b"];
        let mut hashes = LineHashes::new();
        let seq1 = LineSequence::new(&lines, &mut hashes);
        let diffs = vec![diff(0, 1, 0, 6), diff(2, 3, 7, 8)];

        let result = remove_very_short_matching_lines_between_diffs(&seq1, diffs.clone());

        assert_eq!(result, diffs);
    }

    #[test]
    fn test_short_text_between_small_char_diffs_is_kept() {
        let lines1 = ["abc def ghi"];
        let lines2 = ["xbc def ghx"];
        let seq1 = CharSequence::new(&lines1, TextRange::new(1, 1, 1, 12), true);
        let seq2 = CharSequence::new(&lines2, TextRange::new(1, 1, 1, 12), true);
        let diffs = vec![diff(0, 1, 0, 1), diff(10, 11, 10, 11)];

        assert_eq!(
            remove_very_short_matching_text_between_long_diffs(&seq1, &seq2, diffs.clone()),
            diffs
        );
    }

    #[test]
    fn test_short_text_between_long_char_diffs_is_absorbed() {
        let long1 = "a".repeat(120);
        let long2 = "b".repeat(120);
        let line1 = format!("{long1} = {long1}");
        let line2 = format!("{long2} = {long2}");
        let len = line1.chars().count();
        let seq1 = CharSequence::new(&[line1.as_str()], TextRange::new(1, 1, 1, len + 1), true);
        let seq2 = CharSequence::new(&[line2.as_str()], TextRange::new(1, 1, 1, len + 1), true);
        let diffs = vec![diff(0, 120, 0, 120), diff(123, 243, 123, 243)];

        assert_eq!(
            remove_very_short_matching_text_between_long_diffs(&seq1, &seq2, diffs),
            vec![diff(0, 243, 0, 243)]
        );
    }
}
