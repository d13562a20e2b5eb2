use crate::artifacts::algorithms::{OffsetPair, SequenceDiff};
use crate::artifacts::sequence::{CharSequence, Sequence};
use std::collections::VecDeque;

/// Turn words that are mostly changed into a single whole-word change
///
/// Looks at the words touching the edges of every equal region. When less than
/// two thirds of such a word (on both sides combined) is unchanged, the whole
/// word pair is reported as changed and merged with the existing diffs.
pub fn extend_diffs_to_entire_word(
    seq1: &CharSequence,
    seq2: &CharSequence,
    diffs: Vec<SequenceDiff>,
) -> Vec<SequenceDiff> {
    let mut equal_mappings: VecDeque<SequenceDiff> = SequenceDiff::invert(&diffs, seq1.len()).into();
    let mut additional = Vec::new();
    let mut last_point = OffsetPair::ZERO;

    let mut scan_word = |pair: OffsetPair,
                         equal_mapping: &SequenceDiff,
                         equal_mappings: &mut VecDeque<SequenceDiff>| {
        if pair.offset1 < last_point.offset1 || pair.offset2 < last_point.offset2 {
            return;
        }
        let (Some(w1), Some(w2)) = (
            seq1.find_word_containing(pair.offset1),
            seq2.find_word_containing(pair.offset2),
        ) else {
            return;
        };

        let mut word = SequenceDiff::new(w1, w2);
        let Some(equal_part) = word.intersect(equal_mapping) else {
            return;
        };
        let mut equal_chars1 = equal_part.seq1_range.len();
        let mut equal_chars2 = equal_part.seq2_range.len();

        // Earlier equal regions were already scanned, but the word may reach into later ones
        while let Some(next) = equal_mappings.front().copied() {
            let touches = next.seq1_range.intersects(&word.seq1_range)
                || next.seq2_range.intersects(&word.seq2_range);
            if !touches {
                break;
            }

            let (Some(v1), Some(v2)) = (
                seq1.find_word_containing(next.seq1_range.start()),
                seq2.find_word_containing(next.seq2_range.start()),
            ) else {
                break;
            };
            let v = SequenceDiff::new(v1, v2);
            if let Some(equal_part) = v.intersect(&next) {
                equal_chars1 += equal_part.seq1_range.len();
                equal_chars2 += equal_part.seq2_range.len();
            }
            word = word.join(&v);

            if word.seq1_range.end_exclusive() >= next.seq1_range.end_exclusive() {
                equal_mappings.pop_front();
            } else {
                break;
            }
        }

        let total = word.seq1_range.len() + word.seq2_range.len();
        if (equal_chars1 + equal_chars2) * 3 < total * 2 {
            additional.push(word);
        }
        last_point = word.end_exclusives();
    };

    while let Some(next) = equal_mappings.pop_front() {
        if next.seq1_range.is_empty() {
            continue;
        }

        scan_word(next.starts(), &next, &mut equal_mappings);
        // the scan above may have consumed regions, so the end is checked separately
        scan_word(next.end_exclusives().delta(-1), &next, &mut equal_mappings);
    }

    merge_sequence_diffs(diffs, additional)
}

/// Merge two sorted diff lists, joining diffs that overlap or touch in `seq1`
pub fn merge_sequence_diffs(
    diffs1: Vec<SequenceDiff>,
    diffs2: Vec<SequenceDiff>,
) -> Vec<SequenceDiff> {
    let mut diffs1 = diffs1.into_iter().peekable();
    let mut diffs2 = diffs2.into_iter().peekable();
    let mut result: Vec<SequenceDiff> = Vec::new();

    loop {
        let take_first = match (diffs1.peek(), diffs2.peek()) {
            (None, None) => break,
            (Some(a), Some(b)) => a.seq1_range.start() < b.seq1_range.start(),
            (Some(_), None) => true,
            (None, Some(_)) => false,
        };
        let next = if take_first { diffs1.next() } else { diffs2.next() };
        let Some(next) = next else {
            break;
        };

        match result.last_mut() {
            Some(last) if last.seq1_range.end_exclusive() >= next.seq1_range.start() => {
                *last = last.join(&next);
            }
            _ => result.push(next),
        }
    }

    result
}
