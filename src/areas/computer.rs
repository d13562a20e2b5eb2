//! Two-level diff computation
//!
//! Documents are first aligned line by line over trimmed line ids. Every
//! changed block that is small enough is then aligned again char by char, and
//! the resulting char changes are folded back into line mappings.

use crate::artifacts::algorithms::deadline::Deadline;
use crate::artifacts::algorithms::{Algorithm, EqualityScore, OffsetPair, SequenceDiff};
use crate::artifacts::heuristics::{postprocess_char_diffs, postprocess_line_diffs};
use crate::artifacts::mapping::{
    LineRangeMapping, LinesDiff, RangeMapping, get_line_range_mapping, group_line_range_mappings,
};
use crate::artifacts::options::DiffOptions;
use crate::artifacts::ranges::line_range::LineRange;
use crate::artifacts::ranges::offset_range::OffsetRange;
use crate::artifacts::ranges::position::TextRange;
use crate::artifacts::sequence::{
    CharSequence, LineHashes, LineSequence, Sequence, line_match_weight,
};
use tracing::{debug, trace, warn};

/// Combined line count below which the line pass uses dynamic programming
pub const LINE_DP_THRESHOLD: usize = 1700;

/// Combined char count below which the char pass uses dynamic programming
pub const CHAR_DP_THRESHOLD: usize = 500;

/// Blocks with this many lines (on either side) or more are not refined
pub const REFINEMENT_LINE_LIMIT: usize = 20;

/// Char changes of one refined block, or its coarse mapping
struct RefinedBlock {
    mappings: Vec<LineRangeMapping>,
    hit_timeout: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LinesDiffComputer;

impl LinesDiffComputer {
    pub fn new() -> Self {
        Self
    }

    /// Diff `original` against `modified` within the time budget of `options`
    pub fn compute_diff(
        &self,
        original: &[&str],
        modified: &[&str],
        options: &DiffOptions,
    ) -> LinesDiff {
        self.compute_diff_with_deadline(original, modified, options, &options.deadline())
    }

    /// Same as `compute_diff`, but bounded by a caller-provided deadline
    pub fn compute_diff_with_deadline(
        &self,
        original: &[&str],
        modified: &[&str],
        options: &DiffOptions,
        deadline: &Deadline,
    ) -> LinesDiff {
        if original.len() <= 1 && original == modified {
            return LinesDiff::default();
        }
        match (is_blank(original), is_blank(modified)) {
            (true, true) => return LinesDiff::default(),
            (false, false) => {}
            _ => return whole_document_change(original, modified),
        }

        let consider_whitespace_changes = !options.ignore_trim_whitespace;

        let mut hashes = LineHashes::new();
        let seq1 = LineSequence::new(original, &mut hashes);
        let seq2 = LineSequence::new(modified, &mut hashes);
        debug!(
            original_lines = seq1.len(),
            modified_lines = seq2.len(),
            distinct_lines = hashes.len(),
            "hashed documents"
        );

        let weight: &EqualityScore<'_> =
            &|offset1, offset2| line_match_weight(original[offset1], modified[offset2]);
        let alignment = Algorithm::select(seq1.len() + seq2.len(), LINE_DP_THRESHOLD).compute(
            &seq1,
            &seq2,
            deadline,
            Some(weight),
        );
        let mut hit_timeout = alignment.hit_timeout;

        let line_diffs = postprocess_line_diffs(&seq1, &seq2, alignment.diffs);
        debug!(blocks = line_diffs.len(), "line pass done");

        let mut mappings = Vec::new();
        let mut last = OffsetPair::ZERO;
        for diff in &line_diffs {
            let equal_lines = diff.seq1_range.start() - last.offset1;
            debug_assert_eq!(equal_lines, diff.seq2_range.start() - last.offset2);

            if consider_whitespace_changes {
                mappings.extend(scan_for_whitespace_changes(
                    original,
                    modified,
                    last,
                    equal_lines,
                ));
            }
            last = diff.end_exclusives();

            let refined = self.refine_block(original, modified, diff, options, deadline);
            hit_timeout |= refined.hit_timeout;
            mappings.extend(refined.mappings);
        }
        if consider_whitespace_changes {
            mappings.extend(scan_for_whitespace_changes(
                original,
                modified,
                last,
                original.len() - last.offset1,
            ));
        }

        let changes = group_line_range_mappings(mappings);
        for pair in changes.windows(2) {
            assert!(
                pair[0].original.end_line_number_exclusive() < pair[1].original.start_line_number()
                    && pair[0].modified.end_line_number_exclusive()
                        < pair[1].modified.start_line_number(),
                "changes {} -> {} and {} -> {} are not separated by unchanged lines",
                pair[0].original,
                pair[0].modified,
                pair[1].original,
                pair[1].modified
            );
        }

        if hit_timeout {
            warn!(changes = changes.len(), "diff computation ran out of time");
        }

        LinesDiff::new(changes, hit_timeout)
    }

    /// Refine a changed line block into char changes, or keep it coarse
    fn refine_block(
        &self,
        original: &[&str],
        modified: &[&str],
        diff: &SequenceDiff,
        options: &DiffOptions,
        deadline: &Deadline,
    ) -> RefinedBlock {
        let block = LineRangeMapping::from_sequence_diff(diff);

        if !should_refine(diff, options) || deadline.has_expired() {
            trace!(original = %block.original, modified = %block.modified, "keeping block coarse");
            return RefinedBlock {
                mappings: vec![block],
                hit_timeout: false,
            };
        }

        self.refine_diff(
            original,
            modified,
            &block,
            !options.ignore_trim_whitespace,
            deadline,
        )
    }

    fn refine_diff(
        &self,
        original: &[&str],
        modified: &[&str],
        block: &LineRangeMapping,
        consider_whitespace_changes: bool,
        deadline: &Deadline,
    ) -> RefinedBlock {
        let range = block.to_range_mapping(original, modified);
        let slice1 = CharSequence::new(original, range.original_range, consider_whitespace_changes);
        let slice2 = CharSequence::new(modified, range.modified_range, consider_whitespace_changes);

        let alignment = Algorithm::select(slice1.len() + slice2.len(), CHAR_DP_THRESHOLD)
            .compute(&slice1, &slice2, deadline, None);

        let diffs = postprocess_char_diffs(&slice1, &slice2, alignment.diffs);
        trace!(
            original = %block.original,
            modified = %block.modified,
            inner_changes = diffs.len(),
            "refined block"
        );

        let mappings = diffs
            .iter()
            .map(|diff| {
                RangeMapping::new(
                    slice1.translate_range(diff.seq1_range),
                    slice2.translate_range(diff.seq2_range),
                )
            })
            .map(|mapping| get_line_range_mapping(mapping, original, modified))
            .collect();

        RefinedBlock {
            mappings,
            hit_timeout: alignment.hit_timeout,
        }
    }
}

/// Lines equal after trimming but not before, each reported as a coarse change
fn scan_for_whitespace_changes(
    original: &[&str],
    modified: &[&str],
    start: OffsetPair,
    equal_lines: usize,
) -> Vec<LineRangeMapping> {
    (0..equal_lines)
        .map(|i| (start.offset1 + i, start.offset2 + i))
        .filter(|&(offset1, offset2)| original[offset1] != modified[offset2])
        .map(|(offset1, offset2)| {
            LineRangeMapping::from_sequence_diff(&SequenceDiff::new(
                OffsetRange::of_start_and_length(offset1, 1),
                OffsetRange::of_start_and_length(offset2, 1),
            ))
        })
        .collect()
}

/// Only blocks replacing lines by lines are refined, and only small ones unless
/// more minimal edits were asked for
fn should_refine(diff: &SequenceDiff, options: &DiffOptions) -> bool {
    if diff.seq1_range.is_empty() || diff.seq2_range.is_empty() {
        return false;
    }

    options.compute_more_minimal_edits
        || (diff.seq1_range.len() < REFINEMENT_LINE_LIMIT
            && diff.seq2_range.len() < REFINEMENT_LINE_LIMIT)
}

/// A document made of a single empty line has no lines to speak of
pub(crate) fn is_blank(lines: &[&str]) -> bool {
    matches!(lines, [] | [""])
}

/// One change replacing everything, used when one side is blank
fn whole_document_change(original: &[&str], modified: &[&str]) -> LinesDiff {
    let line_count = |lines: &[&str]| if is_blank(lines) { 0 } else { lines.len() };
    let full_text = |lines: &[&str]| match lines.last() {
        Some(last) if !is_blank(lines) => {
            TextRange::new(1, 1, lines.len(), last.chars().count() + 1)
        }
        _ => TextRange::new(1, 1, 1, 1),
    };

    LinesDiff::new(
        vec![LineRangeMapping::new(
            LineRange::new(1, line_count(original) + 1),
            LineRange::new(1, line_count(modified) + 1),
            Some(vec![RangeMapping::new(
                full_text(original),
                full_text(modified),
            )]),
        )],
        false,
    )
}
