//! Diff result model
//!
//! A `LinesDiff` is a list of `LineRangeMapping`s, each pairing a block of
//! original lines with the block of modified lines that replaced it. A refined
//! mapping also carries `RangeMapping`s that pin the change down to columns.

use crate::artifacts::algorithms::SequenceDiff;
use crate::artifacts::ranges::line_range::LineRange;
use crate::artifacts::ranges::position::{Position, TextRange};
use derive_new::new;

/// A character-precise replacement of `original_range` by `modified_range`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, new)]
pub struct RangeMapping {
    pub original_range: TextRange,
    pub modified_range: TextRange,
}

/// A line block replacement, optionally refined into character ranges
///
/// `inner_changes` is `None` when the block was not refined.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct LineRangeMapping {
    pub original: LineRange,
    pub modified: LineRange,
    pub inner_changes: Option<Vec<RangeMapping>>,
}

impl LineRangeMapping {
    /// Line mapping of a line-level sequence diff
    pub fn from_sequence_diff(diff: &SequenceDiff) -> Self {
        Self::new(
            LineRange::from_offset_range(diff.seq1_range),
            LineRange::from_offset_range(diff.seq2_range),
            None,
        )
    }

    /// The text range covered by this block on both sides
    ///
    /// Prefers whole lines `(start, 1)..(end_exclusive, 1)`. At the end of a
    /// document there is no next line to end on, so the range ends after the last
    /// covered line, or starts after the line preceding an empty block.
    pub fn to_range_mapping<S: AsRef<str>>(&self, original: &[S], modified: &[S]) -> RangeMapping {
        let valid = |line_number: usize, lines: &[S]| line_number >= 1 && line_number <= lines.len();

        if valid(self.original.end_line_number_exclusive(), original)
            && valid(self.modified.end_line_number_exclusive(), modified)
        {
            return RangeMapping::new(
                TextRange::new(
                    self.original.start_line_number(),
                    1,
                    self.original.end_line_number_exclusive(),
                    1,
                ),
                TextRange::new(
                    self.modified.start_line_number(),
                    1,
                    self.modified.end_line_number_exclusive(),
                    1,
                ),
            );
        }

        if !self.original.is_empty() && !self.modified.is_empty() {
            return RangeMapping::new(
                TextRange::from_positions(
                    Position::new(self.original.start_line_number(), 1),
                    line_end(self.original.end_line_number_exclusive() - 1, original),
                ),
                TextRange::from_positions(
                    Position::new(self.modified.start_line_number(), 1),
                    line_end(self.modified.end_line_number_exclusive() - 1, modified),
                ),
            );
        }

        assert!(
            self.original.start_line_number() > 1 && self.modified.start_line_number() > 1,
            "empty block {} -> {} at the document start has no anchoring line",
            self.original,
            self.modified
        );

        RangeMapping::new(
            TextRange::from_positions(
                line_end(self.original.start_line_number() - 1, original),
                line_end(self.original.end_line_number_exclusive() - 1, original),
            ),
            TextRange::from_positions(
                line_end(self.modified.start_line_number() - 1, modified),
                line_end(self.modified.end_line_number_exclusive() - 1, modified),
            ),
        )
    }
}

/// Position right after the last char of `line_number`, clamped into the document
fn line_end<S: AsRef<str>>(line_number: usize, lines: &[S]) -> Position {
    if line_number < 1 {
        return Position::new(1, 1);
    }
    let line_number = line_number.min(lines.len().max(1));
    let len = line_length(lines, line_number).unwrap_or(0);

    Position::new(line_number, len + 1)
}

/// Length in chars of a 1-based line, `None` past the document
fn line_length<S: AsRef<str>>(lines: &[S], line_number: usize) -> Option<usize> {
    line_number
        .checked_sub(1)
        .and_then(|idx| lines.get(idx))
        .map(|line| line.as_ref().chars().count())
}

/// Derive the line block touched by a character change
///
/// A change ending at column 1 does not touch its end line, and a change
/// starting past the end of its start line does not touch the start line.
pub fn get_line_range_mapping<S: AsRef<str>>(
    mapping: RangeMapping,
    original: &[S],
    modified: &[S],
) -> LineRangeMapping {
    let (orig, modi) = (mapping.original_range, mapping.modified_range);
    let mut line_start_delta: isize = 0;
    let mut line_end_delta: isize = 0;

    if modi.end_column == 1
        && orig.end_column == 1
        && orig.start_line_number <= orig.end_line_number
        && modi.start_line_number <= modi.end_line_number
    {
        line_end_delta = -1;
    }

    let past_line_end = |range: &TextRange, lines: &[S]| {
        line_length(lines, range.start_line_number).is_some_and(|len| range.start_column > len)
    };
    if past_line_end(&modi, modified)
        && past_line_end(&orig, original)
        && (orig.start_line_number as isize) <= orig.end_line_number as isize + line_end_delta
        && (modi.start_line_number as isize) <= modi.end_line_number as isize + line_end_delta
    {
        line_start_delta = 1;
    }

    let lines = |range: &TextRange| {
        let start = range.start_line_number as isize + line_start_delta;
        let end = range.end_line_number as isize + 1 + line_end_delta;
        LineRange::new(start as usize, end.max(start) as usize)
    };

    LineRangeMapping::new(lines(&orig), lines(&modi), Some(vec![mapping]))
}

/// Group line mappings whose ranges overlap or touch on either side
///
/// Inner changes of a group are concatenated. A group containing an unrefined
/// member stays unrefined.
pub fn group_line_range_mappings(mappings: Vec<LineRangeMapping>) -> Vec<LineRangeMapping> {
    let mut result: Vec<LineRangeMapping> = Vec::with_capacity(mappings.len());

    for mapping in mappings {
        match result.last_mut() {
            Some(group)
                if group.original.overlap_or_touch(&mapping.original)
                    || group.modified.overlap_or_touch(&mapping.modified) =>
            {
                group.original = group.original.join(&mapping.original);
                group.modified = group.modified.join(&mapping.modified);
                group.inner_changes = match (group.inner_changes.take(), mapping.inner_changes) {
                    (Some(mut inner), Some(more)) => {
                        inner.extend(more);
                        Some(inner)
                    }
                    _ => None,
                };
            }
            _ => result.push(mapping),
        }
    }

    result
}

/// The outcome of a diff computation
#[derive(Debug, Clone, PartialEq, Eq, Default, new)]
pub struct LinesDiff {
    pub changes: Vec<LineRangeMapping>,
    /// The deadline expired somewhere and part of the result is coarse
    pub hit_timeout: bool,
}

impl LinesDiff {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
