//! Character view over a slice of document lines
//!
//! The char pass refines a changed line block by aligning its characters. This
//! sequence flattens the covered lines into one run of chars (lines joined by
//! `\n`) and remembers enough about every line to translate offsets back into
//! document positions.
//!
//! When whitespace changes are ignored, every line is trimmed at both ends and
//! the number of trimmed leading chars is recorded, so translated columns still
//! point into the untrimmed line.

use crate::artifacts::ranges::offset_range::OffsetRange;
use crate::artifacts::ranges::position::{Position, TextRange};
use crate::artifacts::sequence::Sequence;

/// Which side of a line break an offset sitting exactly at a line start maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    WordLower,
    WordUpper,
    WordNumber,
    End,
    Other,
    Separator,
    Space,
    LineBreakCr,
    LineBreakLf,
}

impl CharClass {
    fn of(c: Option<char>) -> Self {
        match c {
            None => CharClass::End,
            Some('\n') => CharClass::LineBreakLf,
            Some('\r') => CharClass::LineBreakCr,
            Some(' ' | '\t') => CharClass::Space,
            Some(',' | ';') => CharClass::Separator,
            Some(c) if c.is_ascii_lowercase() => CharClass::WordLower,
            Some(c) if c.is_ascii_uppercase() => CharClass::WordUpper,
            Some(c) if c.is_ascii_digit() => CharClass::WordNumber,
            Some(_) => CharClass::Other,
        }
    }

    fn score(self) -> i32 {
        match self {
            CharClass::WordLower | CharClass::WordUpper | CharClass::WordNumber => 0,
            CharClass::End => 10,
            CharClass::Other => 2,
            CharClass::Separator => 30,
            CharClass::Space => 3,
            CharClass::LineBreakCr | CharClass::LineBreakLf => 10,
        }
    }
}

#[derive(Debug)]
pub struct CharSequence {
    elements: Vec<char>,
    /// Offset in `elements` where each covered line starts
    first_element_offset_by_line_idx: Vec<usize>,
    /// Chars skipped at the start of each line because the range starts mid-line
    line_start_offsets: Vec<usize>,
    /// Leading whitespace trimmed from each line
    trimmed_ws_lengths_by_line_idx: Vec<usize>,
    start_line_number: usize,
}

impl CharSequence {
    pub fn new<S: AsRef<str>>(lines: &[S], range: TextRange, consider_whitespace_changes: bool) -> Self {
        let mut elements = Vec::new();
        let mut first_element_offset_by_line_idx = vec![0];
        let mut line_start_offsets = Vec::new();
        let mut trimmed_ws_lengths_by_line_idx = Vec::new();

        for line_number in range.start_line_number..=range.end_line_number {
            let full_line = lines
                .get(line_number - 1)
                .map_or("", |line| line.as_ref());

            let line_start_offset = if line_number == range.start_line_number {
                range.start_column.saturating_sub(1)
            } else {
                0
            };
            let mut line: Vec<char> = full_line.chars().skip(line_start_offset).collect();
            line_start_offsets.push(line_start_offset);

            let mut trimmed_ws_length = 0;
            if !consider_whitespace_changes {
                trimmed_ws_length = line.iter().take_while(|c| c.is_whitespace()).count();
                let trailing = line[trimmed_ws_length..]
                    .iter()
                    .rev()
                    .take_while(|c| c.is_whitespace())
                    .count();
                line.truncate(line.len() - trailing);
                line.drain(..trimmed_ws_length);
            }
            trimmed_ws_lengths_by_line_idx.push(trimmed_ws_length);

            let line_length = if line_number == range.end_line_number {
                range
                    .end_column
                    .saturating_sub(1 + line_start_offset + trimmed_ws_length)
                    .min(line.len())
            } else {
                line.len()
            };
            elements.extend_from_slice(&line[..line_length]);

            if line_number < range.end_line_number {
                elements.push('\n');
                first_element_offset_by_line_idx.push(elements.len());
            }
        }

        Self {
            elements,
            first_element_offset_by_line_idx,
            line_start_offsets,
            trimmed_ws_lengths_by_line_idx,
            start_line_number: range.start_line_number,
        }
    }

    pub fn text(&self, range: OffsetRange) -> String {
        range.slice(&self.elements).iter().collect()
    }

    /// Map an element offset back to a document position
    pub fn translate_offset(&self, offset: usize, bias: Bias) -> Position {
        let idx = self.line_idx_of(offset);
        let line_offset = offset - self.first_element_offset_by_line_idx[idx];
        let trimmed = if line_offset == 0 && bias == Bias::Left {
            0
        } else {
            self.trimmed_ws_lengths_by_line_idx[idx]
        };

        Position::new(
            self.start_line_number + idx,
            1 + self.line_start_offsets[idx] + line_offset + trimmed,
        )
    }

    pub fn translate_range(&self, range: OffsetRange) -> TextRange {
        let start = self.translate_offset(range.start(), Bias::Right);
        let end = self.translate_offset(range.end_exclusive(), Bias::Left);

        if end < start {
            TextRange::from_positions(end, end)
        } else {
            TextRange::from_positions(start, end)
        }
    }

    /// The run of ASCII alphanumerics around `offset`, if `offset` sits in one
    pub fn find_word_containing(&self, offset: usize) -> Option<OffsetRange> {
        if !self.elements.get(offset).is_some_and(|c| is_word_char(*c)) {
            return None;
        }

        let mut start = offset;
        while start > 0 && is_word_char(self.elements[start - 1]) {
            start -= 1;
        }
        let mut end = offset;
        while end < self.elements.len() && is_word_char(self.elements[end]) {
            end += 1;
        }

        Some(OffsetRange::new(start, end))
    }

    pub fn count_lines_in(&self, range: OffsetRange) -> usize {
        self.translate_offset(range.end_exclusive(), Bias::Right).line_number
            - self.translate_offset(range.start(), Bias::Right).line_number
    }

    /// Grow `range` to start and end on line starts
    pub fn extend_to_full_lines(&self, range: OffsetRange) -> OffsetRange {
        let starts = &self.first_element_offset_by_line_idx;
        let start = starts
            .iter()
            .rev()
            .find(|offset| **offset <= range.start())
            .copied()
            .unwrap_or(0);
        let end = starts
            .iter()
            .find(|offset| range.end_exclusive() <= **offset)
            .copied()
            .unwrap_or(self.elements.len());

        OffsetRange::new(start, end)
    }

    fn line_idx_of(&self, offset: usize) -> usize {
        self.first_element_offset_by_line_idx
            .partition_point(|start| *start <= offset)
            .saturating_sub(1)
    }
}

impl Sequence for CharSequence {
    fn len(&self) -> usize {
        self.elements.len()
    }

    fn element(&self, offset: usize) -> u32 {
        self.elements[offset] as u32
    }

    fn boundary_score(&self, length: usize) -> Option<i32> {
        let prev = CharClass::of(length.checked_sub(1).map(|idx| self.elements[idx]));
        let next = CharClass::of(self.elements.get(length).copied());

        if prev == CharClass::LineBreakCr && next == CharClass::LineBreakLf {
            return Some(0);
        }
        if prev == CharClass::LineBreakLf {
            return Some(150);
        }

        let mut score = 0;
        if prev != next {
            score += 10;
            if prev == CharClass::WordLower && next == CharClass::WordUpper {
                score += 1;
            }
        }

        Some(score + prev.score() + next.score())
    }

    fn is_strongly_equal(&self, offset1: usize, offset2: usize) -> bool {
        self.elements[offset1] == self.elements[offset2]
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn whole(lines: &[&str]) -> TextRange {
        let last = lines.last().map_or(0, |line| line.chars().count());
        TextRange::new(1, 1, lines.len(), last + 1)
    }

    #[test]
    fn test_lines_are_joined_by_newline() {
        let lines = ["ab", "cd"];
        let seq = CharSequence::new(&lines, whole(&lines), true);

        assert_eq!(seq.text(OffsetRange::of_length(seq.len())), "ab\ncd");
    }

    #[test]
    fn test_ignoring_whitespace_trims_every_line() {
        let lines = ["  ab ", "\tcd"];
        let seq = CharSequence::new(&lines, whole(&lines), false);

        assert_eq!(seq.text(OffsetRange::of_length(seq.len())), "ab\ncd");
        assert_eq!(seq.translate_offset(0, Bias::Right), Position::new(1, 3));
        assert_eq!(seq.translate_offset(0, Bias::Left), Position::new(1, 1));
        assert_eq!(seq.translate_offset(4, Bias::Right), Position::new(2, 3));
    }

    #[test]
    fn test_range_starting_mid_line() {
        let lines = ["hello world"];
        let seq = CharSequence::new(&lines, TextRange::new(1, 7, 1, 12), true);

        assert_eq!(seq.text(OffsetRange::of_length(seq.len())), "world");
        assert_eq!(seq.translate_offset(0, Bias::Right), Position::new(1, 7));
        assert_eq!(seq.translate_offset(5, Bias::Left), Position::new(1, 12));
    }

    #[test]
    fn test_translate_range_never_inverts() {
        let lines = ["  a", "  b"];
        let seq = CharSequence::new(&lines, whole(&lines), false);

        // The empty range at the start of line 2 maps right to col 3 and left to col 1
        let range = seq.translate_range(OffsetRange::empty_at(2));
        assert_eq!(range, TextRange::new(2, 1, 2, 1));
    }

    #[test]
    fn test_find_word_containing() {
        let lines = ["foo bar_baz"];
        let seq = CharSequence::new(&lines, whole(&lines), true);

        assert_eq!(seq.find_word_containing(1), Some(OffsetRange::new(0, 3)));
        assert_eq!(seq.find_word_containing(3), None);
        assert_eq!(seq.find_word_containing(5), Some(OffsetRange::new(4, 7)));
        assert_eq!(seq.find_word_containing(99), None);
    }

    #[test]
    fn test_extend_to_full_lines_and_count() {
        let lines = ["abc", "def", "ghi"];
        let seq = CharSequence::new(&lines, whole(&lines), true);

        assert_eq!(
            seq.extend_to_full_lines(OffsetRange::new(5, 6)),
            OffsetRange::new(4, 8)
        );
        assert_eq!(
            seq.extend_to_full_lines(OffsetRange::new(9, 10)),
            OffsetRange::new(8, 11)
        );
        assert_eq!(seq.count_lines_in(OffsetRange::new(1, 9)), 2);
    }

    #[rstest]
    #[case("ab", 1, 0)]
    #[case("a b", 1, 10 + 3)]
    #[case("aB", 1, 11)]
    #[case("a,b", 1, 10 + 30)]
    #[case("a\nb", 2, 150)]
    #[case("\r\n", 1, 0)]
    #[case("ab", 0, 10 + 10)]
    #[case("a.", 1, 10 + 2)]
    fn test_boundary_scores(#[case] text: &str, #[case] length: usize, #[case] expected: i32) {
        let lines: Vec<&str> = text.split('\n').collect();
        let seq = CharSequence::new(&lines, whole(&lines), true);

        assert_eq!(seq.boundary_score(length), Some(expected));
    }
}
