use crate::artifacts::ranges::offset_range::OffsetRange;
use crate::artifacts::sequence::Sequence;
use std::collections::HashMap;

/// Dense ids for trimmed line texts
///
/// Lives for a single diff computation and is shared by both documents, so two
/// lines get the same id iff their trimmed texts are equal.
#[derive(Debug, Default)]
pub struct LineHashes<'a> {
    ids: HashMap<&'a str, u32>,
}

impl<'a> LineHashes<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id_of(&mut self, line: &'a str) -> u32 {
        let next_id = self.ids.len() as u32;
        *self.ids.entry(line.trim()).or_insert(next_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// A document seen as a sequence of trimmed lines
#[derive(Debug)]
pub struct LineSequence<'a> {
    ids: Vec<u32>,
    lines: &'a [&'a str],
}

impl<'a> LineSequence<'a> {
    pub fn new(lines: &'a [&'a str], hashes: &mut LineHashes<'a>) -> Self {
        let ids = lines.iter().map(|line| hashes.id_of(line)).collect();

        Self { ids, lines }
    }

    pub fn lines(&self) -> &'a [&'a str] {
        self.lines
    }

    pub fn text(&self, range: OffsetRange) -> String {
        range.slice(self.lines).join("\n")
    }
}

impl Sequence for LineSequence<'_> {
    fn len(&self) -> usize {
        self.ids.len()
    }

    fn element(&self, offset: usize) -> u32 {
        self.ids[offset]
    }

    fn boundary_score(&self, length: usize) -> Option<i32> {
        let before = length
            .checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
            .map_or(0, |line| indentation(line));
        let after = self.lines.get(length).map_or(0, |line| indentation(line));

        Some(1000 - (before + after) as i32)
    }

    fn is_strongly_equal(&self, offset1: usize, offset2: usize) -> bool {
        self.lines[offset1] == self.lines[offset2]
    }
}

/// Alignment reward for matching `original[offset1]` with `modified[offset2]`
///
/// Only called for lines whose trimmed texts are equal. Long identical lines are
/// worth more than short ones, and lines that differ in surrounding whitespace are
/// worth slightly less than a plain match.
pub fn line_match_weight(original: &str, modified: &str) -> f64 {
    if original != modified {
        return 0.99;
    }

    match modified.chars().count() {
        0 => 0.1,
        len => 1.0 + (1.0 + len as f64).ln(),
    }
}

fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_trimmed_lines_share_an_id() {
        let original = ["  foo", "bar"];
        let modified = ["foo\t", "baz"];
        let mut hashes = LineHashes::new();

        let seq1 = LineSequence::new(&original, &mut hashes);
        let seq2 = LineSequence::new(&modified, &mut hashes);

        assert_eq!(seq1.element(0), seq2.element(0));
        assert_ne!(seq1.element(1), seq2.element(1));
        assert_eq!(hashes.len(), 3);
    }

    #[test]
    fn test_strong_equality_compares_raw_lines() {
        let lines = ["foo", " foo", "foo"];
        let mut hashes = LineHashes::new();
        let seq = LineSequence::new(&lines, &mut hashes);

        assert_eq!(seq.element(0), seq.element(1));
        assert!(!seq.is_strongly_equal(0, 1));
        assert!(seq.is_strongly_equal(0, 2));
    }

    #[rstest]
    #[case(0, 1000 - 0)]
    #[case(1, 1000 - 4)]
    #[case(2, 1000 - 6)]
    #[case(3, 1000 - 2)]
    fn test_boundary_score_penalizes_indentation(#[case] length: usize, #[case] expected: i32) {
        let lines = ["fn main() {", "    body();", "\t\tnested", "}"];
        let mut hashes = LineHashes::new();
        let seq = LineSequence::new(&lines, &mut hashes);

        assert_eq!(seq.boundary_score(length), Some(expected));
    }

    #[test]
    fn test_boundary_score_past_the_end() {
        let lines = ["  a"];
        let mut hashes = LineHashes::new();
        let seq = LineSequence::new(&lines, &mut hashes);

        assert_eq!(seq.boundary_score(1), Some(998));
    }

    #[test]
    fn test_line_match_weight() {
        assert_eq!(line_match_weight("", ""), 0.1);
        assert_eq!(line_match_weight(" x", "x"), 0.99);
        assert!((line_match_weight("abc", "abc") - (1.0 + 4f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn test_text_joins_lines() {
        let lines = ["a", "b", "c"];
        let mut hashes = LineHashes::new();
        let seq = LineSequence::new(&lines, &mut hashes);

        assert_eq!(seq.text(OffsetRange::new(1, 3)), "b\nc");
    }
}
