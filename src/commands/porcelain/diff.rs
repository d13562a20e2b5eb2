use crate::areas::computer::is_blank;
use crate::areas::session::Session;
use crate::artifacts::mapping::{LineRangeMapping, LinesDiff};
use crate::artifacts::options::DiffOptions;
use crate::artifacts::ranges::line_range::LineRange;
use colored::{ColoredString, Colorize};
use std::path::Path;

/// Unchanged lines shown around every change
const CONTEXT_LINES: usize = 3;

/// A run of changes close enough to be shown with shared context
#[derive(Debug, PartialEq, Eq)]
struct Hunk<'c> {
    original: LineRange,
    modified: LineRange,
    changes: &'c [LineRangeMapping],
}

impl Session {
    pub fn diff(
        &self,
        original: &Path,
        modified: &Path,
        options: &DiffOptions,
    ) -> anyhow::Result<()> {
        let a = self.workspace().read_document(original)?;
        let b = self.workspace().read_document(modified)?;
        let (a_lines, b_lines) = (a.lines(), b.lines());

        let diff = self.computer().compute_diff(&a_lines, &b_lines, options);
        if diff.is_empty() {
            return Ok(());
        }

        self.print_diff_header(a.path(), b.path(), &diff)?;
        for hunk in hunks(&diff.changes, line_count(&a_lines)) {
            self.print_diff_hunk(&hunk, &a_lines, &b_lines)?;
        }

        Ok(())
    }

    fn print_diff_header(&self, a: &Path, b: &Path, diff: &LinesDiff) -> anyhow::Result<()> {
        let (a, b) = (Path::new("a").join(a), Path::new("b").join(b));

        writeln!(
            self.writer(),
            "{}",
            format!("diff {} {}", a.display(), b.display()).bold()
        )?;
        if diff.hit_timeout {
            writeln!(
                self.writer(),
                "{}",
                "note: computation timed out, changes are coarse".yellow()
            )?;
        }
        writeln!(self.writer(), "{}", format!("--- {}", a.display()).bold())?;
        writeln!(self.writer(), "{}", format!("+++ {}", b.display()).bold())?;

        Ok(())
    }

    fn print_diff_hunk(
        &self,
        hunk: &Hunk,
        a_lines: &[&str],
        b_lines: &[&str],
    ) -> anyhow::Result<()> {
        writeln!(
            self.writer(),
            "{}",
            format!(
                "@@ -{} +{} @@",
                unified_range(&hunk.original),
                unified_range(&hunk.modified)
            )
            .cyan()
        )?;

        let mut next_line = hunk.original.start_line_number();
        for change in hunk.changes {
            self.print_context(a_lines, next_line, change.original.start_line_number())?;

            let original_lines = change.original.to_offset_range();
            for line_number in original_lines.start() + 1..=original_lines.end_exclusive() {
                let text = a_lines[line_number - 1];
                let spans = highlighted_spans(change, line_number, text, Side::Original);
                writeln!(
                    self.writer(),
                    "{}",
                    render_line('-', text, &spans, Side::Original)
                )?;
            }
            let modified_lines = change.modified.to_offset_range();
            for line_number in modified_lines.start() + 1..=modified_lines.end_exclusive() {
                let text = b_lines[line_number - 1];
                let spans = highlighted_spans(change, line_number, text, Side::Modified);
                writeln!(
                    self.writer(),
                    "{}",
                    render_line('+', text, &spans, Side::Modified)
                )?;
            }

            next_line = change.original.end_line_number_exclusive();
        }
        self.print_context(a_lines, next_line, hunk.original.end_line_number_exclusive())?;

        Ok(())
    }

    fn print_context(&self, lines: &[&str], from: usize, to: usize) -> anyhow::Result<()> {
        for line in (from..to).filter_map(|line_number| lines.get(line_number - 1)) {
            writeln!(self.writer(), " {}", line)?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Original,
    Modified,
}

fn line_count(lines: &[&str]) -> usize {
    if is_blank(lines) { 0 } else { lines.len() }
}

/// Group changes whose context would overlap
///
/// Unchanged lines before, between and after changes come in equal numbers on
/// both sides, so context is counted on the original side only.
fn hunks(changes: &[LineRangeMapping], original_len: usize) -> Vec<Hunk<'_>> {
    let mut result = Vec::new();
    let mut first = 0;

    while first < changes.len() {
        let mut last = first;
        while last + 1 < changes.len()
            && changes[last + 1].original.start_line_number()
                <= changes[last].original.end_line_number_exclusive() + 2 * CONTEXT_LINES
        {
            last += 1;
        }

        let (head, tail) = (&changes[first], &changes[last]);
        let leading = CONTEXT_LINES.min(head.original.start_line_number() - 1);
        let trailing = CONTEXT_LINES
            .min((original_len + 1).saturating_sub(tail.original.end_line_number_exclusive()));

        result.push(Hunk {
            original: LineRange::new(
                head.original.start_line_number() - leading,
                tail.original.end_line_number_exclusive() + trailing,
            ),
            modified: LineRange::new(
                head.modified.start_line_number() - leading,
                tail.modified.end_line_number_exclusive() + trailing,
            ),
            changes: &changes[first..=last],
        });
        first = last + 1;
    }

    result
}

/// `start,len` the way unified diffs print it: an empty range names the line before it
fn unified_range(range: &LineRange) -> String {
    match range.len() {
        0 => format!("{},0", range.start_line_number() - 1),
        len => format!("{},{}", range.start_line_number(), len),
    }
}

/// 0-based char spans of `line_number` touched by the inner changes of `change`
fn highlighted_spans(
    change: &LineRangeMapping,
    line_number: usize,
    text: &str,
    side: Side,
) -> Vec<(usize, usize)> {
    let line_len = text.chars().count();
    let Some(inner) = &change.inner_changes else {
        return Vec::new();
    };

    inner
        .iter()
        .map(|mapping| match side {
            Side::Original => mapping.original_range,
            Side::Modified => mapping.modified_range,
        })
        .filter(|range| {
            range.start_line_number <= line_number && line_number <= range.end_line_number
        })
        .map(|range| {
            let start = if range.start_line_number == line_number {
                range.start_column - 1
            } else {
                0
            };
            let end = if range.end_line_number == line_number {
                range.end_column - 1
            } else {
                line_len
            };
            (start.min(line_len), end.min(line_len))
        })
        .filter(|(start, end)| start < end)
        .collect()
}

fn render_line(marker: char, text: &str, spans: &[(usize, usize)], side: Side) -> String {
    let paint = |segment: &str, highlighted: bool| -> ColoredString {
        let colored = match side {
            Side::Original => segment.red(),
            Side::Modified => segment.green(),
        };
        if highlighted { colored.reversed() } else { colored }
    };

    let chars: Vec<char> = text.chars().collect();
    let segment = |from: usize, to: usize| chars[from..to].iter().collect::<String>();
    let mut rendered = paint(&marker.to_string(), false).to_string();
    let mut cursor = 0;
    for &(start, end) in spans {
        if start < cursor {
            continue;
        }
        rendered.push_str(&paint(&segment(cursor, start), false).to_string());
        rendered.push_str(&paint(&segment(start, end), true).to_string());
        cursor = end;
    }
    rendered.push_str(&paint(&segment(cursor, chars.len()), false).to_string());

    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::mapping::RangeMapping;
    use crate::artifacts::ranges::position::TextRange;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn change(orig: (usize, usize), modi: (usize, usize)) -> LineRangeMapping {
        LineRangeMapping::new(
            LineRange::new(orig.0, orig.1),
            LineRange::new(modi.0, modi.1),
            None,
        )
    }

    #[test]
    fn test_close_changes_share_a_hunk() {
        let changes = vec![change((5, 6), (5, 6)), change((10, 11), (10, 12))];

        let hunks = hunks(&changes, 30);

        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].original, LineRange::new(2, 14));
        assert_eq!(hunks[0].modified, LineRange::new(2, 15));
    }

    #[test]
    fn test_distant_changes_get_own_hunks() {
        let changes = vec![change((2, 3), (2, 3)), change((20, 21), (20, 20))];

        let hunks = hunks(&changes, 21);

        assert_eq!(hunks.len(), 2);
        assert_eq!(hunks[0].original, LineRange::new(1, 6));
        assert_eq!(hunks[1].original, LineRange::new(17, 22));
        assert_eq!(hunks[1].modified, LineRange::new(17, 21));
    }

    #[rstest]
    #[case(LineRange::new(3, 5), "3,2")]
    #[case(LineRange::new(4, 4), "3,0")]
    #[case(LineRange::new(1, 1), "0,0")]
    fn test_unified_range(#[case] range: LineRange, #[case] expected: &str) {
        assert_eq!(unified_range(&range), expected);
    }

    #[test]
    fn test_highlighted_spans_follow_inner_changes() {
        let mut mapping = change((1, 2), (1, 2));
        mapping.inner_changes = Some(vec![RangeMapping::new(
            TextRange::new(1, 6, 1, 6),
            TextRange::new(1, 6, 1, 12),
        )]);

        assert_eq!(
            highlighted_spans(&mapping, 1, "hello world", Side::Original),
            Vec::<(usize, usize)>::new()
        );
        assert_eq!(
            highlighted_spans(&mapping, 1, "hello brave world", Side::Modified),
            vec![(5, 11)]
        );
    }

    #[test]
    fn test_render_line_without_colors() {
        colored::control::set_override(false);

        let rendered = render_line('+', "hello brave world", &[(5, 11)], Side::Modified);

        assert_eq!(rendered, "+hello brave world");
    }
}
