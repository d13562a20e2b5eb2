//! Document coordinates
//!
//! Both line numbers and columns are 1-based. Columns count Unicode scalar values.

use derive_new::new;
use std::fmt;

/// A caret position inside a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, new)]
pub struct Position {
    pub line_number: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.line_number, self.column)
    }
}

/// A span of text between two positions, end exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, new)]
pub struct TextRange {
    pub start_line_number: usize,
    pub start_column: usize,
    pub end_line_number: usize,
    pub end_column: usize,
}

impl TextRange {
    /// Build a range from two positions in any order
    pub fn from_positions(a: Position, b: Position) -> Self {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };

        Self {
            start_line_number: start.line_number,
            start_column: start.column,
            end_line_number: end.line_number,
            end_column: end.column,
        }
    }

    /// Validate positional fields coming from outside
    pub fn try_new(
        start_line_number: usize,
        start_column: usize,
        end_line_number: usize,
        end_column: usize,
    ) -> anyhow::Result<Self> {
        if start_line_number == 0 || start_column == 0 || end_line_number == 0 || end_column == 0 {
            anyhow::bail!("text range coordinates are 1-based");
        }

        let range = Self::new(start_line_number, start_column, end_line_number, end_column);
        if range.end() < range.start() {
            anyhow::bail!("text range ends at {} before it starts at {}", range.end(), range.start());
        }

        Ok(range)
    }

    pub fn start(&self) -> Position {
        Position::new(self.start_line_number, self.start_column)
    }

    pub fn end(&self) -> Position {
        Position::new(self.end_line_number, self.end_column)
    }

    pub fn is_empty(&self) -> bool {
        self.start() == self.end()
    }

    /// Flatten into `[startLine, startCol, endLine, endCol]`
    pub fn to_array(&self) -> [usize; 4] {
        [
            self.start_line_number,
            self.start_column,
            self.end_line_number,
            self.end_column,
        ]
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{} -> {},{}]",
            self.start_line_number, self.start_column, self.end_line_number, self.end_column
        )
    }
}
