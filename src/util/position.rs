use super::Position;
use std::fmt::{Display, Formatter};

impl Position {
    /// Pair a 1-based line with a 1-based column.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Renders as `line:column`, the form locations embed (`file:1:5..1:6`).
impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
