use super::{Code, CodeLocation, Position};
use std::fmt::{Display, Formatter};
use std::rc::Rc;

impl CodeLocation {
    pub fn new(
        file: Rc<str>,
        start: Position,
        end: Position,
        span: (usize, usize),
        context: String,
    ) -> Self {
        Self {
            file,
            start,
            end,
            span,
            context,
        }
    }

    /// Locate a byte range of the given [Code] window.
    pub fn from_span(
        code: &Code,
        file: &Rc<str>,
        start: usize,
        end: usize,
        context: &str,
    ) -> Self {
        Self {
            file: file.clone(),
            start: code.obtain_position(start),
            end: code.obtain_position(end),
            span: (start, end),
            context: context.to_string(),
        }
    }

    pub fn len_bytes(&self) -> usize {
        self.span.1 - self.span.0
    }

    /// Whether a 1-based point falls inside this location. Start is inclusive, end exclusive.
    pub fn contains_point(&self, line: usize, column: usize) -> bool {
        if line < self.start.line || line > self.end.line {
            return false;
        }
        if line == self.start.line && column < self.start.column {
            return false;
        }
        if line == self.end.line && column >= self.end.column {
            return false;
        }
        true
    }

    /// Whether another location is fully enclosed by this one, comparing byte spans.
    pub fn encloses(&self, other: &CodeLocation) -> bool {
        self.span.0 <= other.span.0 && other.span.1 <= self.span.1
    }
}

impl Display for CodeLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}..{}", self.file, self.start, self.end)
    }
}
