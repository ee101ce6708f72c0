use crate::{ParseError, ParseErrorKind, SafetyCap};
use std::fmt::{Display, Formatter};

impl ParseError {
    pub fn new(kind: ParseErrorKind, pointer: usize, message: String) -> Self {
        Self {
            kind,
            pointer,
            message,
        }
    }

    pub fn scan(pointer: usize, message: String) -> Self {
        Self::new(ParseErrorKind::Scan, pointer, message)
    }

    pub fn syntax(token_index: usize, message: String) -> Self {
        Self::new(ParseErrorKind::Syntax, token_index, message)
    }

    pub fn grammar(message: String) -> Self {
        Self::new(ParseErrorKind::Grammar, 0, message)
    }

    pub fn bounded(cap: SafetyCap, pointer: usize) -> Self {
        let message = match cap {
            SafetyCap::Steps => "Exploration exceeded the step budget.",
            SafetyCap::Paths => "Exploration exceeded the live path cap.",
            SafetyCap::Deadline => "Exploration exceeded the wall clock deadline.",
            SafetyCap::Cancelled => "Exploration was cancelled.",
        };
        Self::new(
            ParseErrorKind::BoundedExploration(cap),
            pointer,
            message.to_string(),
        )
    }

    pub fn is_bounded_exploration(&self) -> bool {
        matches!(self.kind, ParseErrorKind::BoundedExploration(_))
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self.kind {
            ParseErrorKind::Scan => "ScanError",
            ParseErrorKind::Lex => "LexError",
            ParseErrorKind::Syntax => "SyntaxError",
            ParseErrorKind::BoundedExploration(_) => "BoundedExplorationError",
            ParseErrorKind::Grammar => "GrammarError",
        };
        write!(f, "{}: {}", label, self.message)
    }
}
