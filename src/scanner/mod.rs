//! A two phase scanner for regex shaped token rule patterns.
//!
//! The first phase walks the pattern bytes and emits one [SplittableToken] per
//! lexical step. A prefix which admits several interpretations (the `\x` escape
//! can open either a two digit hex escape or a braced unicode escape) is recorded
//! as a single token carrying every alternative. The second phase settles each
//! ambiguous token on its longest alternative and validates semantic constraints
//! such as `\p{...}` property names against the [UnicodeOracle].
//!
//! After both phases succeed a pattern can be [compiled](PatternScanner::compile)
//! into an anchored [regex::bytes::Regex] for rule matching. `\Q...\E` literal
//! text and block valued `\p{...}` properties are rewritten during compilation
//! since the regex dialect has no syntax for them.

mod compile;
mod first_phase;
mod second_phase;

#[cfg(test)]
mod __tests__;

use crate::unicode::UnicodeOracle;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Lexical classification of a pattern token produced by the scanner's first phase.
pub enum PatternTokenKind {
    Literal,
    LiteralText,
    EscapeSequence,
    HexEscape,
    UnicodeEscape,
    UnicodeProperty,
    CharacterClass,
    RegexComment,
    InlineModifier,
    SpecialGroup,
    GroupStart,
    GroupEnd,
    Quantifier,
    LazyQuantifier,
    Alternation,
    StartAnchor,
    EndAnchor,
    AnyChar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One interpretation of an ambiguous pattern prefix. Alternatives share the
/// token's starting offset but may differ in kind and length.
pub struct SplitAlternative {
    pub kind: PatternTokenKind,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A pattern token which may carry several equally plausible interpretations.
///
/// When `alternatives` is non-empty the token is ambiguous and the primary
/// `kind`/`end` mirror the first recorded alternative. Alternatives never nest.
pub struct SplittableToken {
    pub kind: PatternTokenKind,
    pub start: usize,
    pub end: usize,
    pub alternatives: Vec<SplitAlternative>,
    pub valid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A token settled by the second phase: one kind, one span.
pub struct ResolvedToken {
    pub kind: PatternTokenKind,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone)]
/// An error raised while scanning or validating a pattern, located by byte offset.
pub struct ScanError {
    pub pointer: usize,
    pub message: String,
}

/// Scanner over a pattern byte view. Holds the property oracle consulted by the
/// second phase.
pub struct PatternScanner {
    oracle: Rc<UnicodeOracle>,
}

impl SplittableToken {
    pub fn new(kind: PatternTokenKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            start,
            end,
            alternatives: Vec::with_capacity(0),
            valid: true,
        }
    }

    pub fn invalid(kind: PatternTokenKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            start,
            end,
            alternatives: Vec::with_capacity(0),
            valid: false,
        }
    }

    pub fn ambiguous(start: usize, alternatives: Vec<SplitAlternative>) -> Self {
        debug_assert!(!alternatives.is_empty());
        Self {
            kind: alternatives[0].kind,
            start,
            end: alternatives[0].end,
            alternatives,
            valid: true,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        !self.alternatives.is_empty()
    }
}

impl ScanError {
    pub fn new(pointer: usize, message: String) -> Self {
        Self { pointer, message }
    }
}

impl Display for ScanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ScanError at {}: {}", self.pointer, self.message)
    }
}

impl PatternScanner {
    pub fn new(oracle: Rc<UnicodeOracle>) -> Self {
        Self { oracle }
    }

    pub fn oracle(&self) -> &UnicodeOracle {
        &self.oracle
    }
}
