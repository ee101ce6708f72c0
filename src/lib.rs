//! Language parsing tool (lang_glr) is a library to build generalized (GLR style) front-ends
//! for language tooling: linters, refactoring engines and DSL interpreters.
//!
//! # Overview
//! The library accepts a utf-8 source text together with a grammar text and produces a stream
//! of located tokens, one or more parse trees when the grammar is ambiguous, and a scope
//! qualified symbol model suitable for location based queries (find usages, rename,
//! extract/inline variable).
//!
//! # Design
//!
//! Unlike a table driven parser generator, the engine interprets the grammar directly.
//! A grammar is a line oriented text of token rules and production rules which the
//! [GrammarLoader](crate::grammar::GrammarLoader) composes across `Inherits:` bases.
//! The [StreamLexer](crate::lexer::StreamLexer) advances a set of live paths and forks
//! whenever several token rules match at one position; the [GlrParser](crate::parser::GlrParser)
//! does the same with parallel shift/reduce stacks, resolving ties through declared operator
//! precedence and returning every surviving tree. Regex shaped rule patterns are validated by a
//! two phase [PatternScanner](crate::scanner::PatternScanner) which records ambiguous escape
//! prefixes as [splittable](crate::scanner::SplittableToken) tokens before settling them on the
//! longest interpretation.
//!
//! # Example
//!
//! ```
//! use lang_glr::Engine;
//!
//! let grammar_text = r#"Grammar: arithmetic
//! NUMBER ::= /[0-9]+/
//! PLUS ::= '+'
//! WS ::= /[ \t\r\n]+/ {skip}
//! expr ::= <expr> PLUS <expr> | NUMBER
//! "#;
//!
//! let mut engine = Engine::new();
//! engine.load_grammar(grammar_text).unwrap();
//! let result = engine.parse(b"1 + 2 + 3", None);
//! assert!(result.success);
//! let tree = result.tree.as_ref().unwrap();
//! assert_eq!(tree.rule, "expr");
//! let kinds: Vec<&str> = result.tokens.iter().map(|t| t.kind.as_str()).collect();
//! assert_eq!(kinds, vec!["NUMBER", "PLUS", "NUMBER", "PLUS", "NUMBER"]);
//! ```
//!
//! # License
//! [lang_glr](crate) is provided under the MIT license.

mod encoding;
mod engine;
mod error;
pub mod examples;
pub mod grammar;
pub mod lexer;
mod parse_node;
pub mod parser;
pub mod refactor;
pub mod scanner;
pub mod symbol;
pub mod unicode;
pub mod util;

use lexer::StepToken;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

pub use encoding::SourceEncoding;
pub use engine::Engine;
pub use util::{Code, CodeLocation, CodePoints, Log, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The safety bound which terminated a bounded exploration.
pub enum SafetyCap {
    Steps,
    Paths,
    Deadline,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The family an engine error belongs to.
pub enum ParseErrorKind {
    Scan,
    Lex,
    Syntax,
    BoundedExploration(SafetyCap),
    Grammar,
}

#[derive(Debug, Clone)]
/// An error returned when the engine failed to process the input.
///
/// `pointer` locates the failure: a byte offset for scan and lex errors, a token
/// index for syntax errors.
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub pointer: usize,
    pub message: String,
}

#[derive(Clone)]
/// Exploration bounds for a single parse. Every step of every live path checks
/// the step budget, the optional wall clock deadline and the optional external
/// cancellation flag.
pub struct SafetyLimits {
    /// Total step budget. Derived from input length and rule count when absent.
    pub max_steps: Option<usize>,
    /// Cap on simultaneously live parse paths; excess paths are pruned.
    pub max_paths: usize,
    pub deadline: Option<Duration>,
    pub cancelled: Option<Rc<Cell<bool>>>,
}

#[derive(Clone)]
/// A node of a parse tree. Terminal nodes carry their [StepToken]; parents fully
/// enclose the byte span of their ordered children.
pub struct ParseNode {
    pub rule: String,
    pub token: Option<StepToken>,
    pub children: Vec<ParseNode>,
    pub span: (usize, usize),
    pub location: CodeLocation,
    pub value: Option<String>,
}

#[derive(Clone)]
/// Everything a parse produced: the emitted tokens, the best tree, every
/// surviving tree of an ambiguous grammar, collected errors and exploration
/// statistics.
pub struct ParsingResult {
    pub success: bool,
    pub tokens: Vec<StepToken>,
    pub tree: Option<ParseNode>,
    pub ambiguous_parses: Vec<ParseNode>,
    pub errors: Vec<ParseError>,
    pub elapsed: Duration,
    pub path_count: usize,
    pub final_context: String,
}
