//! Grammar loading and composition.
//!
//! A grammar is a line oriented text: directives (`Grammar:`, `Inherits:`, ...),
//! token rules (`NUMBER ::= /[0-9]+/`), production rules
//! (`expr ::= <expr> PLUS <expr> | NUMBER`), a `Precedence:` block and context
//! projections. The [GrammarLoader] parses the text into a [GrammarDefinition],
//! resolves `Inherits:` against built-in bases or previously loaded files and
//! merges base rules under derived overrides. Malformed lines never abort the
//! load; they are collected as [GrammarDiagnostic]s next to the partial grammar.

mod definition;
mod inherit;
mod loader;

#[cfg(test)]
mod __tests__;

use crate::lexer::TokenRule;
use crate::scanner::PatternScanner;
use crate::util::Log;
use once_cell::unsync::OnceCell;
use regex::Regex;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Built-in semantic action vocabulary attached to token and production rules.
///
/// Anything outside the built-in set is kept as a [User](RuleAction::User)
/// handle and resolved against the actions the host registered on the engine.
pub enum RuleAction {
    Skip,
    Rename(String),
    EmitSymbol { symbol_type: String },
    PushContext(String),
    PopContext,
    User(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Operator associativity, set through the `Precedence:` block.
pub enum Associativity {
    Left,
    Right,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One symbol of a production right hand side.
pub enum RhsSymbol {
    /// `<name>`: reference to another production.
    NonTerminal(String),
    /// Bare name: reference to a token rule by kind.
    Terminal(String),
    /// `"text"` / `'text'`: token matched by literal value.
    Literal(String),
}

#[derive(Debug, Clone)]
/// A single production alternative: `|` separated alternatives in the grammar
/// text expand to one [ProductionRule] each, sharing a name.
pub struct ProductionRule {
    pub name: String,
    pub rhs: Vec<RhsSymbol>,
    pub context: Option<String>,
    pub priority: i32,
    pub action: Option<RuleAction>,
}

#[derive(Debug, Clone)]
/// A `@context(CTX) @projection(PAT) RULE => { CODE }` line. The embedded code
/// is never interpreted here; it becomes a user action handle.
pub struct ContextProjection {
    pub context: String,
    pub projection: String,
    pub rule: String,
    pub action: RuleAction,
}

#[derive(Debug, Clone)]
/// A non fatal problem found while loading a grammar, located by line number.
pub struct GrammarDiagnostic {
    pub line: usize,
    pub message: String,
}

/// A loaded grammar: token rules, productions and their composition metadata.
pub struct GrammarDefinition {
    pub name: String,
    pub token_splitter: Option<String>,
    pub token_rules: Vec<Rc<TokenRule>>,
    pub productions: Vec<Rc<ProductionRule>>,
    pub precedence: HashMap<String, i32>,
    pub associativity: HashMap<String, Associativity>,
    pub contexts: Vec<String>,
    pub imports: Vec<String>,
    pub inheritable: bool,
    pub format_type: Option<String>,
    pub projections: Vec<ContextProjection>,
    pub extra_directives: Vec<String>,
    pub diagnostics: Vec<GrammarDiagnostic>,
}

/// Parses grammar text and resolves inheritance. Loaded files are cached by
/// path so repeated imports are free.
pub struct GrammarLoader {
    scanner: Rc<PatternScanner>,
    cache: RefCell<HashMap<String, Rc<GrammarDefinition>>>,
    loading: RefCell<HashSet<String>>,
    debug: OnceCell<Log<&'static str>>,
    lhs_shape: Regex,
    level_shape: Regex,
    projection_shape: Regex,
}
