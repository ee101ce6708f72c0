//! A rule driven, multi path tokenizer over source bytes.
//!
//! The [StreamLexer] advances a set of live [LexerPath]s through the input. At
//! each step every rule applicable in the path's current context is probed at the
//! path's byte position; a single match consumes, several matches fork the path
//! (one clone per match, each with a fresh id). Paths which reach a position where
//! no rule matches become invalid and are discarded after the step. Paths that
//! agree on `(position, context, token kind sequence)` are merged to cap fan out.
//!
//! Rules carry literal (`"..."` / `'...'`) or regex shaped (`/.../`) patterns;
//! regex patterns are validated by the two phase [PatternScanner](crate::scanner::PatternScanner)
//! and executed through their compiled anchored form.

mod path;
mod rule;
mod stream;

#[cfg(test)]
mod __tests__;

use crate::grammar::RuleAction;
use crate::symbol::ContextStack;
use crate::util::{CodeLocation, Log};
use once_cell::unsync::OnceCell;
use regex::bytes::Regex;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone)]
/// A located token emitted by the stream lexer.
///
/// The literal `value` is the only place the engine copies source text; every
/// other structure holds positions into the caller's buffer.
pub struct StepToken {
    pub kind: String,
    pub value: String,
    pub location: CodeLocation,
    pub context: String,
    pub is_splittable: bool,
    pub split_tokens: Vec<StepToken>,
}

/// The matching form of a token rule pattern.
pub enum RulePattern {
    /// `"..."` or `'...'`: plain byte comparison.
    Literal(Vec<u8>),
    /// `/.../`: scanner validated regex, held in compiled anchored form.
    Regex { source: String, regexp: Regex },
}

/// A tokenization rule: named pattern plus matching constraints.
///
/// An empty context filter applies everywhere; otherwise the rule only matches
/// when the filter equals the path's current context or sits anywhere in the
/// path's context stack. Higher priority rules are probed first. Skip rules
/// consume bytes without emitting a token.
pub struct TokenRule {
    pub name: String,
    pub pattern: RulePattern,
    pub context: Option<String>,
    pub priority: i32,
    pub skip: bool,
    pub action: Option<RuleAction>,
}

#[derive(Debug, Clone)]
/// A live branch of tokenization: its own position, accumulated tokens, context
/// stack and state map. Forks deep copy everything but receive a fresh id.
pub struct LexerPath {
    pub id: usize,
    pub position: usize,
    pub tokens: Vec<StepToken>,
    pub context_stack: ContextStack,
    pub valid: bool,
    pub state: HashMap<String, String>,
}

/// Rule driven tokenizer maintaining the live path set.
pub struct StreamLexer {
    rules: Vec<Rc<TokenRule>>,
    debug: OnceCell<Log<&'static str>>,
}
