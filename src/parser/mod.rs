//! The generalized parser: parallel shift/reduce paths over the token stream.
//!
//! One [ParsePath] owns a stack of partial parse nodes, a position into the
//! token list, a context stack and its own symbol table overlay. At each step
//! the engine collects the applicable actions for a path: shifting the next
//! token, or reducing by any production whose right hand side matches the top
//! of the stack. A single action is taken in place; several actions fork the
//! path. Shift/reduce ties are settled through declared operator precedence and
//! associativity when configured, otherwise both readings survive.
//!
//! Exploration is bounded: a total step budget, a per path no-progress kill, a
//! live path cap, an optional wall clock deadline and an external cancellation
//! flag are all checked on every step of every path. Termination never depends
//! on the grammar being well behaved.

mod engine;
mod path;

#[cfg(test)]
mod __tests__;

pub use engine::{record_tree_references, validate_grammar};
pub use path::tree_fingerprint;

use crate::grammar::GrammarDefinition;
use crate::symbol::{ContextStack, SymbolTable};
use crate::util::Log;
use crate::{ParseError, ParseNode, SafetyLimits};
use once_cell::unsync::OnceCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A host supplied semantic action, registered on the engine by name and fired
/// when a reduction carries a `user` action handle.
pub trait UserAction {
    fn apply(&self, node: &mut ParseNode, context: &mut ContextStack, symbols: &mut SymbolTable);
}

#[derive(Clone)]
/// A live branch of parsing: its own node stack, input position, context stack
/// and symbol table overlay. Forks deep copy all of it under a fresh id.
pub struct ParsePath {
    pub id: usize,
    pub stack: Vec<ParseNode>,
    pub token_index: usize,
    pub context_stack: ContextStack,
    pub symbols: SymbolTable,
    pub cumulative_precedence: i64,
    pub born_step: usize,
    stagnation: usize,
}

/// The generalized parser driving the path set over a loaded grammar.
pub struct GlrParser {
    grammar: Rc<GrammarDefinition>,
    limits: SafetyLimits,
    user_actions: HashMap<String, Rc<dyn UserAction>>,
    debug: OnceCell<Log<&'static str>>,
}

/// Everything a parser run produced, before the engine shapes it into a
/// [ParsingResult](crate::ParsingResult).
pub struct ParseOutcome {
    /// Distinct surviving trees, best first.
    pub trees: Vec<ParseNode>,
    /// The winning path's symbol overlay.
    pub symbols: SymbolTable,
    pub final_context: String,
    pub errors: Vec<ParseError>,
    /// Total paths created over the run.
    pub path_count: usize,
    pub steps: usize,
}

impl ParseOutcome {
    pub fn success(&self) -> bool {
        !self.trees.is_empty()
    }
}
