use super::ParsePath;
use crate::grammar::{GrammarDefinition, ProductionRule, RhsSymbol};
use crate::symbol::{ContextStack, SymbolTable};
use crate::ParseNode;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

impl ParsePath {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            stack: Vec::new(),
            token_index: 0,
            context_stack: ContextStack::new(),
            symbols: SymbolTable::new(),
            cumulative_precedence: 0,
            born_step: 0,
            stagnation: 0,
        }
    }

    pub fn fork(&self, fresh_id: usize, born_step: usize) -> Self {
        let mut forked = self.clone();
        forked.id = fresh_id;
        forked.born_step = born_step;
        forked
    }

    pub fn stagnation(&self) -> usize {
        self.stagnation
    }

    /// A unit reduction over a nonterminal consumes nothing and keeps the stack
    /// depth; runs of them are the no-progress signature of cyclic productions.
    pub fn note_reduction(&mut self, consumed: usize, was_nonterminal_unit: bool) {
        if consumed == 1 && was_nonterminal_unit {
            self.stagnation += 1;
        } else {
            self.stagnation = 0;
        }
    }

    pub fn note_shift(&mut self) {
        self.stagnation = 0;
    }

    /// Whether the top of the stack matches a production's right hand side.
    pub fn stack_matches(&self, rhs: &[RhsSymbol]) -> bool {
        if rhs.len() > self.stack.len() {
            return false;
        }
        let top = &self.stack[self.stack.len() - rhs.len()..];
        rhs.iter()
            .zip(top.iter())
            .all(|(symbol, node)| symbol_matches(symbol, node))
    }

    /// Productions which partially match the stack top: some suffix of the stack
    /// equals a proper prefix of the right hand side. These are the rules that
    /// were still viable when a path died.
    pub fn viable_productions(&self, grammar: &GrammarDefinition) -> Vec<String> {
        let mut viable = Vec::new();
        for production in &grammar.productions {
            if self.has_viable_prefix(production) && !viable.contains(&production.name) {
                viable.push(production.name.clone());
            }
        }
        viable
    }

    fn has_viable_prefix(&self, production: &ProductionRule) -> bool {
        for prefix_len in (1..production.rhs.len()).rev() {
            if prefix_len > self.stack.len() {
                continue;
            }
            let top = &self.stack[self.stack.len() - prefix_len..];
            if production.rhs[..prefix_len]
                .iter()
                .zip(top.iter())
                .all(|(symbol, node)| symbol_matches(symbol, node))
            {
                return true;
            }
        }
        false
    }

    /// The merge key collapsing equivalent paths: same input position, same
    /// context and structurally identical stacks.
    pub fn merge_key(&self) -> (usize, String, u64) {
        let mut hasher = DefaultHasher::new();
        for node in &self.stack {
            fingerprint_into(node, &mut hasher);
        }
        (
            self.token_index,
            self.context_stack.path(),
            hasher.finish(),
        )
    }
}

/// Grammar symbols resolve by name against either side: a bare terminal may
/// reference a token kind or another production.
pub fn symbol_matches(symbol: &RhsSymbol, node: &ParseNode) -> bool {
    match symbol {
        RhsSymbol::NonTerminal(name) => node.rule == *name,
        RhsSymbol::Terminal(name) => node.rule == *name,
        RhsSymbol::Literal(text) => node
            .token
            .as_ref()
            .map_or(false, |token| token.value == *text),
    }
}

/// Structural fingerprint of a tree: rule names, spans and child shape.
pub fn tree_fingerprint(node: &ParseNode) -> u64 {
    let mut hasher = DefaultHasher::new();
    fingerprint_into(node, &mut hasher);
    hasher.finish()
}

fn fingerprint_into(node: &ParseNode, hasher: &mut DefaultHasher) {
    node.rule.hash(hasher);
    node.span.hash(hasher);
    node.children.len().hash(hasher);
    for child in &node.children {
        fingerprint_into(child, hasher);
    }
}
