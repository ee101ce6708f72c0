use super::path::tree_fingerprint;
use super::{GlrParser, ParseOutcome, ParsePath, UserAction};
use crate::grammar::{GrammarDefinition, ProductionRule, RuleAction};
use crate::lexer::StepToken;
use crate::symbol::SymbolInfo;
use crate::util::{CodeLocation, Log};
use crate::{ParseError, ParseNode, SafetyCap, SafetyLimits};
use once_cell::unsync::OnceCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::Instant;

#[derive(Clone)]
enum StepAction {
    Shift,
    Reduce(Rc<ProductionRule>),
}

impl GlrParser {
    pub fn new(grammar: Rc<GrammarDefinition>, limits: SafetyLimits) -> Self {
        Self {
            grammar,
            limits,
            user_actions: HashMap::new(),
            debug: OnceCell::new(),
        }
    }

    pub fn register_action(&mut self, name: &str, action: Rc<dyn UserAction>) {
        self.user_actions.insert(name.to_string(), action);
    }

    pub fn set_log(&self, log_label: Log<&'static str>) -> Result<(), String> {
        self.debug
            .set(log_label)
            .map_err(|err| format!("Log label {} is already assigned.", err))
    }

    pub fn grammar(&self) -> &Rc<GrammarDefinition> {
        &self.grammar
    }

    /// Parse a token list into every surviving tree.
    pub fn parse(&self, tokens: &[StepToken]) -> ParseOutcome {
        let mut outcome = ParseOutcome {
            trees: Vec::new(),
            symbols: Default::default(),
            final_context: "global".to_string(),
            errors: Vec::new(),
            path_count: 1,
            steps: 0,
        };
        let start_symbol = match self.grammar.start_symbol() {
            Some(symbol) => symbol.to_string(),
            None => {
                outcome
                    .errors
                    .push(ParseError::grammar("Grammar has no productions.".into()));
                return outcome;
            }
        };

        let max_steps = self.limits.max_steps.unwrap_or_else(|| {
            std::cmp::max(4096, (tokens.len() + 1) * (self.grammar.productions.len() + 1) * 16)
        });
        // Cyclic unit reductions stall within one grammar round trip.
        let stagnation_limit = self.grammar.productions.len() + 4;
        let started = Instant::now();

        #[cfg(debug_assertions)]
        let debug = self.debug.get().map_or(Log::None, |s| *s);

        let mut live = vec![ParsePath::new(0)];
        let mut accepted: Vec<ParsePath> = Vec::new();
        let mut next_id: usize = 1;
        let mut death_index: usize = 0;
        let mut last_deaths: Vec<ParsePath> = Vec::new();

        'explore: while !live.is_empty() {
            let mut stepped: Vec<ParsePath> = Vec::new();
            for mut path in live.drain(..) {
                outcome.steps += 1;
                if outcome.steps > max_steps {
                    outcome
                        .errors
                        .push(ParseError::bounded(SafetyCap::Steps, path.token_index));
                    break 'explore;
                }
                if let Some(deadline) = self.limits.deadline {
                    if started.elapsed() >= deadline {
                        outcome
                            .errors
                            .push(ParseError::bounded(SafetyCap::Deadline, path.token_index));
                        break 'explore;
                    }
                }
                if let Some(flag) = &self.limits.cancelled {
                    if flag.get() {
                        outcome
                            .errors
                            .push(ParseError::bounded(SafetyCap::Cancelled, path.token_index));
                        break 'explore;
                    }
                }

                if path.token_index >= tokens.len()
                    && path.stack.len() == 1
                    && path.stack[0].rule == start_symbol
                {
                    #[cfg(debug_assertions)]
                    if debug.order() >= Log::Success(()).order() {
                        println!("[{}; ParsePathAccepted]: path {}", debug, path.id);
                    }
                    accepted.push(path);
                    continue;
                }
                if path.stagnation() > stagnation_limit {
                    // No-progress kill: the path cycles through unit reductions.
                    continue;
                }

                let actions = self.collect_actions(&path, tokens);
                if actions.is_empty() {
                    if path.token_index > death_index || last_deaths.is_empty() {
                        death_index = path.token_index;
                        last_deaths.clear();
                        last_deaths.push(path);
                    } else if path.token_index == death_index && last_deaths.len() < 8 {
                        last_deaths.push(path);
                    }
                    continue;
                }

                for action in actions.iter().skip(1) {
                    let mut forked = path.fork(next_id, outcome.steps);
                    next_id += 1;
                    outcome.path_count += 1;
                    self.apply_action(&mut forked, action, tokens);
                    stepped.push(forked);
                }
                self.apply_action(&mut path, &actions[0], tokens);
                stepped.insert(stepped.len() - (actions.len() - 1), path);
            }

            // Merge paths which agree on position, context and stack shape, then
            // prune the overflow beyond the live path cap.
            let mut seen = HashSet::new();
            let mut merged: Vec<ParsePath> = Vec::new();
            for path in stepped {
                if seen.insert(path.merge_key()) {
                    merged.push(path);
                }
            }
            if merged.len() > self.limits.max_paths {
                merged.sort_by(|a, b| {
                    a.stagnation()
                        .cmp(&b.stagnation())
                        .then(b.cumulative_precedence.cmp(&a.cumulative_precedence))
                        .then(a.born_step.cmp(&b.born_step))
                        .then(a.id.cmp(&b.id))
                });
                merged.truncate(self.limits.max_paths);
            }
            live = merged;
        }

        accepted.sort_by(|a, b| {
            b.cumulative_precedence
                .cmp(&a.cumulative_precedence)
                .then(a.born_step.cmp(&b.born_step))
                .then(a.id.cmp(&b.id))
        });

        let mut fingerprints = HashSet::new();
        for path in &accepted {
            if fingerprints.insert(tree_fingerprint(&path.stack[0])) {
                outcome.trees.push(path.stack[0].clone());
            }
        }

        if let Some(best) = accepted.first() {
            outcome.symbols = best.symbols.clone();
            outcome.final_context = best.context_stack.path();
        } else if outcome.errors.is_empty() {
            outcome
                .errors
                .push(self.syntax_error(&last_deaths, death_index, tokens));
        }
        outcome
    }

    fn collect_actions(&self, path: &ParsePath, tokens: &[StepToken]) -> Vec<StepAction> {
        let current = path.context_stack.current().to_string();
        let reduces: Vec<Rc<ProductionRule>> = self
            .grammar
            .productions
            .iter()
            .filter(|production| {
                production.applies_in(&current, |tag| path.context_stack.contains(tag))
            })
            .filter(|production| path.stack_matches(&production.rhs))
            .cloned()
            .collect();
        let can_shift = path.token_index < tokens.len();

        // A single reduce against a shiftable operator is the classic tie the
        // precedence table settles; everything else forks.
        if reduces.len() == 1 && can_shift {
            if let Some(resolved) =
                self.resolve_tie(&reduces[0], &tokens[path.token_index])
            {
                return vec![resolved];
            }
        }

        let mut actions: Vec<StepAction> = reduces.into_iter().map(StepAction::Reduce).collect();
        if can_shift {
            actions.push(StepAction::Shift);
        }
        actions
    }

    fn resolve_tie(
        &self,
        production: &Rc<ProductionRule>,
        next_token: &StepToken,
    ) -> Option<StepAction> {
        let reduce_level = self.grammar.production_precedence(production)?;
        let shift_level = self
            .grammar
            .precedence
            .get(&next_token.kind)
            .or_else(|| self.grammar.precedence.get(&next_token.value))
            .copied()?;

        if reduce_level > shift_level {
            return Some(StepAction::Reduce(production.clone()));
        }
        if reduce_level < shift_level {
            return Some(StepAction::Shift);
        }
        let associativity = self
            .grammar
            .associativity
            .get(&next_token.kind)
            .or_else(|| self.grammar.associativity.get(&next_token.value))
            .copied()?;
        match associativity {
            crate::grammar::Associativity::Left => Some(StepAction::Reduce(production.clone())),
            crate::grammar::Associativity::Right => Some(StepAction::Shift),
            crate::grammar::Associativity::None => None,
        }
    }

    fn apply_action(&self, path: &mut ParsePath, action: &StepAction, tokens: &[StepToken]) {
        match action {
            StepAction::Shift => {
                let token = tokens[path.token_index].clone();
                let mut location = token.location.clone();
                location.context = path.context_stack.path();
                path.stack.push(ParseNode::leaf(token, location));
                path.token_index += 1;
                path.note_shift();
            }
            StepAction::Reduce(production) => {
                let keep = path.stack.len() - production.rhs.len();
                let children = path.stack.split_off(keep);
                let was_nonterminal_unit = children.len() == 1 && !children[0].is_terminal();

                let first = children.first().expect("reductions never match empty");
                let last = children.last().expect("reductions never match empty");
                let location = CodeLocation::new(
                    first.location.file.clone(),
                    first.location.start,
                    last.location.end,
                    (first.span.0, last.span.1),
                    path.context_stack.path(),
                );
                let mut node = ParseNode::new(&production.name, children, location);
                path.cumulative_precedence += self
                    .grammar
                    .production_precedence(production)
                    .unwrap_or(0) as i64;

                self.fire_action(production, &mut node, path);
                path.stack.push(node);
                path.note_reduction(production.rhs.len(), was_nonterminal_unit);
            }
        }
    }

    fn fire_action(&self, production: &ProductionRule, node: &mut ParseNode, path: &mut ParsePath) {
        match &production.action {
            None | Some(RuleAction::Skip) => {}
            Some(RuleAction::Rename(name)) => node.rule = name.clone(),
            Some(RuleAction::PushContext(tag)) => {
                // A name shaped leaf qualifies the frame (`function` + `main`);
                // punctuation openers push an anonymous frame.
                let identifier = node
                    .list_tree(&|candidate| {
                        candidate.token.as_ref().map_or(false, |token| {
                            matches!(token.kind.as_str(), "ID" | "IDENT" | "IDENTIFIER" | "NAME")
                        })
                    })
                    .first()
                    .and_then(|leaf| leaf.token.as_ref())
                    .map(|token| token.value.clone());
                path.context_stack.push(tag, identifier.as_deref());
            }
            Some(RuleAction::PopContext) => {
                path.context_stack.pop();
            }
            Some(RuleAction::EmitSymbol { symbol_type }) => {
                self.emit_symbol(symbol_type, node, path);
            }
            Some(RuleAction::User(id)) => {
                if let Some(user_action) = self.user_actions.get(id) {
                    user_action.apply(node, &mut path.context_stack, &mut path.symbols);
                }
            }
        }
    }

    /// Declare the symbol named by the reduction's first terminal leaf. The
    /// symbol value, when the production carries a nonterminal payload, is the
    /// text of its last nonterminal child and marks the symbol inlineable.
    fn emit_symbol(&self, symbol_type: &str, node: &mut ParseNode, path: &mut ParsePath) {
        let (name, declaration) = match node.first_leaf().and_then(|leaf| leaf.token.as_ref()) {
            Some(token) => (token.value.clone(), token.location.clone()),
            None => return,
        };
        let scope = path.context_stack.path();
        let mut declared = SymbolInfo::new(&name, symbol_type, &scope, declaration);
        let payload = node
            .children
            .iter()
            .rev()
            .find(|child| !child.is_terminal())
            .map(|child| child.text());
        if let Some(value) = payload {
            let value = value.trim().to_string();
            if !value.is_empty() {
                node.value = Some(value.clone());
                declared = declared.with_value(&value).inlineable();
            }
        }
        path.symbols.declare(declared);
    }

    /// Build the syntax error from every path which died at the furthest input
    /// position, pooling the productions that were still viable just before.
    fn syntax_error(
        &self,
        last_deaths: &[ParsePath],
        death_index: usize,
        tokens: &[StepToken],
    ) -> ParseError {
        if last_deaths.is_empty() {
            return ParseError::syntax(0, "Unexpected end of file.".to_string());
        }
        let mut viable: Vec<String> = Vec::new();
        for path in last_deaths {
            for name in path.viable_productions(&self.grammar) {
                if !viable.contains(&name) {
                    viable.push(name);
                }
            }
        }
        let failure_text = tokens
            .get(death_index)
            .map(|token| token.value.clone())
            .unwrap_or_else(|| "end of file".to_string());
        let mut message = format!("Unexpected '{}' at token {}.", failure_text, death_index);
        if !viable.is_empty() {
            message.push_str(&format!(" Viable productions: {}.", viable.join(", ")));
        }
        ParseError::syntax(death_index, message)
    }
}

/// Resolve references after a winning parse: every terminal leaf whose literal
/// resolves to a declared symbol visible from the leaf's scope is recorded as a
/// read, skipping the declaration site itself.
pub fn record_tree_references(tree: &ParseNode, symbols: &mut crate::symbol::SymbolTable) {
    let leaves = tree.list_tree(&|node| node.is_terminal());
    for leaf in leaves {
        let token = match &leaf.token {
            Some(token) => token,
            None => continue,
        };
        let scope = if leaf.location.context.is_empty() {
            "global".to_string()
        } else {
            leaf.location.context.clone()
        };
        let declared = match symbols.lookup(&token.value, &scope) {
            Some(symbol) => symbol.declaration.clone(),
            None => continue,
        };
        if declared == leaf.location || declared.span == leaf.location.span {
            continue;
        }
        symbols.add_reference(
            &token.value,
            &scope,
            leaf.location.clone(),
            crate::symbol::SymbolUsage::Read,
        );
    }
}

/// Check a grammar for obviously unusable state before parsing.
pub fn validate_grammar(grammar: &GrammarDefinition) -> Result<(), ParseError> {
    if grammar.token_rules.is_empty() {
        return Err(ParseError::grammar(
            "Grammar declares no token rules.".to_string(),
        ));
    }
    if grammar.start_symbol().is_none() {
        return Err(ParseError::grammar(
            "Grammar declares no productions.".to_string(),
        ));
    }
    Ok(())
}
