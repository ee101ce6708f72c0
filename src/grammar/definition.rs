use super::{
    Associativity, GrammarDefinition, GrammarDiagnostic, ProductionRule, RhsSymbol, RuleAction,
};
use crate::lexer::{RulePattern, StreamLexer};
use std::collections::{HashMap, HashSet};
use std::fmt::Write;

impl GrammarDefinition {
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            token_splitter: None,
            token_rules: Vec::new(),
            productions: Vec::new(),
            precedence: HashMap::new(),
            associativity: HashMap::new(),
            contexts: Vec::new(),
            imports: Vec::new(),
            inheritable: false,
            format_type: None,
            projections: Vec::new(),
            extra_directives: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// The start symbol: the first declared production.
    pub fn start_symbol(&self) -> Option<&str> {
        self.productions.first().map(|p| p.name.as_str())
    }

    pub fn is_terminal(&self, name: &str) -> bool {
        self.token_rules
            .iter()
            .any(|rule| rule.name == name || rule.token_kind() == name)
    }

    pub fn has_production(&self, name: &str) -> bool {
        self.productions.iter().any(|p| p.name == name)
    }

    /// Alternatives declared under one production name, in declaration order.
    pub fn alternatives_of(&self, name: &str) -> Vec<&ProductionRule> {
        self.productions
            .iter()
            .filter(|p| p.name == name)
            .map(|p| p.as_ref())
            .collect()
    }

    /// Build the stream lexer for this grammar's token rules.
    pub fn build_lexer(&self) -> StreamLexer {
        StreamLexer::new(self.token_rules.clone())
    }

    /// The literal text of a named token rule's pattern, when it is a literal.
    /// Precedence tables usually key operators by their text (`"+"`) while
    /// productions reference the token kind (`PLUS`); this bridges the two.
    pub fn terminal_literal(&self, name: &str) -> Option<String> {
        self.token_rules
            .iter()
            .find(|rule| rule.name == name || rule.token_kind() == name)
            .and_then(|rule| match &rule.pattern {
                RulePattern::Literal(bytes) => Some(String::from_utf8_lossy(bytes).to_string()),
                RulePattern::Regex { .. } => None,
            })
    }

    fn operator_level(&self, symbol: &RhsSymbol) -> Option<i32> {
        match symbol {
            RhsSymbol::Terminal(name) => self.precedence.get(name).copied().or_else(|| {
                self.terminal_literal(name)
                    .and_then(|text| self.precedence.get(&text).copied())
            }),
            RhsSymbol::Literal(text) => self.precedence.get(text).copied(),
            RhsSymbol::NonTerminal(_) => None,
        }
    }

    /// Operator precedence of a production: the highest precedence among its
    /// operator shaped symbols, if any is configured.
    pub fn production_precedence(&self, production: &ProductionRule) -> Option<i32> {
        production
            .rhs
            .iter()
            .filter_map(|symbol| self.operator_level(symbol))
            .max()
    }

    pub fn associativity_of(&self, production: &ProductionRule) -> Option<Associativity> {
        production.rhs.iter().find_map(|symbol| match symbol {
            RhsSymbol::Terminal(name) => self.associativity.get(name).copied().or_else(|| {
                self.terminal_literal(name)
                    .and_then(|text| self.associativity.get(&text).copied())
            }),
            RhsSymbol::Literal(text) => self.associativity.get(text).copied(),
            RhsSymbol::NonTerminal(_) => None,
        })
    }

    /// Check that every symbol referenced from a production resolves to a token
    /// rule or another production. Unresolved references become diagnostics.
    pub fn validate_references(&mut self) {
        let mut missing: Vec<String> = Vec::new();
        for production in &self.productions {
            for symbol in &production.rhs {
                match symbol {
                    RhsSymbol::NonTerminal(name) => {
                        if !self.has_production(name) && !self.is_terminal(name) {
                            missing.push(format!(
                                "Production '{}' references undefined symbol '{}'.",
                                production.name, name
                            ));
                        }
                    }
                    RhsSymbol::Terminal(name) => {
                        if !self.is_terminal(name) && !self.has_production(name) {
                            missing.push(format!(
                                "Production '{}' references undefined terminal '{}'.",
                                production.name, name
                            ));
                        }
                    }
                    RhsSymbol::Literal(_) => {}
                }
            }
        }
        let mut reported = HashSet::new();
        for message in missing {
            if reported.insert(message.clone()) {
                self.diagnostics.push(GrammarDiagnostic { line: 0, message });
            }
        }
    }

    /// Render a readable grammar listing for debugging and tests.
    pub fn grammar_text(&self) -> Result<String, std::fmt::Error> {
        let mut writer = String::new();
        writeln!(writer, "Grammar: {}", self.name)?;
        writeln!(writer, "fragment {{")?;
        for rule in &self.token_rules {
            writeln!(writer, "{:>6}{} ,", "", rule)?;
        }
        writeln!(writer, "}}")?;
        let mut written: HashSet<&str> = HashSet::new();
        for production in &self.productions {
            if written.insert(&production.name) {
                writeln!(writer, "{}", production.name)?;
                for (index, alternative) in
                    self.alternatives_of(&production.name).iter().enumerate()
                {
                    let symbols: Vec<String> =
                        alternative.rhs.iter().map(|s| s.to_string()).collect();
                    if index == 0 {
                        writeln!(writer, "{:>6} {}", ":", symbols.join(" "))?;
                    } else {
                        writeln!(writer, "{:>6} {}", "|", symbols.join(" "))?;
                    }
                }
            }
        }
        Ok(writer)
    }
}

impl std::fmt::Display for RhsSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RhsSymbol::NonTerminal(name) => write!(f, "<{}>", name),
            RhsSymbol::Terminal(name) => write!(f, "{}", name),
            RhsSymbol::Literal(text) => write!(f, "'{}'", text),
        }
    }
}

impl ProductionRule {
    pub fn new(name: &str, rhs: Vec<RhsSymbol>) -> Self {
        Self {
            name: name.to_string(),
            rhs,
            context: None,
            priority: 0,
            action: None,
        }
    }

    pub fn with_context(mut self, context: &str) -> Self {
        if !context.is_empty() {
            self.context = Some(context.to_string());
        }
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_action(mut self, action: RuleAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Whether the alternative can apply in the given context stack state.
    pub fn applies_in(&self, current: &str, stack_contains: impl Fn(&str) -> bool) -> bool {
        match &self.context {
            None => true,
            Some(filter) => filter == current || stack_contains(filter),
        }
    }
}

impl std::fmt::Display for ProductionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbols: Vec<String> = self.rhs.iter().map(|s| s.to_string()).collect();
        write!(f, "{} : {}", self.name, symbols.join(" "))
    }
}

impl std::fmt::Display for GrammarDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.line > 0 {
            write!(f, "line {}: {}", self.line, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}
