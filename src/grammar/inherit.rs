use super::{GrammarDefinition, GrammarDiagnostic, GrammarLoader};
use crate::lexer::TokenRule;
use std::rc::Rc;

/// Common lexicon shipped for `Inherits: antlr4_base`.
const ANTLR4_BASE: &str = r#"Grammar: antlr4_base
Inheritable: true
ID ::= /[A-Za-z_][A-Za-z0-9_]*/
INT ::= /[0-9]+/
FLOAT ::= /[0-9]+\.[0-9]+/
STRING ::= /"([^"\\]|\\.)*"/
LINE_COMMENT ::= /\/\/[^\n]*/ {skip}
WS ::= /[ \t\r\n]+/ {skip}
"#;

/// Common lexicon shipped for `Inherits: bison_base`.
const BISON_BASE: &str = r#"Grammar: bison_base
Inheritable: true
IDENTIFIER ::= /[A-Za-z_][A-Za-z0-9_]*/
NUMBER ::= /[0-9]+(\.[0-9]+)?/
CHAR ::= /'([^'\\]|\\.)'/
STRING ::= /"([^"\\]|\\.)*"/
WS ::= /[ \t\r\n]+/ {skip}
"#;

impl GrammarLoader {
    /// Resolve every `Inherits:` entry and merge the bases into the grammar.
    pub(super) fn resolve_inheritance(&self, grammar: &mut GrammarDefinition) {
        for import in grammar.imports.clone() {
            let base = match self.resolve_import(&import) {
                Some(base) => base,
                None => {
                    grammar.diagnostics.push(GrammarDiagnostic {
                        line: 0,
                        message: format!("Unresolved inheritance '{}'.", import),
                    });
                    continue;
                }
            };
            if !base.inheritable {
                grammar.diagnostics.push(GrammarDiagnostic {
                    line: 0,
                    message: format!("Grammar '{}' is not inheritable.", base.name),
                });
                continue;
            }
            merge_base(grammar, &base);
        }
    }

    fn resolve_import(&self, import: &str) -> Option<Rc<GrammarDefinition>> {
        match import {
            "antlr4_base" => Some(self.builtin(import, ANTLR4_BASE)),
            "bison_base" => Some(self.builtin(import, BISON_BASE)),
            path => self.load_path(path).ok(),
        }
    }

    fn builtin(&self, name: &str, text: &str) -> Rc<GrammarDefinition> {
        if let Some(cached) = self.cache.borrow().get(name) {
            return cached.clone();
        }
        let grammar = self.load_text(text);
        debug_assert!(grammar.diagnostics.is_empty(), "builtin bases are clean");
        self.cache
            .borrow_mut()
            .insert(name.to_string(), grammar.clone());
        grammar
    }
}

/// Merge semantics: base entries come first, derived entries override by key.
/// Precedence and associativity only fill in where the derived grammar has no
/// entry; a conflicting associativity is diagnosed, never silently overridden.
fn merge_base(derived: &mut GrammarDefinition, base: &GrammarDefinition) {
    let mut token_rules: Vec<Rc<TokenRule>> = base
        .token_rules
        .iter()
        .filter(|rule| !derived.token_rules.iter().any(|d| d.name == rule.name))
        .cloned()
        .collect();
    token_rules.append(&mut derived.token_rules);
    derived.token_rules = token_rules;

    let mut productions: Vec<_> = base
        .productions
        .iter()
        .filter(|production| !derived.has_production(&production.name))
        .cloned()
        .collect();
    productions.append(&mut derived.productions);
    derived.productions = productions;

    for (operator, level) in &base.precedence {
        derived
            .precedence
            .entry(operator.clone())
            .or_insert(*level);
    }
    for (operator, associativity) in &base.associativity {
        match derived.associativity.get(operator) {
            None => {
                derived
                    .associativity
                    .insert(operator.clone(), *associativity);
            }
            Some(existing) if existing != associativity => {
                derived.diagnostics.push(GrammarDiagnostic {
                    line: 0,
                    message: format!(
                        "Conflicting associativity for '{}' between '{}' and '{}'.",
                        operator, base.name, derived.name
                    ),
                });
            }
            Some(_) => {}
        }
    }

    for context in &base.contexts {
        if !derived.contexts.contains(context) {
            derived.contexts.push(context.clone());
        }
    }
    let mut projections = base.projections.clone();
    projections.append(&mut derived.projections);
    derived.projections = projections;
}
