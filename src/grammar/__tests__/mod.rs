use super::{Associativity, GrammarLoader, RhsSymbol, RuleAction};
use crate::scanner::PatternScanner;
use crate::unicode::UnicodeOracle;
use std::rc::Rc;

fn loader() -> GrammarLoader {
    GrammarLoader::new(Rc::new(PatternScanner::new(Rc::new(UnicodeOracle::new()))))
}

#[test]
fn loads_token_and_production_rules() {
    let grammar = loader().load_text(
        r#"Grammar: arithmetic
NUMBER ::= /[0-9]+/
PLUS ::= '+'
WS ::= /[ \t\r\n]+/ {skip}
expr ::= <expr> PLUS <expr> | NUMBER
"#,
    );
    assert!(grammar.diagnostics.is_empty(), "{:?}", grammar.diagnostics);
    assert_eq!(grammar.name, "arithmetic");
    assert_eq!(grammar.token_rules.len(), 3);
    assert!(grammar.token_rules[2].skip);
    assert_eq!(grammar.productions.len(), 2);
    assert_eq!(grammar.start_symbol(), Some("expr"));

    let first = &grammar.productions[0];
    assert_eq!(
        first.rhs,
        vec![
            RhsSymbol::NonTerminal("expr".into()),
            RhsSymbol::Terminal("PLUS".into()),
            RhsSymbol::NonTerminal("expr".into()),
        ]
    );
    let second = &grammar.productions[1];
    assert_eq!(second.rhs, vec![RhsSymbol::Terminal("NUMBER".into())]);
}

#[test]
fn rhs_classification_follows_pattern_shape() {
    let grammar = loader().load_text(
        r#"Grammar: shapes
A ::= /[a-z]+/
B ::= 'word'
C ::= "word"
D ::= bare
e ::= <a_ref> TAIL
"#,
    );
    assert_eq!(grammar.token_rules.len(), 4);
    assert_eq!(grammar.productions.len(), 1);
}

#[test]
fn rename_action_changes_emitted_kind() {
    let grammar = loader().load_text(
        r#"Grammar: renames
DIGITS ::= /[0-9]+/ => { return("NUMBER") }
"#,
    );
    assert_eq!(grammar.token_rules[0].token_kind(), "NUMBER");
}

#[test]
fn context_and_priority_annotations() {
    let grammar = loader().load_text(
        r#"Grammar: annotated
ID ::= /[a-z]+/
<stmt (function, priority: 3)> ::= <stmt_tail> ID
stmt_tail ::= ID ID | ID
"#,
    );
    let production = &grammar.productions[0];
    assert_eq!(production.context.as_deref(), Some("function"));
    assert_eq!(production.priority, 3);
    assert!(grammar.contexts.contains(&"function".to_string()));
}

#[test]
fn precedence_block_assigns_levels_and_associativity() {
    let grammar = loader().load_text(
        r#"Grammar: ops
NUMBER ::= /[0-9]+/
PLUS ::= '+'
TIMES ::= '*'
expr ::= <expr> PLUS <expr> | <expr> TIMES <expr> | NUMBER
Precedence: {
    Level1: { operators: ["+"], associativity: "left" },
    Level2: { operators: ["*"], associativity: "right" }
}
"#,
    );
    assert_eq!(grammar.precedence.get("+"), Some(&1));
    assert_eq!(grammar.precedence.get("*"), Some(&2));
    assert_eq!(grammar.associativity.get("+"), Some(&Associativity::Left));
    assert_eq!(grammar.associativity.get("*"), Some(&Associativity::Right));

    // Operator levels resolve through the token kind as well.
    let add = &grammar.productions[0];
    assert_eq!(grammar.production_precedence(add), Some(1));
    assert_eq!(grammar.associativity_of(add), Some(Associativity::Left));
}

#[test]
fn multi_line_production_continuation() {
    let grammar = loader().load_text(
        r#"Grammar: continued
NUMBER ::= /[0-9]+/
PLUS ::= '+'
expr ::= <expr> PLUS <expr>
    | NUMBER
"#,
    );
    assert_eq!(grammar.productions.len(), 2);
}

#[test]
fn malformed_lines_become_diagnostics_not_failures() {
    let grammar = loader().load_text(
        r#"Grammar: partial
NUMBER ::= /[0-9]+/
<<<garbage
expr ::= NUMBER NUMBER | <missing>
"#,
    );
    assert!(!grammar.diagnostics.is_empty());
    assert_eq!(grammar.token_rules.len(), 1);
    assert!(grammar.has_production("expr"));
}

#[test]
fn undefined_symbol_reference_is_diagnosed() {
    let grammar = loader().load_text(
        r#"Grammar: dangling
NUMBER ::= /[0-9]+/
expr ::= <nowhere> NUMBER | NUMBER
"#,
    );
    assert!(grammar
        .diagnostics
        .iter()
        .any(|d| d.message.contains("nowhere")));
}

#[test]
fn unknown_directives_are_preserved() {
    let grammar = loader().load_text(
        r#"Grammar: extras
Whatever: keep me
NUMBER ::= /[0-9]+/
expr ::= NUMBER NUMBER | NUMBER
"#,
    );
    assert_eq!(grammar.extra_directives, vec!["Whatever: keep me"]);
}

#[test]
fn inherits_builtin_base_with_derived_overrides() {
    let grammar = loader().load_text(
        r#"Grammar: derived
Inherits: antlr4_base
ID ::= /[a-z]+/
expr ::= <expr> ID | ID
"#,
    );
    // The base lexicon arrives, the derived ID wins, and exactly one ID remains.
    assert!(grammar.token_rules.iter().any(|rule| rule.name == "INT"));
    assert!(grammar.token_rules.iter().any(|rule| rule.name == "WS"));
    let id_rules: Vec<_> = grammar
        .token_rules
        .iter()
        .filter(|rule| rule.name == "ID")
        .collect();
    assert_eq!(id_rules.len(), 1);
    match &id_rules[0].pattern {
        crate::lexer::RulePattern::Regex { source, .. } => assert_eq!(source, "[a-z]+"),
        _ => panic!("derived ID should be a regex rule"),
    }
    // Base rules come first so the derived grammar keeps its own ordering last.
    assert_eq!(grammar.token_rules.last().unwrap().name, "ID");
}

#[test]
fn unresolved_inheritance_is_diagnosed() {
    let grammar = loader().load_text(
        r#"Grammar: lost
Inherits: no_such_base
NUMBER ::= /[0-9]+/
expr ::= NUMBER NUMBER | NUMBER
"#,
    );
    assert!(grammar
        .diagnostics
        .iter()
        .any(|d| d.message.contains("no_such_base")));
}

#[test]
fn projection_lines_parse_into_user_handles() {
    let grammar = loader().load_text(
        r#"Grammar: projected
NUMBER ::= /[0-9]+/
expr ::= NUMBER NUMBER | NUMBER
@context(function) @projection(call_sites) expr => { record_call() }
"#,
    );
    assert_eq!(grammar.projections.len(), 1);
    let projection = &grammar.projections[0];
    assert_eq!(projection.context, "function");
    assert_eq!(projection.projection, "call_sites");
    assert_eq!(projection.rule, "expr");
    assert_eq!(
        projection.action,
        RuleAction::User("record_call()".to_string())
    );
}

#[test]
fn grammar_text_renders_rules() {
    let grammar = loader().load_text(
        r#"Grammar: printable
NUMBER ::= /[0-9]+/
PLUS ::= '+'
expr ::= <expr> PLUS <expr> | NUMBER
"#,
    );
    let rendered = grammar.grammar_text().unwrap();
    assert!(rendered.contains("Grammar: printable"));
    assert!(rendered.contains("NUMBER"));
    assert!(rendered.contains("|"));
}
