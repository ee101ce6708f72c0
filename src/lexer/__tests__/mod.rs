use super::{StreamLexer, TokenRule};
use crate::grammar::RuleAction;
use crate::scanner::PatternScanner;
use crate::unicode::UnicodeOracle;
use crate::util::Code;
use std::rc::Rc;

fn scanner() -> PatternScanner {
    PatternScanner::new(Rc::new(UnicodeOracle::new()))
}

fn rule(name: &str, pattern: &str, scanner: &PatternScanner) -> TokenRule {
    TokenRule::new(name, pattern, scanner).unwrap()
}

fn file() -> Rc<str> {
    Rc::from("test.src")
}

#[test]
fn tokenizes_in_source_order() {
    let scanner = scanner();
    let lexer = StreamLexer::new(vec![
        Rc::new(rule("ID", "/[A-Za-z_][A-Za-z0-9_]*/", &scanner)),
        Rc::new(rule("NUMBER", "/[0-9]+/", &scanner)),
        Rc::new(rule("WS", r"/[ \t\r\n]+/", &scanner).skippable()),
    ]);

    let paths = lexer.tokenize(&Code::from("abc 42"), &file()).unwrap();
    assert_eq!(paths.len(), 1);
    let kinds: Vec<&str> = paths[0].tokens.iter().map(|t| t.kind.as_str()).collect();
    assert_eq!(kinds, vec!["ID", "NUMBER"]);
    assert_eq!(paths[0].tokens[0].value, "abc");
    assert_eq!(paths[0].tokens[1].value, "42");
}

#[test]
fn token_location_spans_its_value() {
    let scanner = scanner();
    let lexer = StreamLexer::new(vec![
        Rc::new(rule("ID", "/[a-z]+/", &scanner)),
        Rc::new(rule("WS", r"/[ \t\r\n]+/", &scanner).skippable()),
    ]);

    let paths = lexer.tokenize(&Code::from("ab\ncd"), &file()).unwrap();
    for token in &paths[0].tokens {
        assert_eq!(token.location.len_bytes(), token.value.len());
    }
    let second = &paths[0].tokens[1];
    assert_eq!(second.location.start.line, 2);
    assert_eq!(second.location.start.column, 1);
    assert_eq!(second.location.end.column, 3);
}

#[test]
fn literal_rules_match_by_byte_compare() {
    let scanner = scanner();
    let lexer = StreamLexer::new(vec![
        Rc::new(rule("PLUS", "'+'", &scanner)),
        Rc::new(rule("ARROW", "\"->\"", &scanner)),
    ]);
    let paths = lexer.tokenize(&Code::from("+->"), &file()).unwrap();
    let kinds: Vec<&str> = paths[0].tokens.iter().map(|t| t.kind.as_str()).collect();
    assert_eq!(kinds, vec!["PLUS", "ARROW"]);
}

#[test]
fn unmatched_input_is_a_lex_error_with_position() {
    let scanner = scanner();
    let lexer = StreamLexer::new(vec![Rc::new(rule("NUMBER", "/[0-9]+/", &scanner))]);
    let error = lexer.tokenize(&Code::from("12ab"), &file()).unwrap_err();
    assert_eq!(error.pointer, 2);
    // Byte 2 is line 1, column 3.
    assert!(error.message.contains("1:3"), "{}", error.message);
}

#[test]
fn overlapping_rules_fork_paths() {
    let scanner = scanner();
    let lexer = StreamLexer::new(vec![
        Rc::new(rule("IF", "'if'", &scanner)),
        Rc::new(rule("ID", "/[a-z]+/", &scanner)),
    ]);

    let paths = lexer.tokenize(&Code::from("if"), &file()).unwrap();
    assert_eq!(paths.len(), 2);
    // Declaration order decides which reading leads.
    assert_eq!(paths[0].tokens[0].kind, "IF");
    assert_eq!(paths[1].tokens[0].kind, "ID");
    assert_ne!(paths[0].id, paths[1].id);
}

#[test]
fn priority_reorders_match_attempts() {
    let scanner = scanner();
    let lexer = StreamLexer::new(vec![
        Rc::new(rule("ID", "/[a-z]+/", &scanner)),
        Rc::new(rule("IF", "'if'", &scanner).with_priority(5)),
    ]);
    let paths = lexer.tokenize(&Code::from("if"), &file()).unwrap();
    assert_eq!(paths[0].tokens[0].kind, "IF");
}

#[test]
fn equivalent_paths_are_merged() {
    let scanner = scanner();
    // Both rules emit the same kind over the same span; the fork collapses.
    let lexer = StreamLexer::new(vec![
        Rc::new(rule("NUM", "/[0-9]+/", &scanner)),
        Rc::new(rule("DIGITS", "/[0-9]+/", &scanner).with_action(RuleAction::Rename("NUM".into()))),
    ]);
    let paths = lexer.tokenize(&Code::from("42"), &file()).unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].tokens[0].kind, "NUM");
}

#[test]
fn context_filter_gates_rules() {
    let scanner = scanner();
    let lexer = StreamLexer::new(vec![
        Rc::new(
            rule("OPEN", "'<'", &scanner).with_action(RuleAction::PushContext("tag".into())),
        ),
        Rc::new(
            rule("CLOSE", "'>'", &scanner)
                .with_context("tag")
                .with_action(RuleAction::PopContext),
        ),
        Rc::new(rule("NAME", "/[a-z]+/", &scanner).with_context("tag")),
    ]);

    let paths = lexer.tokenize(&Code::from("<ab>"), &file()).unwrap();
    let kinds: Vec<&str> = paths[0].tokens.iter().map(|t| t.kind.as_str()).collect();
    assert_eq!(kinds, vec!["OPEN", "NAME", "CLOSE"]);
    assert_eq!(paths[0].tokens[1].context, "tag");

    // Outside the context the gated rules never match.
    assert!(lexer.tokenize(&Code::from("ab"), &file()).is_err());
}

#[test]
fn renamed_kind_is_emitted() {
    let scanner = scanner();
    let lexer = StreamLexer::new(vec![Rc::new(
        rule("DIGITS", "/[0-9]+/", &scanner).with_action(RuleAction::Rename("NUMBER".into())),
    )]);
    let paths = lexer.tokenize(&Code::from("7"), &file()).unwrap();
    assert_eq!(paths[0].tokens[0].kind, "NUMBER");
}

#[test]
fn splittable_hint_marks_embedded_hex_escapes() {
    let scanner = scanner();
    let lexer = StreamLexer::new(vec![Rc::new(rule(
        "HEX",
        r"/\\x\{[0-9A-Fa-f]+\}/",
        &scanner,
    ))]);
    let paths = lexer
        .tokenize(&Code::from(r"\x{41}"), &file())
        .unwrap();
    let token = &paths[0].tokens[0];
    assert!(token.is_splittable);
    assert_eq!(token.split_tokens.len(), 1);
    assert_eq!(token.split_tokens[0].value, r"\x{41}");
}

#[test]
fn empty_input_yields_one_empty_path() {
    let scanner = scanner();
    let lexer = StreamLexer::new(vec![Rc::new(rule("NUMBER", "/[0-9]+/", &scanner))]);
    let paths = lexer.tokenize(&Code::from(""), &file()).unwrap();
    assert_eq!(paths.len(), 1);
    assert!(paths[0].tokens.is_empty());
}
