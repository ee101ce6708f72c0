use crate::examples::arithmetic::{
    ambiguous_engine, arithmetic_engine, precedence_engine, CYCLIC,
};
use crate::parser::tree_fingerprint;
use crate::{Engine, ParseErrorKind, SafetyCap, SafetyLimits};
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn parses_nested_additions() {
    let mut engine = arithmetic_engine();
    let result = engine.parse(b"1 + 2 + 3", None);
    assert!(result.success, "{:?}", result.errors);
    let tree = result.tree.unwrap();
    assert_eq!(tree.rule, "expr");
    assert_eq!(tree.text(), "1+2+3");
    assert_eq!(tree.span, (0, 9));
}

#[test]
fn parents_enclose_children_spans() {
    let mut engine = arithmetic_engine();
    let result = engine.parse(b"1 + 2", None);
    let tree = result.tree.unwrap();
    for child in &tree.children {
        assert!(tree.span.0 <= child.span.0 && child.span.1 <= tree.span.1);
    }
}

#[test]
fn ambiguous_grammar_returns_every_surviving_tree() {
    let mut engine = ambiguous_engine();
    let result = engine.parse(b"1 + 2 * 3", None);
    assert!(result.success, "{:?}", result.errors);
    assert!(
        result.ambiguous_parses.len() >= 2,
        "expected both association orders, got {}",
        result.ambiguous_parses.len()
    );
    // All trees cover the same input.
    for tree in &result.ambiguous_parses {
        assert_eq!(tree.text(), "1+2*3");
    }
}

#[test]
fn precedence_settles_the_ambiguity() {
    let mut engine = precedence_engine();
    let result = engine.parse(b"1 + 2 * 3", None);
    assert!(result.success, "{:?}", result.errors);
    assert_eq!(result.ambiguous_parses.len(), 1);
    let tree = result.tree.unwrap();
    // Multiplication binds tighter: the right operand of + holds the * subtree.
    assert_eq!(tree.children[0].text(), "1");
    assert!(tree.children[2].contains("TIMES"));
}

#[test]
fn left_associativity_reduces_eagerly() {
    let mut engine = precedence_engine();
    let result = engine.parse(b"1 + 2 + 3", None);
    assert!(result.success);
    assert_eq!(result.ambiguous_parses.len(), 1);
    let tree = result.tree.unwrap();
    assert_eq!(tree.children[0].text(), "1+2");
    assert_eq!(tree.children[2].text(), "3");
}

#[test]
fn cyclic_unit_production_terminates() {
    let mut engine = Engine::new();
    engine.load_grammar(CYCLIC).unwrap();
    let result = engine.parse(b"123", None);
    // Either a clean single leaf parse or a bounded exploration stop; never a hang.
    if !result.success {
        assert!(result.errors.iter().any(|e| e.is_bounded_exploration()));
    }
}

#[test]
fn syntax_error_reports_token_index_and_viable_productions() {
    let mut engine = arithmetic_engine();
    let result = engine.parse(b"1 + + 2", None);
    assert!(!result.success);
    let error = result
        .errors
        .iter()
        .find(|e| e.kind == ParseErrorKind::Syntax)
        .expect("syntax error expected");
    // Paths die once every reading is exhausted; the furthest failure point and
    // the productions still viable there are both reported.
    assert_eq!(error.pointer, 4);
    assert!(error.message.contains("token 4"));
    assert!(error.message.contains("expr"), "{}", error.message);
}

#[test]
fn step_budget_trips_bounded_exploration() {
    let mut engine =
        arithmetic_engine().with_limits(SafetyLimits::default().with_max_steps(2));
    let result = engine.parse(b"1 + 2 + 3", None);
    assert!(!result.success);
    assert!(result
        .errors
        .iter()
        .any(|e| e.kind == ParseErrorKind::BoundedExploration(SafetyCap::Steps)));
}

#[test]
fn cancellation_flag_stops_the_parse() {
    let flag = Rc::new(Cell::new(true));
    let mut engine = arithmetic_engine()
        .with_limits(SafetyLimits::default().with_cancellation(flag));
    let result = engine.parse(b"1 + 2", None);
    assert!(!result.success);
    assert!(result
        .errors
        .iter()
        .any(|e| e.kind == ParseErrorKind::BoundedExploration(SafetyCap::Cancelled)));
}

#[test]
fn repeated_parses_are_reproducible() {
    let mut engine = ambiguous_engine();
    let first = engine.parse(b"1 + 2 * 3", None);
    let second = engine.parse(b"1 + 2 * 3", None);
    assert_eq!(first.success, second.success);
    let first_prints: Vec<u64> = first.ambiguous_parses.iter().map(tree_fingerprint).collect();
    let second_prints: Vec<u64> = second
        .ambiguous_parses
        .iter()
        .map(tree_fingerprint)
        .collect();
    assert_eq!(first_prints, second_prints);
}

#[test]
fn parse_without_grammar_is_an_error() {
    let mut engine = Engine::new();
    let result = engine.parse(b"1", None);
    assert!(!result.success);
    assert!(result
        .errors
        .iter()
        .any(|e| e.kind == ParseErrorKind::Grammar));
}

#[test]
fn empty_input_fails_cleanly() {
    let mut engine = arithmetic_engine();
    let result = engine.parse(b"", None);
    assert!(!result.success);
    assert!(result.tokens.is_empty());
}
