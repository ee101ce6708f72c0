use crate::examples::arithmetic::{ambiguous_engine, arithmetic_engine, CYCLIC};
use crate::examples::script::script_engine;
use crate::{Engine, ParseErrorKind};
use std::collections::BTreeMap;

#[test]
fn arithmetic_parse_end_to_end() {
    let mut engine = arithmetic_engine();
    let result = engine.parse(b"1 + 2 + 3", None);

    assert!(result.success, "{:?}", result.errors);
    assert!(!result.ambiguous_parses.is_empty());
    let kinds: Vec<&str> = result.tokens.iter().map(|t| t.kind.as_str()).collect();
    assert_eq!(kinds, vec!["NUMBER", "PLUS", "NUMBER", "PLUS", "NUMBER"]);
    assert!(result.path_count >= 1);
}

#[test]
fn ambiguity_is_exposed_not_hidden() {
    let mut engine = ambiguous_engine();
    let result = engine.parse(b"1 + 2 * 3", None);
    assert!(result.success);
    assert!(result.ambiguous_parses.len() >= 2);
}

#[test]
fn left_recursion_terminates_within_the_step_cap() {
    let mut engine = Engine::new();
    engine.load_grammar(CYCLIC).unwrap();
    let result = engine.parse(b"123", None);
    let bounded = result.errors.iter().any(|e| e.is_bounded_exploration());
    assert!(result.success || bounded);
}

#[test]
fn token_locations_cover_their_text() {
    let mut engine = arithmetic_engine();
    let result = engine.parse(b"10 + 250", None);
    for token in &result.tokens {
        assert_eq!(token.location.len_bytes(), token.value.len());
    }
}

#[test]
fn terminal_leaves_reassemble_the_input_without_skips() {
    let mut engine = arithmetic_engine();
    let source = "1 + 2 + 3";
    let result = engine.parse(source.as_bytes(), None);
    let tree = result.tree.unwrap();
    let without_skips: String = source.chars().filter(|c| !c.is_whitespace()).collect();
    assert_eq!(tree.text(), without_skips);
}

#[test]
fn utf8_bom_is_stripped_before_lexing() {
    let mut engine = arithmetic_engine();
    let mut source = vec![0xEF, 0xBB, 0xBF];
    source.extend_from_slice(b"1 + 2");
    let result = engine.parse(&source, None);
    assert!(result.success, "{:?}", result.errors);
}

#[test]
fn non_utf8_boms_are_rejected_with_a_scan_error() {
    let mut engine = arithmetic_engine();
    let result = engine.parse(&[0xFF, 0xFE, b'1', 0x00], None);
    assert!(!result.success);
    let error = &result.errors[0];
    assert_eq!(error.kind, ParseErrorKind::Scan);
    assert!(error.message.contains("UTF-16LE"));
}

#[test]
fn parse_many_of_nothing_is_unsuccessful() {
    let mut engine = arithmetic_engine();
    let result = engine.parse_many(&BTreeMap::new());
    assert!(!result.success);
}

#[test]
fn parse_many_merges_per_file_results() {
    let mut engine = script_engine();
    let mut files = BTreeMap::new();
    files.insert("a.src".to_string(), b"x = 1;".to_vec());
    files.insert("b.src".to_string(), b"y = 2;".to_vec());

    let result = engine.parse_many(&files);
    assert!(result.success, "{:?}", result.errors);
    assert!(result.tree.is_some());
    // Symbols from both files are visible afterwards.
    let symbols = engine.symbols().unwrap();
    assert!(symbols.lookup("x", "global").is_some());
    assert!(symbols.lookup("y", "global").is_some());

    files.insert("c.src".to_string(), b"= broken".to_vec());
    let mixed = engine.parse_many(&files);
    assert!(!mixed.success);
}

#[test]
fn parse_and_merge_keeps_the_old_tree_on_failure() {
    let mut engine = arithmetic_engine();
    let first = engine.parse(b"1 + 2", None);
    let existing = first.tree.clone();

    let merged = engine.parse_and_merge(existing.clone(), b"1 + + 2", None);
    assert_eq!(
        merged.as_ref().map(|t| t.span),
        existing.as_ref().map(|t| t.span)
    );

    let replaced = engine.parse_and_merge(existing, b"7 + 8 + 9", None);
    assert_eq!(replaced.unwrap().text(), "7+8+9");
}

#[test]
fn final_context_reports_the_winning_paths_scope() {
    let mut engine = script_engine();
    let result = engine.parse(b"x = 1;", None);
    assert!(result.success);
    assert_eq!(result.final_context, "global");
}

#[test]
fn elapsed_and_path_counts_are_populated() {
    let mut engine = ambiguous_engine();
    let result = engine.parse(b"1 + 2 * 3", None);
    assert!(result.path_count > 1);
    assert!(result.elapsed.as_nanos() > 0);
}
