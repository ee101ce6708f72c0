use super::{PatternScanner, PatternTokenKind};
use crate::unicode::UnicodeOracle;
use crate::util::Code;
use std::rc::Rc;

fn scanner() -> PatternScanner {
    PatternScanner::new(Rc::new(UnicodeOracle::new()))
}

#[test]
fn empty_pattern_scans_to_no_tokens() {
    let scanner = scanner();
    let tokens = scanner.scan(&Code::from("")).unwrap();
    assert!(tokens.is_empty());
    assert!(scanner.resolve(&Code::from(""), &tokens).unwrap().is_empty());
}

#[test]
fn unterminated_character_class_is_a_scan_error() {
    let scanner = scanner();
    let err = scanner.scan(&Code::from("[abc")).unwrap_err();
    assert_eq!(err.pointer, 0);
}

#[test]
fn property_name_validation() {
    let scanner = scanner();

    let code = Code::from(r"\p{InvalidProperty}");
    let tokens = scanner.scan(&code).unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, PatternTokenKind::UnicodeProperty);
    assert!(scanner.resolve(&code, &tokens).is_err());

    let code = Code::from(r"\p{L}");
    let tokens = scanner.scan(&code).unwrap();
    let resolved = scanner.resolve(&code, &tokens).unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].kind, PatternTokenKind::UnicodeProperty);
}

#[test]
fn unterminated_property_group_spans_to_eof_and_fails_resolution() {
    let scanner = scanner();
    let code = Code::from(r"\p{Letter");
    let tokens = scanner.scan(&code).unwrap();
    assert_eq!(tokens.len(), 1);
    assert!(!tokens[0].valid);
    assert_eq!(tokens[0].end, code.len());
    assert!(scanner.resolve(&code, &tokens).is_err());
}

#[test]
fn inline_modifier_recognition() {
    let scanner = scanner();
    let code = Code::from("(?imsx)test");
    let tokens = scanner.scan(&code).unwrap();
    assert_eq!(tokens.len(), 5);
    assert_eq!(tokens[0].kind, PatternTokenKind::InlineModifier);
    assert_eq!((tokens[0].start, tokens[0].end), (0, 7));
    for token in &tokens[1..] {
        assert_eq!(token.kind, PatternTokenKind::Literal);
    }
}

#[test]
fn hex_escape_ambiguity_resolves_to_longest() {
    let scanner = scanner();
    let code = Code::from(r"\x{41}");
    let tokens = scanner.scan(&code).unwrap();
    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].is_ambiguous());
    assert_eq!(tokens[0].alternatives.len(), 2);
    assert_eq!(tokens[0].alternatives[0].kind, PatternTokenKind::HexEscape);
    assert_eq!(
        tokens[0].alternatives[1].kind,
        PatternTokenKind::UnicodeEscape
    );

    let resolved = scanner.resolve(&code, &tokens).unwrap();
    assert_eq!(resolved[0].kind, PatternTokenKind::UnicodeEscape);
    assert_eq!(resolved[0].end, 6);
    assert!(tokens[0]
        .alternatives
        .iter()
        .all(|alternative| resolved[0].end >= alternative.end));
}

#[test]
fn plain_hex_escape_is_unambiguous() {
    let scanner = scanner();
    let code = Code::from(r"\x41");
    let tokens = scanner.scan(&code).unwrap();
    assert_eq!(tokens.len(), 1);
    assert!(!tokens[0].is_ambiguous());
    assert_eq!(tokens[0].kind, PatternTokenKind::HexEscape);
}

#[test]
fn literal_text_block_and_downgrade() {
    let scanner = scanner();
    let code = Code::from(r"\Qa+b\E");
    let tokens = scanner.scan(&code).unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, PatternTokenKind::LiteralText);
    assert_eq!(tokens[0].end, 7);

    // Without a closing \E the sequence downgrades to a two byte escape.
    let code = Code::from(r"\Qab");
    let tokens = scanner.scan(&code).unwrap();
    assert_eq!(tokens[0].kind, PatternTokenKind::EscapeSequence);
    assert_eq!(tokens[0].end, 2);
    assert_eq!(tokens.len(), 3);
}

#[test]
fn regex_comment_tracks_nested_parentheses() {
    let scanner = scanner();
    let code = Code::from("(?#outer (inner) tail)a");
    let tokens = scanner.scan(&code).unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, PatternTokenKind::RegexComment);
    assert_eq!(tokens[0].end, 22);
    assert_eq!(tokens[1].kind, PatternTokenKind::Literal);
}

#[test]
fn quantifiers_and_anchors() {
    let scanner = scanner();
    let code = Code::from("^a*?b+$");
    let kinds: Vec<_> = scanner
        .scan(&code)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            PatternTokenKind::StartAnchor,
            PatternTokenKind::Literal,
            PatternTokenKind::LazyQuantifier,
            PatternTokenKind::Literal,
            PatternTokenKind::Quantifier,
            PatternTokenKind::EndAnchor,
        ]
    );
}

#[test]
fn special_groups() {
    let scanner = scanner();
    let code = Code::from("(?:a)(?<name>b)");
    let tokens = scanner.scan(&code).unwrap();
    assert_eq!(tokens[0].kind, PatternTokenKind::SpecialGroup);
    assert_eq!(tokens[0].end, 3);
    assert_eq!(tokens[3].kind, PatternTokenKind::SpecialGroup);
    assert_eq!((tokens[3].start, tokens[3].end), (5, 13));
}

#[test]
fn compiled_pattern_is_anchored() {
    let scanner = scanner();
    let digits = scanner.compile("[0-9]+").unwrap();
    assert!(digits.is_match(b"123abc"));
    assert!(!digits.is_match(b"abc123"));
    assert_eq!(digits.find(b"42 rest").unwrap().end(), 2);
}

#[test]
fn compiled_block_property_expands_to_ranges() {
    let scanner = scanner();
    let ascii = scanner.compile(r"\p{Basic_Latin}+").unwrap();
    assert!(ascii.is_match(b"abc"));
    assert!(!ascii.is_match("é".as_bytes()));
}

#[test]
fn nullable_pattern_is_rejected() {
    let scanner = scanner();
    assert!(scanner.compile("a*").is_err());
}
