//! Cross-check a JSON shaped grammar against serde_json on the same input.

use crate::{Engine, ParseNode, SafetyLimits};
use serde_json::Value as SerdeValue;

const MINI_JSON: &str = r#"Grammar: mini_json
STRING ::= /"([^"\\]|\\.)*"/
NUMBER ::= /-?[0-9]+(\.[0-9]+)?/
LBRACE ::= '{'
RBRACE ::= '}'
LBRACKET ::= '['
RBRACKET ::= ']'
COMMA ::= ','
COLON ::= ':'
TRUE ::= 'true'
FALSE ::= 'false'
NULL ::= 'null'
WS ::= /[ \t\r\n]+/ {skip}
value ::= <object> | <array> | STRING | NUMBER | TRUE | FALSE | NULL
object ::= LBRACE RBRACE | LBRACE <member_list> RBRACE
member_list ::= <member_list> COMMA <member> | <member>
member ::= STRING COLON <value>
array ::= LBRACKET RBRACKET | LBRACKET <element_list> RBRACKET
element_list ::= <element_list> COMMA <value> | <value>
"#;

fn json_engine() -> Engine {
    let mut engine =
        Engine::new().with_limits(SafetyLimits::default().with_max_paths(128));
    engine.load_grammar(MINI_JSON).expect("json grammar loads");
    engine
}

fn object_keys(tree: &ParseNode) -> Vec<String> {
    let mut keys: Vec<String> = tree
        .list_tree(&|node| node.rule == "member")
        .into_iter()
        .filter_map(|member| member.first_leaf())
        .filter_map(|leaf| leaf.token.as_ref())
        .map(|token| token.value.trim_matches('"').to_string())
        .collect();
    keys.sort();
    keys
}

#[test]
fn json_object_keys_match_serde() {
    let source = r#"{"alpha": 1, "beta": [true, null], "gamma": "text"}"#;

    let mut engine = json_engine();
    let result = engine.parse(source.as_bytes(), None);
    assert!(result.success, "{:?}", result.errors);

    let serde_value: SerdeValue = serde_json::from_str(source).unwrap();
    let mut serde_keys: Vec<String> = serde_value
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    serde_keys.sort();

    assert_eq!(object_keys(result.tree.as_ref().unwrap()), serde_keys);
}

#[test]
fn json_scalars_round_trip_against_serde() {
    for source in ["true", "null", "42", r#""quoted""#, "[1, 2, 3]"] {
        let mut engine = json_engine();
        let result = engine.parse(source.as_bytes(), None);
        let serde_ok = serde_json::from_str::<SerdeValue>(source).is_ok();
        assert_eq!(result.success, serde_ok, "disagreement on {:?}", source);
    }
}

#[test]
fn json_rejects_what_serde_rejects() {
    for source in ["{", "[1,", r#"{"a" 1}"#] {
        let mut engine = json_engine();
        let result = engine.parse(source.as_bytes(), None);
        assert!(serde_json::from_str::<SerdeValue>(source).is_err());
        assert!(!result.success, "engine accepted {:?}", source);
    }
}
