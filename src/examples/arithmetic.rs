//! Arithmetic expression grammars in three flavors: unambiguous addition,
//! ambiguous addition/multiplication without precedence, and the same lexicon
//! with a precedence table settling the shift/reduce ties.

use crate::Engine;

pub const ARITHMETIC: &str = r#"Grammar: arithmetic
NUMBER ::= /[0-9]+/
PLUS ::= '+'
WS ::= /[ \t\r\n]+/ {skip}
expr ::= <expr> PLUS <expr> | NUMBER
"#;

pub const AMBIGUOUS: &str = r#"Grammar: ambiguous_arithmetic
NUMBER ::= /[0-9]+/
PLUS ::= '+'
TIMES ::= '*'
WS ::= /[ \t\r\n]+/ {skip}
expr ::= <expr> PLUS <expr> | <expr> TIMES <expr> | NUMBER
"#;

pub const WITH_PRECEDENCE: &str = r#"Grammar: precedence_arithmetic
NUMBER ::= /[0-9]+/
PLUS ::= '+'
TIMES ::= '*'
WS ::= /[ \t\r\n]+/ {skip}
expr ::= <expr> PLUS <expr> | <expr> TIMES <expr> | NUMBER
Precedence: {
    Level1: { operators: ["+"], associativity: "left" },
    Level2: { operators: ["*"], associativity: "left" }
}
"#;

/// A grammar whose only production is left recursive with no terminal anchor;
/// exercising the parser's no-progress detection.
pub const CYCLIC: &str = r#"Grammar: cyclic
NUMBER ::= /[0-9]+/
expr ::= <expr> | NUMBER
"#;

pub fn arithmetic_engine() -> Engine {
    let mut engine = Engine::new();
    engine
        .load_grammar(ARITHMETIC)
        .expect("arithmetic grammar loads");
    engine
}

pub fn ambiguous_engine() -> Engine {
    let mut engine = Engine::new();
    engine
        .load_grammar(AMBIGUOUS)
        .expect("ambiguous grammar loads");
    engine
}

pub fn precedence_engine() -> Engine {
    let mut engine = Engine::new();
    engine
        .load_grammar(WITH_PRECEDENCE)
        .expect("precedence grammar loads");
    engine
}
