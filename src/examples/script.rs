//! A small statement language with assignments and braced blocks. Assignments
//! declare symbols through the `emit_symbol` action; braces push and pop a
//! `block` context, so inner declarations shadow outer ones and the
//! refactoring operations have real scopes to work against.

use crate::Engine;

pub const SCRIPT: &str = r#"Grammar: script
ID ::= /[A-Za-z_][A-Za-z0-9_]*/
NUMBER ::= /[0-9]+/
EQUALS ::= '='
SEMI ::= ';'
PLUS ::= '+'
LBRACE ::= '{'
RBRACE ::= '}'
WS ::= /[ \t\r\n]+/ {skip}
program ::= <stmt_list>
stmt_list ::= <stmt_list> <stmt> | <stmt>
stmt ::= <assign_stmt> | <block>
block ::= <block_open> <stmt_list> <block_close>
block_open ::= LBRACE => { push_context("block") }
block_close ::= RBRACE => { pop_context }
assign_stmt ::= ID EQUALS <expr> SEMI => { emit_symbol("variable") }
expr ::= <expr> PLUS <expr> | ID | NUMBER
"#;

pub fn script_engine() -> Engine {
    let mut engine = Engine::new();
    engine.load_grammar(SCRIPT).expect("script grammar loads");
    engine
}
