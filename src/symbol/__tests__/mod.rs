use super::{ContextStack, SymbolInfo, SymbolTable, SymbolUsage};
use crate::util::{CodeLocation, Position};
use std::rc::Rc;

fn location(line: usize, column: usize, span: (usize, usize)) -> CodeLocation {
    CodeLocation::new(
        Rc::from("test.src"),
        Position::new(line, column),
        Position::new(line, column + (span.1 - span.0)),
        span,
        "global".to_string(),
    )
}

#[test]
fn context_stack_operations() {
    let mut stack = ContextStack::new();
    assert_eq!(stack.current(), "global");
    assert_eq!(stack.depth(), 0);
    assert_eq!(stack.path(), "global");

    stack.push("class", Some("Foo"));
    stack.push("method", Some("bar"));
    assert_eq!(stack.current(), "method");
    assert_eq!(stack.depth(), 2);
    assert_eq!(stack.path(), "global.class.Foo.method.bar");
    assert!(stack.in_scope("class"));
    assert!(stack.in_scope("global"));
    assert!(stack.contains("method"));
    assert!(!stack.contains("function"));

    // Iteration runs outer to inner.
    let tags: Vec<&str> = stack.iter().map(|frame| frame.tag.as_str()).collect();
    assert_eq!(tags, vec!["class", "method"]);

    let popped = stack.pop().unwrap();
    assert_eq!(popped.tag, "method");
    assert_eq!(stack.current(), "class");
}

#[test]
fn lookup_walks_dotted_parents() {
    let mut table = SymbolTable::new();
    table.declare(SymbolInfo::new(
        "s",
        "variable",
        "a.b.c",
        location(1, 1, (0, 1)),
    ));

    let found = table.lookup("s", "a.b.c.d").unwrap();
    assert_eq!(found.scope_path, "a.b.c");
    assert!(table.lookup("s", "a.b").is_none());
    assert!(table.lookup("missing", "a.b.c.d").is_none());
}

#[test]
fn deeper_declarations_shadow_outer_ones() {
    let mut table = SymbolTable::new();
    table.declare(SymbolInfo::new(
        "x",
        "variable",
        "global",
        location(1, 1, (0, 1)),
    ));
    table.declare(SymbolInfo::new(
        "x",
        "variable",
        "global.block",
        location(2, 1, (10, 11)),
    ));

    assert_eq!(
        table.lookup("x", "global.block.inner").unwrap().scope_path,
        "global.block"
    );
    assert_eq!(table.lookup("x", "global").unwrap().scope_path, "global");
}

#[test]
fn references_accumulate_on_the_resolved_symbol() {
    let mut table = SymbolTable::new();
    table.declare(SymbolInfo::new(
        "x",
        "variable",
        "global",
        location(1, 1, (0, 1)),
    ));

    assert!(table.add_reference("x", "global.block", location(2, 1, (10, 11)), SymbolUsage::Read));
    assert!(table.add_reference("x", "global", location(3, 1, (20, 21)), SymbolUsage::Write));
    assert!(!table.add_reference("y", "global", location(4, 1, (30, 31)), SymbolUsage::Read));

    let symbol = table.get("x", "global").unwrap();
    assert_eq!(symbol.references.len(), 2);
    assert_eq!(table.find_all_references("x").len(), 2);
}

#[test]
fn find_all_references_spans_scopes() {
    let mut table = SymbolTable::new();
    table.declare(SymbolInfo::new(
        "x",
        "variable",
        "global",
        location(1, 1, (0, 1)),
    ));
    table.declare(SymbolInfo::new(
        "x",
        "variable",
        "global.fn",
        location(5, 1, (50, 51)),
    ));
    table.add_reference("x", "global", location(2, 1, (10, 11)), SymbolUsage::Read);
    table.add_reference("x", "global.fn", location(6, 1, (60, 61)), SymbolUsage::Read);

    assert_eq!(table.find_all_references("x").len(), 2);
}

#[test]
fn inlineable_symbols_carry_values() {
    let mut table = SymbolTable::new();
    table.declare(
        SymbolInfo::new("n", "variable", "global", location(1, 1, (0, 1)))
            .with_value("42")
            .inlineable(),
    );
    let symbol = table.lookup("n", "global").unwrap();
    assert!(symbol.can_inline);
    assert_eq!(symbol.value.as_deref(), Some("42"));
}
