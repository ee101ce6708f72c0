use crate::examples::script::script_engine;
use crate::refactor::{ChangeKind, NodeIndex};
use crate::util::{CodeLocation, Position};
use crate::{Engine, ParseNode};

fn leaf_location(tree: &ParseNode, value: &str, occurrence: usize) -> CodeLocation {
    tree.list_tree(&|node| {
        node.token
            .as_ref()
            .map_or(false, |token| token.value == value)
    })[occurrence]
        .location
        .clone()
}

#[test]
fn node_index_answers_innermost_point_queries() {
    let mut engine = script_engine();
    let result = engine.parse(b"x = 1 + 2;", None);
    assert!(result.success, "{:?}", result.errors);
    let tree = result.tree.as_ref().unwrap();
    let index = NodeIndex::build(tree);

    // Byte 4 sits on the literal `1`: the innermost entry is the NUMBER leaf.
    let (location, rule, terminal) = index.node_at(4).unwrap();
    assert_eq!(rule, "NUMBER");
    assert!(terminal);
    assert_eq!(location.span, (4, 5));

    // The same point through line/column resolution.
    let (by_point, _, _) = index.node_at_point(1, 5).unwrap();
    assert_eq!(by_point.span, (4, 5));

    assert!(index.node_at(99).is_none());
}

#[test]
fn caller_locations_without_spans_resolve_by_point() {
    let mut engine = script_engine();
    let result = engine.parse(b"x = 1; y = x;", None);
    assert!(result.success);

    // A location built from line/column only, the way an editor would send it.
    let at_declaration = CodeLocation::new(
        std::rc::Rc::from("<memory>"),
        Position::new(1, 1),
        Position::new(1, 2),
        (0, 0),
        String::new(),
    );
    let outcome = engine.find_usages(&at_declaration, None);
    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(outcome.usages.len(), 1);
}

#[test]
fn rename_propagates_to_declaration_and_references() {
    let mut engine = script_engine();
    let result = engine.parse(b"x = 1; y = x + x; z = x;", None);
    assert!(result.success, "{:?}", result.errors);
    let tree = result.tree.as_ref().unwrap();

    let declaration = leaf_location(tree, "x", 0);
    let outcome = engine.rename(&declaration, "y");
    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(outcome.changes.len(), 4);
    for change in &outcome.changes {
        assert_eq!(change.kind, ChangeKind::Replace);
        assert_eq!(change.original_text, "x");
        assert_eq!(change.new_text, "y");
    }
    // Changes are sorted and non overlapping.
    for pair in outcome.changes.windows(2) {
        assert!(pair[0].location.span.1 <= pair[1].location.span.0);
    }
    assert!(outcome.message.contains("4"));
}

#[test]
fn rename_rejects_invalid_identifiers() {
    let mut engine = script_engine();
    let result = engine.parse(b"x = 1;", None);
    let declaration = leaf_location(result.tree.as_ref().unwrap(), "x", 0);
    let outcome = engine.rename(&declaration, "9lives");
    assert!(!outcome.success);
    assert!(outcome.message.contains("9lives"));
}

#[test]
fn find_usages_lists_reference_locations() {
    let mut engine = script_engine();
    let result = engine.parse(b"x = 1; y = x + x; z = x;", None);
    let tree = result.tree.as_ref().unwrap();

    let declaration = leaf_location(tree, "x", 0);
    let outcome = engine.find_usages(&declaration, None);
    assert!(outcome.success);
    assert_eq!(outcome.usages.len(), 3);
    assert!(outcome.message.contains("3"));

    // Scope filtering keeps only usages inside the given scope path.
    let scoped = engine.find_usages(&declaration, Some("global"));
    assert_eq!(scoped.usages.len(), 3);
    let none = engine.find_usages(&declaration, Some("global.block"));
    assert_eq!(none.usages.len(), 0);
}

#[test]
fn extract_variable_inside_a_block() {
    let mut engine = script_engine();
    let result = engine.parse(b"{ y = 1 + 2; }", None);
    assert!(result.success, "{:?}", result.errors);
    let tree = result.tree.as_ref().unwrap();

    let number = leaf_location(tree, "1", 0);
    let outcome = engine.extract_variable(&number, "tmp");
    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(outcome.changes.len(), 2);
    assert_eq!(outcome.changes[0].kind, ChangeKind::Insert);
    assert!(outcome.changes[0].new_text.contains("tmp = 1;"));
    assert_eq!(outcome.changes[1].kind, ChangeKind::Replace);
    assert_eq!(outcome.changes[1].new_text, "tmp");
}

#[test]
fn extract_variable_requires_an_applicable_context() {
    let mut engine = script_engine();
    let result = engine.parse(b"y = 1 + 2;", None);
    let tree = result.tree.as_ref().unwrap();
    let number = leaf_location(tree, "1", 0);
    let outcome = engine.extract_variable(&number, "tmp");
    assert!(!outcome.success);
    assert!(outcome.message.contains("context"));
}

#[test]
fn inline_variable_replaces_references_and_deletes_the_declaration() {
    let mut engine = script_engine();
    let result = engine.parse(b"x = 1; y = x + 2;", None);
    assert!(result.success, "{:?}", result.errors);
    let tree = result.tree.as_ref().unwrap();

    let declaration = leaf_location(tree, "x", 0);
    let outcome = engine.inline_variable(&declaration);
    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(outcome.changes.len(), 2);
    assert_eq!(outcome.changes[0].kind, ChangeKind::Delete);
    assert_eq!(outcome.changes[0].original_text, "x=1;");
    assert_eq!(outcome.changes[1].kind, ChangeKind::Replace);
    assert_eq!(outcome.changes[1].new_text, "1");
}

#[test]
fn applicable_refactorings_reflect_the_node() {
    let mut engine = script_engine();
    let result = engine.parse(b"{ x = 1; y = x; }", None);
    let tree = result.tree.as_ref().unwrap();

    let declaration = leaf_location(tree, "x", 0);
    let applicable = engine.get_applicable_refactorings(&declaration);
    assert!(applicable.contains(&"find_usages".to_string()));
    assert!(applicable.contains(&"rename".to_string()));
    assert!(applicable.contains(&"inline_variable".to_string()));
    assert!(applicable.contains(&"extract_variable".to_string()));
}

#[test]
fn operations_without_a_tree_are_not_available() {
    let engine = script_engine();
    let somewhere = CodeLocation::new(
        std::rc::Rc::from("test.src"),
        crate::Position::new(1, 1),
        crate::Position::new(1, 2),
        (0, 1),
        "global".to_string(),
    );
    let outcome = engine.rename(&somewhere, "y");
    assert!(!outcome.success);
    assert_eq!(outcome.message, "operation not available");
}

#[test]
fn missing_operations_answer_not_available() {
    let mut engine = script_engine();
    let result = engine.parse(b"x = 1;", None);
    let declaration = leaf_location(result.tree.as_ref().unwrap(), "x", 0);

    let unknown = engine.run_refactoring("organize_imports", &declaration, None);
    assert!(!unknown.success);
    assert_eq!(unknown.message, "operation not available");

    engine.refactorings().unregister("rename");
    let disabled = engine.rename(&declaration, "y");
    assert!(!disabled.success);
    assert_eq!(disabled.message, "operation not available");
}

#[test]
fn changes_stay_within_the_source() {
    let mut engine = script_engine();
    let source = b"x = 1; y = x;";
    let result = engine.parse(source, None);
    let declaration = leaf_location(result.tree.as_ref().unwrap(), "x", 0);
    let outcome = engine.rename(&declaration, "renamed");
    assert!(outcome.success);
    for change in &outcome.changes {
        assert!(change.location.span.1 <= source.len());
    }
}

#[test]
fn engine_without_state_lists_no_refactorings() {
    let engine = Engine::new();
    let somewhere = CodeLocation::new(
        std::rc::Rc::from("test.src"),
        crate::Position::new(1, 1),
        crate::Position::new(1, 2),
        (0, 1),
        "global".to_string(),
    );
    assert!(engine.get_applicable_refactorings(&somewhere).is_empty());
}
