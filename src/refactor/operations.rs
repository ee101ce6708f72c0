use super::{normalize_changes, CodeChange, NodeIndex, RefactoringResult};
use crate::symbol::SymbolTable;
use crate::util::CodeLocation;
use crate::ParseNode;

/// Contexts in which extract variable is applicable.
const EXTRACT_CONTEXTS: &[&str] = &["function", "method", "block"];

/// A borrowed view of everything the operations work against: the winning tree,
/// the committed symbol overlay and the interval index built from the tree.
pub struct RefactoringContext<'a> {
    pub tree: &'a ParseNode,
    pub symbols: &'a SymbolTable,
    pub index: &'a NodeIndex,
}

impl<'a> RefactoringContext<'a> {
    /// Resolve a location to the innermost covered node.
    fn resolve_node(&self, location: &CodeLocation) -> Option<&'a ParseNode> {
        let (found, _, _) = self.index.resolve(location)?;
        self.tree.node_at(found.span.0)
    }

    /// The symbol name at a location: the covered token's literal value.
    fn symbol_name_at(&self, location: &CodeLocation) -> Option<(&'a ParseNode, String)> {
        let node = self.resolve_node(location)?;
        let leaf = node.first_leaf()?;
        let token = leaf.token.as_ref()?;
        Some((node, token.value.clone()))
    }

    /// Every usage site of a name: symbol table references when the symbol was
    /// declared, otherwise every matching terminal leaf of the tree.
    fn usage_sites(&self, name: &str, scope: &str) -> Vec<CodeLocation> {
        if self.symbols.lookup(name, scope).is_some() {
            return self
                .symbols
                .find_all_references(name)
                .into_iter()
                .map(|reference| reference.location.clone())
                .collect();
        }
        self.tree
            .list_tree(&|candidate| {
                candidate
                    .token
                    .as_ref()
                    .map_or(false, |token| token.value == name)
            })
            .into_iter()
            .map(|leaf| leaf.location.clone())
            .collect()
    }

    fn ancestors_of(&self, span: (usize, usize)) -> Vec<&'a ParseNode> {
        let mut chain = Vec::new();
        let mut node = self.tree;
        loop {
            chain.push(node);
            match node
                .children
                .iter()
                .find(|child| child.span.0 <= span.0 && span.1 <= child.span.1)
            {
                Some(child) => node = child,
                None => break,
            }
        }
        chain
    }
}

pub fn find_usages(
    ctx: &RefactoringContext,
    location: &CodeLocation,
    scope: Option<&str>,
) -> RefactoringResult {
    let (node, name) = match ctx.symbol_name_at(location) {
        Some(resolved) => resolved,
        None => return RefactoringResult::failure("No node at the given location."),
    };
    let mut usages = ctx.usage_sites(&name, &node.location.context);
    if let Some(scope) = scope {
        usages.retain(|usage| {
            usage.context == scope || usage.context.starts_with(&format!("{}.", scope))
        });
    }
    let mut result = RefactoringResult::applied(
        format!("Found {} usage(s) of '{}'.", usages.len(), name),
        Vec::new(),
        node.location.clone(),
    );
    result.usages = usages;
    result
}

pub fn rename(
    ctx: &RefactoringContext,
    location: &CodeLocation,
    new_name: &str,
) -> RefactoringResult {
    if !is_identifier(new_name) {
        return RefactoringResult::failure(&format!("Invalid new name '{}'.", new_name));
    }
    let (node, name) = match ctx.symbol_name_at(location) {
        Some(resolved) => resolved,
        None => return RefactoringResult::failure("No node at the given location."),
    };

    let mut sites: Vec<CodeLocation> = Vec::new();
    match ctx.symbols.lookup(&name, &node.location.context) {
        Some(symbol) => {
            sites.push(symbol.declaration.clone());
            sites.extend(
                symbol
                    .references
                    .iter()
                    .map(|reference| reference.location.clone()),
            );
        }
        None => sites = ctx.usage_sites(&name, &node.location.context),
    }
    if sites.is_empty() {
        return RefactoringResult::failure(&format!("No occurrences of '{}' found.", name));
    }

    let changes = normalize_changes(
        sites
            .into_iter()
            .map(|site| CodeChange::replace(site, &name, new_name))
            .collect(),
    );
    RefactoringResult::applied(
        format!(
            "Renamed '{}' to '{}' in {} location(s).",
            name,
            new_name,
            changes.len()
        ),
        changes,
        node.location.clone(),
    )
}

pub fn extract_variable(
    ctx: &RefactoringContext,
    location: &CodeLocation,
    var_name: &str,
) -> RefactoringResult {
    if !is_identifier(var_name) {
        return RefactoringResult::failure(&format!("Invalid variable name '{}'.", var_name));
    }
    let node = match ctx.resolve_node(location) {
        Some(node) => node,
        None => return RefactoringResult::failure("No node at the given location."),
    };
    // Climb to the nearest expression shaped node covering the location.
    let expression = ctx
        .ancestors_of(node.span)
        .into_iter()
        .rev()
        .find(|candidate| {
            !candidate.is_terminal() && candidate.rule.to_lowercase().contains("expr")
        });
    let expression = match expression {
        Some(expression) => expression,
        None => {
            return RefactoringResult::failure("No expression at the given location.");
        }
    };
    if !in_extract_context(&expression.location.context) {
        return RefactoringResult::failure(&format!(
            "Extract variable is not applicable in context '{}'.",
            expression.location.context
        ));
    }

    let ancestors = ctx.ancestors_of(expression.span);
    let statement = ancestors
        .iter()
        .rev()
        .find(|candidate| {
            let rule = candidate.rule.to_lowercase();
            rule.contains("stmt") || rule.contains("statement")
        })
        .copied()
        .or_else(|| ancestors.get(1).copied())
        .unwrap_or(ctx.tree);

    let original = expression.text();
    let insertion = CodeLocation::new(
        statement.location.file.clone(),
        statement.location.start,
        statement.location.start,
        (statement.span.0, statement.span.0),
        statement.location.context.clone(),
    );
    let changes = normalize_changes(vec![
        CodeChange::insert(insertion, &format!("{} = {}; ", var_name, original)),
        CodeChange::replace(expression.location.clone(), &original, var_name),
    ]);
    RefactoringResult::applied(
        format!("Extracted expression into '{}'.", var_name),
        changes,
        expression.location.clone(),
    )
}

pub fn inline_variable(ctx: &RefactoringContext, location: &CodeLocation) -> RefactoringResult {
    let (node, name) = match ctx.symbol_name_at(location) {
        Some(resolved) => resolved,
        None => return RefactoringResult::failure("No node at the given location."),
    };
    let symbol = match ctx.symbols.lookup(&name, &node.location.context) {
        Some(symbol) => symbol,
        None => return RefactoringResult::failure(&format!("Unknown symbol '{}'.", name)),
    };
    let value = match (&symbol.value, symbol.can_inline) {
        (Some(value), true) => value.clone(),
        _ => {
            return RefactoringResult::failure(&format!("Symbol '{}' cannot be inlined.", name));
        }
    };

    let mut changes: Vec<CodeChange> = Vec::new();
    let declaration_node = ctx
        .ancestors_of(symbol.declaration.span)
        .into_iter()
        .rev()
        .find(|candidate| !candidate.is_terminal())
        .unwrap_or(ctx.tree);
    changes.push(CodeChange::delete(
        declaration_node.location.clone(),
        &declaration_node.text(),
    ));
    for reference in &symbol.references {
        changes.push(CodeChange::replace(
            reference.location.clone(),
            &name,
            &value,
        ));
    }
    let replace_count = symbol.references.len();
    let changes = normalize_changes(changes);
    RefactoringResult::applied(
        format!("Inlined '{}' in {} location(s).", name, replace_count),
        changes,
        node.location.clone(),
    )
}

/// Operation names applicable at a location, for tooling menus.
pub fn applicable_refactorings(ctx: &RefactoringContext, location: &CodeLocation) -> Vec<String> {
    let mut applicable = Vec::new();
    let (node, name) = match ctx.symbol_name_at(location) {
        Some(resolved) => resolved,
        None => return applicable,
    };
    applicable.push("find_usages".to_string());
    applicable.push("rename".to_string());
    if let Some(symbol) = ctx.symbols.lookup(&name, &node.location.context) {
        if symbol.can_inline && symbol.value.is_some() {
            applicable.push("inline_variable".to_string());
        }
    }
    if in_extract_context(&node.location.context) {
        applicable.push("extract_variable".to_string());
    }
    applicable
}

fn in_extract_context(context_path: &str) -> bool {
    context_path
        .split('.')
        .any(|segment| EXTRACT_CONTEXTS.contains(&segment))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
