use super::{SymbolInfo, SymbolReference, SymbolTable, SymbolUsage};
use crate::util::CodeLocation;

impl SymbolInfo {
    pub fn new(name: &str, symbol_type: &str, scope_path: &str, declaration: CodeLocation) -> Self {
        Self {
            name: name.to_string(),
            symbol_type: symbol_type.to_string(),
            scope_path: scope_path.to_string(),
            declaration,
            can_inline: false,
            value: None,
            references: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn inlineable(mut self) -> Self {
        self.can_inline = true;
        self
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a symbol under its scope path. A redeclaration in the same scope
    /// replaces the earlier entry; declarations in deeper scopes shadow outer
    /// ones through [lookup](SymbolTable::lookup).
    pub fn declare(&mut self, symbol: SymbolInfo) {
        self.symbols
            .insert((symbol.scope_path.clone(), symbol.name.clone()), symbol);
    }

    /// Resolve a name from a scope, walking up through dotted parents.
    /// The first match wins.
    pub fn lookup(&self, name: &str, scope: &str) -> Option<&SymbolInfo> {
        let mut current = scope;
        loop {
            if let Some(symbol) = self
                .symbols
                .get(&(current.to_string(), name.to_string()))
            {
                return Some(symbol);
            }
            match current.rfind('.') {
                Some(dot) => current = &current[..dot],
                None => return None,
            }
        }
    }

    /// Record a reference against the symbol the name resolves to from `scope`.
    /// Returns false when the name does not resolve.
    pub fn add_reference(
        &mut self,
        name: &str,
        scope: &str,
        location: CodeLocation,
        usage: SymbolUsage,
    ) -> bool {
        let owning_scope = match self.lookup(name, scope) {
            Some(symbol) => symbol.scope_path.clone(),
            None => return false,
        };
        if let Some(symbol) = self
            .symbols
            .get_mut(&(owning_scope, name.to_string()))
        {
            symbol.references.push(SymbolReference { location, usage });
            return true;
        }
        false
    }

    /// Every reference recorded for the name, across all scopes, in declaration
    /// scope order.
    pub fn find_all_references(&self, name: &str) -> Vec<&SymbolReference> {
        let mut owners: Vec<&SymbolInfo> = self
            .symbols
            .values()
            .filter(|symbol| symbol.name == name)
            .collect();
        owners.sort_by(|a, b| a.scope_path.cmp(&b.scope_path));
        owners
            .into_iter()
            .flat_map(|symbol| symbol.references.iter())
            .collect()
    }

    pub fn get(&self, name: &str, scope: &str) -> Option<&SymbolInfo> {
        self.symbols.get(&(scope.to_string(), name.to_string()))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &SymbolInfo> {
        self.symbols.values()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
