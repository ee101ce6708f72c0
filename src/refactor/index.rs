use super::{IndexEntry, NodeIndex};
use crate::util::CodeLocation;
use crate::ParseNode;

impl NodeIndex {
    /// Build the index from a parse tree: one entry per node, sorted so parents
    /// precede their children.
    pub fn build(tree: &ParseNode) -> Self {
        let mut entries = Vec::new();
        collect(tree, &mut entries);
        entries.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The innermost node location covering a byte offset. Binary search to the
    /// last candidate by start, then walk back to the first containing entry.
    pub fn node_at(&self, pointer: usize) -> Option<(&CodeLocation, &str, bool)> {
        let upper = self.entries.partition_point(|entry| entry.start <= pointer);
        self.entries[..upper]
            .iter()
            .rev()
            .find(|entry| entry.end > pointer)
            .map(|entry| (&entry.location, entry.rule.as_str(), entry.terminal))
    }

    /// The innermost node covering a 1-based line/column point. Used for caller
    /// constructed locations which carry no byte span.
    pub fn node_at_point(&self, line: usize, column: usize) -> Option<(&CodeLocation, &str, bool)> {
        self.entries
            .iter()
            .filter(|entry| entry.location.contains_point(line, column))
            .min_by_key(|entry| entry.end - entry.start)
            .map(|entry| (&entry.location, entry.rule.as_str(), entry.terminal))
    }

    /// Resolve a location to the innermost covered node: by byte span when the
    /// location carries one, by line/column otherwise.
    pub fn resolve(&self, location: &CodeLocation) -> Option<(&CodeLocation, &str, bool)> {
        if location.span != (0, 0) {
            self.node_at(location.span.0)
        } else {
            self.node_at_point(location.start.line, location.start.column)
        }
    }
}

fn collect(node: &ParseNode, entries: &mut Vec<IndexEntry>) {
    entries.push(IndexEntry {
        start: node.span.0,
        end: node.span.1,
        location: node.location.clone(),
        rule: node.rule.clone(),
        terminal: node.is_terminal(),
    });
    for child in &node.children {
        collect(child, entries);
    }
}
