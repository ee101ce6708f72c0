//! Location based queries and edits over the winning parse tree.
//!
//! Every operation resolves a [CodeLocation] to a parse node through the
//! [NodeIndex], a per file sorted span list built once per parse so point
//! queries stay O(log n). Operations never mutate the source; they return an
//! ordered, non overlapping list of [CodeChange]s the caller applies (in
//! reverse file order for a consistent edit). The registry tolerates unknown
//! operation names and reports them as unavailable instead of failing.

mod index;
mod operations;

#[cfg(test)]
mod __tests__;

use crate::util::CodeLocation;

pub use operations::{
    applicable_refactorings, extract_variable, find_usages, inline_variable, rename,
    RefactoringContext,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The three edit primitives a refactoring can produce.
pub enum ChangeKind {
    Replace,
    Insert,
    Delete,
}

#[derive(Debug, Clone)]
/// An atomic located textual edit.
pub struct CodeChange {
    pub kind: ChangeKind,
    pub location: CodeLocation,
    pub original_text: String,
    pub new_text: String,
}

#[derive(Debug, Clone)]
/// The outcome of a refactoring operation. Changes are sorted by location and
/// never overlap; `location` is the modified node's location when available.
pub struct RefactoringResult {
    pub success: bool,
    pub message: String,
    pub changes: Vec<CodeChange>,
    pub location: Option<CodeLocation>,
    /// Reference locations reported by query shaped operations (find usages).
    pub usages: Vec<CodeLocation>,
}

#[derive(Debug, Clone)]
struct IndexEntry {
    start: usize,
    end: usize,
    location: CodeLocation,
    rule: String,
    terminal: bool,
}

#[derive(Debug, Clone, Default)]
/// A sorted span list over one parsed file. Parents sort before their children,
/// so the innermost covering node is the last containing entry.
pub struct NodeIndex {
    entries: Vec<IndexEntry>,
}

/// Names of the operations the engine dispatches. Missing names resolve to the
/// standard unavailable answer rather than an error.
#[derive(Debug, Clone)]
pub struct RefactoringRegistry {
    operations: Vec<String>,
}

impl CodeChange {
    pub fn replace(location: CodeLocation, original_text: &str, new_text: &str) -> Self {
        Self {
            kind: ChangeKind::Replace,
            location,
            original_text: original_text.to_string(),
            new_text: new_text.to_string(),
        }
    }

    pub fn insert(location: CodeLocation, new_text: &str) -> Self {
        Self {
            kind: ChangeKind::Insert,
            location,
            original_text: String::new(),
            new_text: new_text.to_string(),
        }
    }

    pub fn delete(location: CodeLocation, original_text: &str) -> Self {
        Self {
            kind: ChangeKind::Delete,
            location,
            original_text: original_text.to_string(),
            new_text: String::new(),
        }
    }
}

impl RefactoringResult {
    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            changes: Vec::new(),
            location: None,
            usages: Vec::new(),
        }
    }

    /// The standard answer for a missing operation or an engine without a tree.
    pub fn not_available() -> Self {
        Self::failure("operation not available")
    }

    pub fn applied(message: String, changes: Vec<CodeChange>, location: CodeLocation) -> Self {
        Self {
            success: true,
            message,
            changes,
            location: Some(location),
            usages: Vec::new(),
        }
    }
}

impl Default for RefactoringRegistry {
    fn default() -> Self {
        Self {
            operations: vec![
                "find_usages".to_string(),
                "rename".to_string(),
                "extract_variable".to_string(),
                "inline_variable".to_string(),
            ],
        }
    }
}

impl RefactoringRegistry {
    pub fn contains(&self, name: &str) -> bool {
        self.operations.iter().any(|op| op == name)
    }

    pub fn register(&mut self, name: &str) {
        if !self.contains(name) {
            self.operations.push(name.to_string());
        }
    }

    pub fn unregister(&mut self, name: &str) {
        self.operations.retain(|op| op != name);
    }

    pub fn names(&self) -> &[String] {
        &self.operations
    }
}

/// Sort changes by file position and drop later entries whose spans collide,
/// keeping the result non overlapping.
pub fn normalize_changes(mut changes: Vec<CodeChange>) -> Vec<CodeChange> {
    changes.sort_by(|a, b| {
        a.location
            .file
            .cmp(&b.location.file)
            .then(a.location.span.0.cmp(&b.location.span.0))
            .then(a.location.span.1.cmp(&b.location.span.1))
    });
    let mut kept: Vec<CodeChange> = Vec::with_capacity(changes.len());
    for change in changes {
        let overlaps = kept.last().map_or(false, |previous| {
            previous.location.file == change.location.file
                && change.location.span.0 < previous.location.span.1
        });
        if !overlaps {
            kept.push(change);
        }
    }
    kept
}
