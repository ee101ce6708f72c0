use super::{ContextFrame, ContextStack};
use std::fmt::{Display, Formatter};

impl ContextFrame {
    pub fn new(tag: &str, identifier: Option<&str>) -> Self {
        Self {
            tag: tag.to_string(),
            identifier: identifier.map(|id| id.to_string()),
        }
    }
}

impl Default for ContextStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStack {
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            root: "global".to_string(),
        }
    }

    pub fn push(&mut self, tag: &str, identifier: Option<&str>) {
        self.frames.push(ContextFrame::new(tag, identifier));
    }

    pub fn pop(&mut self) -> Option<ContextFrame> {
        self.frames.pop()
    }

    /// The innermost context tag, or the root tag for an empty stack.
    pub fn current(&self) -> &str {
        self.frames.last().map_or(self.root.as_str(), |f| &f.tag)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.frames.iter().any(|frame| frame.tag == tag)
    }

    /// Whether any frame (or the root) carries the tag.
    pub fn in_scope(&self, tag: &str) -> bool {
        tag == self.root || self.contains(tag)
    }

    /// The dotted scope path from the root through every frame, outer to inner.
    /// Frames with identifiers contribute `tag.identifier`.
    pub fn path(&self) -> String {
        let mut path = self.root.clone();
        for frame in &self.frames {
            path.push('.');
            path.push_str(&frame.tag);
            if let Some(identifier) = &frame.identifier {
                path.push('.');
                path.push_str(identifier);
            }
        }
        path
    }

    /// Iterate frames from the outermost to the innermost.
    pub fn iter(&self) -> std::slice::Iter<'_, ContextFrame> {
        self.frames.iter()
    }
}

impl Display for ContextStack {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}
