use crate::lexer::StepToken;
use crate::util::CodeLocation;
use crate::ParseNode;
use ptree::TreeItem;
use std::fmt::{Debug, Display, Formatter};

impl Display for ParseNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let children_string = self.children.iter().map(|c| format!("{}", c));
        f.debug_struct("")
            .field("value", &(&self.rule, &self.span.0, &self.span.1))
            .field("children", &children_string)
            .finish()
    }
}
impl Debug for ParseNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut debug_struct = f.debug_struct("ParseNode");
        debug_struct
            .field("rule", &self.rule)
            .field("start", &self.span.0)
            .field("end", &self.span.1);
        if let Some(token) = &self.token {
            debug_struct.field("token", &token.value);
        }
        if !self.children.is_empty() {
            debug_struct.field("children", &self.children);
        }
        debug_struct.finish()
    }
}

impl ParseNode {
    /// Create a parent node over ordered children. The parent span encloses the
    /// full span of its children.
    pub fn new(rule: &str, children: Vec<ParseNode>, location: CodeLocation) -> Self {
        let span = match (children.first(), children.last()) {
            (Some(first), Some(last)) => (first.span.0, last.span.1),
            _ => location.span,
        };
        Self {
            rule: rule.to_string(),
            token: None,
            children,
            span,
            location,
            value: None,
        }
    }

    /// Create a terminal leaf from its token.
    pub fn leaf(token: StepToken, location: CodeLocation) -> Self {
        Self {
            rule: token.kind.clone(),
            span: token.location.span,
            token: Some(token),
            children: Vec::with_capacity(0),
            location,
            value: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.token.is_some()
    }

    /// Concatenated literal values of the terminal leaves, in order.
    pub fn text(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, text: &mut String) {
        match &self.token {
            Some(token) => text.push_str(&token.value),
            None => {
                for child in &self.children {
                    child.collect_text(text);
                }
            }
        }
    }

    /// The first terminal leaf of the subtree, in order.
    pub fn first_leaf(&self) -> Option<&ParseNode> {
        if self.token.is_some() {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.first_leaf())
    }

    /// Find a nested node for a given rule name searching through all children.
    pub fn find_tree_with_rule(&self, rule: &str) -> Option<&ParseNode> {
        if self.rule == rule {
            Some(self)
        } else {
            self.children
                .iter()
                .find_map(|child| child.find_tree_with_rule(rule))
        }
    }

    /// Search through all nested children and return the first match.
    pub fn find_tree<TF: Fn(&ParseNode) -> bool>(&self, p: &TF) -> Option<&ParseNode> {
        if p(self) {
            Some(self)
        } else {
            self.children.iter().find_map(|child| child.find_tree(p))
        }
    }

    /// Return all matching nodes in walk order.
    pub fn list_tree<'this, TF: Fn(&ParseNode) -> bool>(&'this self, p: &TF) -> Vec<&'this ParseNode> {
        let mut list_tree: Vec<&'this ParseNode> = Vec::new();
        self.walk_tree(&mut list_tree, &|tree, list| {
            if p(tree) {
                list.push(tree);
            }
        });
        list_tree
    }

    pub fn get_child(&self, rule: &str) -> Option<&ParseNode> {
        self.children.iter().find(|child| child.rule == rule)
    }

    pub fn contains(&self, rule: &str) -> bool {
        self.rule == rule || self.children.iter().any(|child| child.contains(rule))
    }

    /// The innermost node whose byte span covers the pointer.
    pub fn node_at(&self, pointer: usize) -> Option<&ParseNode> {
        if pointer < self.span.0 || pointer >= self.span.1 {
            return None;
        }
        self.children
            .iter()
            .find_map(|child| child.node_at(pointer))
            .or(Some(self))
    }

    fn walk_tree<'this, TR, TF: Fn(&'this Self, &mut TR)>(&'this self, r: &mut TR, p: &TF) {
        p(self, r);
        self.children.iter().for_each(|child| child.walk_tree(r, p));
    }
}

impl TreeItem for ParseNode {
    type Child = Self;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        match &self.token {
            Some(token) => write!(
                f,
                "{} '{}' # {}-{}",
                self.rule, token.value, self.span.0, self.span.1
            ),
            None => write!(f, "{} # {}-{}", self.rule, self.span.0, self.span.1),
        }
    }

    fn children(&self) -> std::borrow::Cow<[Self::Child]> {
        std::borrow::Cow::from(&self.children)
    }
}

impl ParseNode {
    pub fn print(&self) -> Result<(), std::io::Error> {
        ptree::print_tree(self)
    }
}
