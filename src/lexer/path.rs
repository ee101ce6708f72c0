use super::{LexerPath, StepToken};
use crate::symbol::ContextStack;
use crate::util::CodeLocation;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

impl StepToken {
    pub fn new(kind: &str, value: &str, location: CodeLocation, context: &str) -> Self {
        Self {
            kind: kind.to_string(),
            value: value.to_string(),
            location,
            context: context.to_string(),
            is_splittable: false,
            split_tokens: Vec::with_capacity(0),
        }
    }

    pub fn len_bytes(&self) -> usize {
        self.value.len()
    }
}

impl Display for StepToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}('{}') at {}", self.kind, self.value, self.location)
    }
}

impl LexerPath {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            position: 0,
            tokens: Vec::new(),
            context_stack: ContextStack::new(),
            valid: true,
            state: HashMap::new(),
        }
    }

    /// Fork the path: deep copy of tokens, context and state under a fresh id.
    pub fn fork(&self, fresh_id: usize) -> Self {
        Self {
            id: fresh_id,
            position: self.position,
            tokens: self.tokens.clone(),
            context_stack: self.context_stack.clone(),
            valid: self.valid,
            state: self.state.clone(),
        }
    }

    pub fn current_context(&self) -> &str {
        self.context_stack.current()
    }

    /// The merge key collapsing equivalent paths: same position, same context and
    /// the same emitted kind sequence.
    pub fn merge_key(&self) -> (usize, String, u64) {
        let mut hasher = DefaultHasher::new();
        for token in &self.tokens {
            token.kind.hash(&mut hasher);
        }
        (
            self.position,
            self.current_context().to_string(),
            hasher.finish(),
        )
    }
}
