use super::{RulePattern, TokenRule};
use crate::grammar::RuleAction;
use crate::scanner::PatternScanner;
use crate::util::Code;
use std::fmt::{Display, Formatter};

impl TokenRule {
    /// Create a rule from its grammar text pattern.
    ///
    /// `"..."` and `'...'` patterns match their quoted bytes literally; `/.../`
    /// patterns run through both scanner phases and compile to an anchored regex.
    /// A bare word is treated as a literal of its own characters.
    pub fn new(name: &str, pattern: &str, scanner: &PatternScanner) -> Result<Self, String> {
        let pattern = pattern.trim();
        let matcher = if (pattern.starts_with('"') && pattern.ends_with('"') && pattern.len() >= 2)
            || (pattern.starts_with('\'') && pattern.ends_with('\'') && pattern.len() >= 2)
        {
            let body = &pattern[1..pattern.len() - 1];
            if body.is_empty() {
                return Err(format!("Literal pattern for rule '{}' is empty.", name));
            }
            RulePattern::Literal(body.as_bytes().to_vec())
        } else if pattern.starts_with('/') && pattern.ends_with('/') && pattern.len() >= 3 {
            let body = &pattern[1..pattern.len() - 1];
            let regexp = scanner
                .compile(body)
                .map_err(|err| format!("Rule '{}': {}", name, err))?;
            RulePattern::Regex {
                source: body.to_string(),
                regexp,
            }
        } else if !pattern.is_empty() {
            RulePattern::Literal(pattern.as_bytes().to_vec())
        } else {
            return Err(format!("Rule '{}' has an empty pattern.", name));
        };

        Ok(Self {
            name: name.to_string(),
            pattern: matcher,
            context: None,
            priority: 0,
            skip: false,
            action: None,
        })
    }

    pub fn with_context(mut self, context: &str) -> Self {
        if !context.is_empty() {
            self.context = Some(context.to_string());
        }
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn skippable(mut self) -> Self {
        self.skip = true;
        self
    }

    pub fn with_action(mut self, action: RuleAction) -> Self {
        if let RuleAction::Skip = action {
            self.skip = true;
        } else {
            self.action = Some(action);
        }
        self
    }

    /// The emitted token kind: the rule name unless a rename action overrides it.
    pub fn token_kind(&self) -> &str {
        match &self.action {
            Some(RuleAction::Rename(kind)) => kind,
            _ => &self.name,
        }
    }

    /// Match length at a byte position, or None.
    pub fn match_at(&self, code: &Code, pointer: usize) -> Option<usize> {
        match &self.pattern {
            RulePattern::Literal(bytes) => {
                if code.slice(pointer, pointer + bytes.len()) == bytes.as_slice() {
                    Some(bytes.len())
                } else {
                    None
                }
            }
            RulePattern::Regex { regexp, .. } => {
                let found = regexp.find(&code.value[pointer..])?;
                debug_assert_eq!(found.start(), 0);
                if found.end() > 0 {
                    Some(found.end())
                } else {
                    None
                }
            }
        }
    }
}

impl Display for TokenRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.pattern {
            RulePattern::Literal(bytes) => write!(
                f,
                "{} : '{}'",
                self.name,
                String::from_utf8_lossy(bytes)
            ),
            RulePattern::Regex { source, .. } => {
                write!(f, "{} : /{}/", self.name, source.replace('/', "\\/"))
            }
        }
    }
}
