use super::{LexerPath, StepToken, StreamLexer, TokenRule};
use crate::util::{Code, CodeLocation, Log};
use crate::{ParseError, ParseErrorKind};
use once_cell::unsync::OnceCell;
use std::collections::HashSet;
use std::rc::Rc;

/// Upper bound on simultaneously live paths. Merging usually keeps the set
/// small; the cap guards against pathological rule overlap.
const MAX_LIVE_PATHS: usize = 64;

impl StreamLexer {
    pub fn new(rules: Vec<Rc<TokenRule>>) -> Self {
        let mut rules = rules;
        // Stable sort keeps grammar declaration order within one priority level.
        rules.sort_by_key(|rule| std::cmp::Reverse(rule.priority));
        Self {
            rules,
            debug: OnceCell::new(),
        }
    }

    pub fn set_log(&self, log_label: Log<&'static str>) -> Result<(), String> {
        self.debug
            .set(log_label)
            .map_err(|err| format!("Log label {} is already assigned.", err))
    }

    pub fn rules(&self) -> &[Rc<TokenRule>] {
        &self.rules
    }

    /// Tokenize the code, returning every completed path.
    ///
    /// A path completes when its position reaches the end of input. The result
    /// preserves fork order, so the first path is the highest priority reading.
    pub fn tokenize(
        &self,
        code: &Code,
        file: &Rc<str>,
    ) -> Result<Vec<LexerPath>, ParseError> {
        let mut live = vec![LexerPath::new(0)];
        let mut completed: Vec<LexerPath> = Vec::new();
        let mut next_id: usize = 1;
        let mut furthest_failure: usize = 0;

        #[cfg(debug_assertions)]
        let debug = self.debug.get().map_or(Log::None, |s| *s);

        if code.is_empty() {
            return Ok(live);
        }

        while !live.is_empty() {
            let mut stepped: Vec<LexerPath> = Vec::new();
            for mut path in live.drain(..) {
                let matches: Vec<(Rc<TokenRule>, usize)> = self
                    .rules
                    .iter()
                    .filter(|rule| Self::rule_applies(rule, &path))
                    .filter_map(|rule| {
                        rule.match_at(code, path.position)
                            .map(|length| (rule.clone(), length))
                    })
                    .collect();

                match matches.len() {
                    0 => {
                        furthest_failure = std::cmp::max(furthest_failure, path.position);
                        path.valid = false;
                        #[cfg(debug_assertions)]
                        if debug.order() >= Log::Result(()).order() {
                            println!(
                                "[{}; LexPathDied]: path {} at {}",
                                debug,
                                path.id,
                                code.obtain_position(path.position)
                            );
                        }
                    }
                    1 => {
                        Self::consume(&mut path, &matches[0].0, matches[0].1, code, file);
                        stepped.push(path);
                    }
                    _ => {
                        #[cfg(debug_assertions)]
                        if debug.order() >= Log::Verbose(()).order() {
                            println!(
                                "[{}; LexFork]: path {} splits {} ways at {}",
                                debug,
                                path.id,
                                matches.len(),
                                code.obtain_position(path.position)
                            );
                        }
                        for (rule, length) in matches.iter().skip(1) {
                            let mut forked = path.fork(next_id);
                            next_id += 1;
                            Self::consume(&mut forked, rule, *length, code, file);
                            stepped.push(forked);
                        }
                        // The highest priority match continues under the original id.
                        Self::consume(&mut path, &matches[0].0, matches[0].1, code, file);
                        stepped.insert(stepped.len() - (matches.len() - 1), path);
                    }
                }
            }

            // Collapse paths which agree on position, context and kind sequence.
            let mut seen = HashSet::new();
            for path in stepped {
                if !seen.insert(path.merge_key()) {
                    continue;
                }
                if path.position >= code.len() {
                    completed.push(path);
                } else {
                    live.push(path);
                }
            }
            live.truncate(MAX_LIVE_PATHS);
        }

        if completed.is_empty() {
            let position = code.obtain_position(furthest_failure);
            return Err(ParseError::new(
                ParseErrorKind::Lex,
                furthest_failure,
                format!("No token rule matches at {}.", position),
            ));
        }

        #[cfg(debug_assertions)]
        if debug.order() >= Log::Success(()).order() {
            println!(
                "[{}; Tokenization success]: {} completed path(s)",
                debug,
                completed.len()
            );
        }
        Ok(completed)
    }

    fn rule_applies(rule: &TokenRule, path: &LexerPath) -> bool {
        match &rule.context {
            None => true,
            Some(filter) => {
                filter == path.current_context() || path.context_stack.contains(filter)
            }
        }
    }

    fn consume(path: &mut LexerPath, rule: &TokenRule, length: usize, code: &Code, file: &Rc<str>) {
        let start = path.position;
        let end = start + length;
        if !rule.skip {
            let context = path.current_context().to_string();
            let location = CodeLocation::from_span(code, file, start, end, &context);
            let mut token = StepToken::new(rule.token_kind(), code.text(start, end), location, &context);
            attach_split_hints(&mut token, code, file, start, &context);
            path.tokens.push(token);
        }
        path.apply_rule_action(rule);
        path.position = end;
    }
}

impl LexerPath {
    fn apply_rule_action(&mut self, rule: &TokenRule) {
        use crate::grammar::RuleAction;
        match &rule.action {
            Some(RuleAction::PushContext(tag)) => self.context_stack.push(tag, None),
            Some(RuleAction::PopContext) => {
                self.context_stack.pop();
            }
            // Skip and Rename are folded into the rule itself; symbol and user
            // actions only fire during parsing.
            _ => {}
        }
    }
}

/// Mark a token splittable when its literal embeds the ambiguous `\x{...}`
/// sequence and precompute one alternative token per occurrence.
fn attach_split_hints(
    token: &mut StepToken,
    code: &Code,
    file: &Rc<str>,
    token_start: usize,
    context: &str,
) {
    let bytes = token.value.as_bytes();
    let mut index = 0;
    while index + 3 < bytes.len() {
        if &bytes[index..index + 3] == b"\\x{" {
            if let Some(close) = bytes[index + 3..].iter().position(|b| *b == b'}') {
                let occurrence_start = token_start + index;
                let occurrence_end = token_start + index + 3 + close + 1;
                let location =
                    CodeLocation::from_span(code, file, occurrence_start, occurrence_end, context);
                token.split_tokens.push(StepToken::new(
                    &token.kind,
                    code.text(occurrence_start, occurrence_end),
                    location,
                    context,
                ));
                index += 3 + close + 1;
                continue;
            }
        }
        index += 1;
    }
    token.is_splittable = !token.split_tokens.is_empty();
}
