use super::{
    ContextProjection, GrammarDefinition, GrammarDiagnostic, GrammarLoader, ProductionRule,
    RhsSymbol, RuleAction,
};
use crate::lexer::TokenRule;
use crate::scanner::PatternScanner;
use crate::util::Log;
use once_cell::unsync::OnceCell;
use regex::Regex;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

impl GrammarLoader {
    pub fn new(scanner: Rc<PatternScanner>) -> Self {
        Self {
            scanner,
            cache: RefCell::new(HashMap::new()),
            loading: RefCell::new(HashSet::new()),
            debug: OnceCell::new(),
            lhs_shape: Regex::new(
                r"^<?\s*([A-Za-z_]\w*)\s*(?:\(\s*([A-Za-z_]\w*)?\s*(?:,\s*priority\s*:\s*(-?\d+))?\s*\))?\s*>?$",
            )
            .expect("left hand side shape is a valid expression"),
            level_shape: Regex::new(r"Level(\d+)\s*:\s*\{([^{}]*)\}")
                .expect("precedence level shape is a valid expression"),
            projection_shape: Regex::new(
                r"^@context\(([^)]*)\)\s*@projection\(([^)]*)\)\s*(\S+)\s*=>\s*\{(.*)\}\s*$",
            )
            .expect("projection shape is a valid expression"),
        }
    }

    pub fn scanner(&self) -> &Rc<PatternScanner> {
        &self.scanner
    }

    pub fn set_log(&self, log_label: Log<&'static str>) -> Result<(), String> {
        self.debug
            .set(log_label)
            .map_err(|err| format!("Log label {} is already assigned.", err))
    }

    /// Load a grammar from a file path or inline text. Anything containing a
    /// rule arrow or a line break is treated as text.
    pub fn load(&self, path_or_text: &str) -> Result<Rc<GrammarDefinition>, String> {
        if path_or_text.contains("::=") || path_or_text.contains('\n') {
            Ok(self.load_text(path_or_text))
        } else {
            self.load_path(path_or_text)
        }
    }

    /// Load and cache a grammar file.
    pub fn load_path(&self, path: &str) -> Result<Rc<GrammarDefinition>, String> {
        if let Some(cached) = self.cache.borrow().get(path) {
            return Ok(cached.clone());
        }
        // Cyclic imports resolve to an error instead of recursing forever.
        if !self.loading.borrow_mut().insert(path.to_string()) {
            return Err(format!("Cyclic grammar import '{}'.", path));
        }
        let loaded = std::fs::read_to_string(path)
            .map_err(|err| format!("Failed to read grammar '{}': {}", path, err))
            .map(|text| self.load_text(&text));
        self.loading.borrow_mut().remove(path);
        let grammar = loaded?;
        self.cache
            .borrow_mut()
            .insert(path.to_string(), grammar.clone());
        Ok(grammar)
    }

    /// Parse grammar text, resolve inheritance and validate symbol references.
    /// Malformed lines are collected as diagnostics on the returned grammar.
    pub fn load_text(&self, text: &str) -> Rc<GrammarDefinition> {
        let mut grammar = self.parse_text(text);
        self.resolve_inheritance(&mut grammar);
        grammar.validate_references();

        #[cfg(debug_assertions)]
        if let Some(debug) = self.debug.get() {
            if debug.order() >= Log::Default(()).order() {
                println!(
                    "[{}; GrammarLoaded]: '{}' with {} token rule(s), {} production(s), {} diagnostic(s)",
                    debug,
                    grammar.name,
                    grammar.token_rules.len(),
                    grammar.productions.len(),
                    grammar.diagnostics.len()
                );
                for diagnostic in &grammar.diagnostics {
                    println!("[{}; GrammarDiagnostic]: {}", debug, diagnostic);
                }
            }
        }
        Rc::new(grammar)
    }

    fn parse_text(&self, text: &str) -> GrammarDefinition {
        let mut grammar = GrammarDefinition::empty("unnamed");
        let lines: Vec<&str> = text.lines().collect();
        let mut index = 0;

        while index < lines.len() {
            let line_no = index + 1;
            let line = lines[index].trim();
            index += 1;

            if line.is_empty() || line.starts_with("//") || line.starts_with('#') {
                continue;
            }
            if let Some(rest) = line.strip_prefix("Grammar:") {
                grammar.name = rest.trim().to_string();
                continue;
            }
            if let Some(rest) = line.strip_prefix("TokenSplitter:") {
                grammar.token_splitter = Some(rest.trim().to_string());
                continue;
            }
            if let Some(rest) = line.strip_prefix("Inherits:") {
                grammar.imports.extend(
                    rest.split(',')
                        .map(|import| import.trim().to_string())
                        .filter(|import| !import.is_empty()),
                );
                continue;
            }
            if let Some(rest) = line.strip_prefix("Inheritable:") {
                grammar.inheritable = rest.trim() == "true";
                continue;
            }
            if let Some(rest) = line.strip_prefix("FormatType:") {
                grammar.format_type = Some(rest.trim().to_string());
                continue;
            }
            if line.starts_with("Precedence:") {
                let mut block = line.to_string();
                let mut depth = brace_depth(line);
                while depth > 0 && index < lines.len() {
                    block.push(' ');
                    block.push_str(lines[index].trim());
                    depth += brace_depth(lines[index]);
                    index += 1;
                }
                self.parse_precedence(&block, line_no, &mut grammar);
                continue;
            }
            if line.starts_with('@') {
                self.parse_projection(line, line_no, &mut grammar);
                continue;
            }
            if line.contains("::=") {
                let mut logical = line.to_string();
                // Continuation lines do not open a new rule or directive.
                while index < lines.len() {
                    let next = lines[index].trim();
                    if next.is_empty()
                        || next.starts_with('<')
                        || next.starts_with('@')
                        || next.contains("::=")
                        || is_directive(next)
                    {
                        break;
                    }
                    logical.push(' ');
                    logical.push_str(next);
                    index += 1;
                }
                self.parse_rule(&logical, line_no, &mut grammar);
                continue;
            }
            if is_directive(line) {
                // Unknown directives are preserved but ignored.
                grammar.extra_directives.push(line.to_string());
                continue;
            }
            grammar.diagnostics.push(GrammarDiagnostic {
                line: line_no,
                message: format!("Malformed grammar line '{}'.", line),
            });
        }
        grammar
    }

    fn parse_rule(&self, logical: &str, line_no: usize, grammar: &mut GrammarDefinition) {
        let (lhs_text, rest) = match logical.split_once("::=") {
            Some(parts) => parts,
            None => return,
        };
        let (rhs_text, action_text) = split_action(rest);

        let captures = match self.lhs_shape.captures(lhs_text.trim()) {
            Some(captures) => captures,
            None => {
                grammar.diagnostics.push(GrammarDiagnostic {
                    line: line_no,
                    message: format!("Malformed rule head '{}'.", lhs_text.trim()),
                });
                return;
            }
        };
        let name = captures.get(1).map_or("", |m| m.as_str()).to_string();
        let context = captures.get(2).map(|m| m.as_str().to_string());
        let priority: i32 = captures
            .get(3)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0);
        if let Some(tag) = &context {
            if !grammar.contexts.contains(tag) {
                grammar.contexts.push(tag.clone());
            }
        }

        let rhs_trim = rhs_text.trim();
        let is_token_rule = rhs_trim.starts_with('/')
            || rhs_trim.starts_with('\'')
            || rhs_trim.starts_with('"')
            || (!rhs_trim.contains('<') && !rhs_trim.contains('|'));

        if is_token_rule {
            match TokenRule::new(&name, rhs_trim, &self.scanner) {
                Ok(mut rule) => {
                    if let Some(tag) = &context {
                        rule = rule.with_context(tag);
                    }
                    rule = rule.with_priority(priority);
                    if let Some(action) = parse_action(action_text) {
                        rule = rule.with_action(action);
                    }
                    grammar.token_rules.push(Rc::new(rule));
                }
                Err(message) => grammar.diagnostics.push(GrammarDiagnostic {
                    line: line_no,
                    message,
                }),
            }
            return;
        }

        let action = parse_action(action_text);
        for alternative in split_alternatives(rhs_trim) {
            let symbols = parse_symbols(&alternative);
            if symbols.is_empty() {
                grammar.diagnostics.push(GrammarDiagnostic {
                    line: line_no,
                    message: format!("Production '{}' has an empty alternative.", name),
                });
                continue;
            }
            let mut production = ProductionRule::new(&name, symbols).with_priority(priority);
            if let Some(tag) = &context {
                production = production.with_context(tag);
            }
            if let Some(action) = &action {
                production = production.with_action(action.clone());
            }
            grammar.productions.push(Rc::new(production));
        }
    }

    fn parse_precedence(&self, block: &str, line_no: usize, grammar: &mut GrammarDefinition) {
        let mut matched = false;
        for captures in self.level_shape.captures_iter(block) {
            matched = true;
            let level: i32 = captures
                .get(1)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0);
            let body = captures.get(2).map_or("", |m| m.as_str());

            let operators = extract_bracket_list(body);
            let associativity = extract_quoted_field(body, "associativity")
                .and_then(|value| parse_associativity(&value));

            for operator in operators {
                grammar.precedence.insert(operator.clone(), level);
                if let Some(assoc) = associativity {
                    grammar.associativity.insert(operator, assoc);
                }
            }
        }
        if !matched {
            grammar.diagnostics.push(GrammarDiagnostic {
                line: line_no,
                message: "Malformed precedence block.".to_string(),
            });
        }
    }

    fn parse_projection(&self, line: &str, line_no: usize, grammar: &mut GrammarDefinition) {
        match self.projection_shape.captures(line) {
            Some(captures) => {
                let context = captures.get(1).map_or("", |m| m.as_str()).trim().to_string();
                let projection = captures.get(2).map_or("", |m| m.as_str()).trim().to_string();
                let rule = captures.get(3).map_or("", |m| m.as_str()).to_string();
                let code = captures.get(4).map_or("", |m| m.as_str()).trim().to_string();
                if !grammar.contexts.contains(&context) {
                    grammar.contexts.push(context.clone());
                }
                grammar.projections.push(ContextProjection {
                    context,
                    projection,
                    rule,
                    action: RuleAction::User(code),
                });
            }
            None => grammar.diagnostics.push(GrammarDiagnostic {
                line: line_no,
                message: format!("Malformed projection line '{}'.", line),
            }),
        }
    }
}

fn brace_depth(line: &str) -> isize {
    line.bytes().fold(0isize, |depth, byte| match byte {
        b'{' => depth + 1,
        b'}' => depth - 1,
        _ => depth,
    })
}

fn is_directive(line: &str) -> bool {
    match line.split_once(':') {
        Some((head, _)) => {
            !head.is_empty()
                && head
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    }
}

/// Split a rule body into its right hand side and an optional action.
/// Both `=> { ACTION }` and a bare trailing `{ACTION}` group are accepted.
fn split_action(rest: &str) -> (&str, &str) {
    if let Some(arrow) = rest.rfind("=>") {
        let tail = &rest[arrow + 2..];
        if let (Some(open), Some(close)) = (tail.find('{'), tail.rfind('}')) {
            if open < close {
                return (&rest[..arrow], &tail[open + 1..close]);
            }
        }
    }
    let trimmed = rest.trim_end();
    if trimmed.ends_with('}') {
        if let Some(open) = trimmed.rfind('{') {
            let before = &rest[..open];
            if before.ends_with(char::is_whitespace) {
                return (before, &trimmed[open + 1..trimmed.len() - 1]);
            }
        }
    }
    (rest, "")
}

fn parse_action(text: &str) -> Option<RuleAction> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Some(kind) = extract_call_arg(text, "return") {
        return Some(RuleAction::Rename(kind));
    }
    if let Some(tag) = extract_call_arg(text, "push_context") {
        return Some(RuleAction::PushContext(tag));
    }
    if text.contains("pop_context") {
        return Some(RuleAction::PopContext);
    }
    if let Some(symbol_type) = extract_call_arg(text, "emit_symbol") {
        return Some(RuleAction::EmitSymbol { symbol_type });
    }
    // A bare `skip` substring marks the rule skippable.
    if text.contains("skip") {
        return Some(RuleAction::Skip);
    }
    Some(RuleAction::User(text.to_string()))
}

/// Extract the first quoted argument of `name("...")` from an action body.
fn extract_call_arg(text: &str, name: &str) -> Option<String> {
    let at = text.find(name)?;
    let tail = &text[at + name.len()..];
    let open = tail.find('(')?;
    let close = tail[open..].find(')')? + open;
    let argument = tail[open + 1..close].trim();
    Some(argument.trim_matches(|c| c == '"' || c == '\'').to_string())
}

fn extract_bracket_list(body: &str) -> Vec<String> {
    let open = match body.find('[') {
        Some(open) => open,
        None => return Vec::new(),
    };
    let close = match body[open..].find(']') {
        Some(close) => open + close,
        None => return Vec::new(),
    };
    body[open + 1..close]
        .split(',')
        .map(|item| {
            item.trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .to_string()
        })
        .filter(|item| !item.is_empty())
        .collect()
}

fn extract_quoted_field(body: &str, field: &str) -> Option<String> {
    let at = body.find(field)?;
    let tail = &body[at + field.len()..];
    let open = tail.find('"')?;
    let close = tail[open + 1..].find('"')? + open + 1;
    Some(tail[open + 1..close].to_string())
}

fn parse_associativity(value: &str) -> Option<super::Associativity> {
    match value {
        "left" => Some(super::Associativity::Left),
        "right" => Some(super::Associativity::Right),
        "none" => Some(super::Associativity::None),
        _ => None,
    }
}

/// Split production alternatives on `|`, honoring quoted literals.
fn split_alternatives(rhs: &str) -> Vec<String> {
    let mut alternatives = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    for c in rhs.chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => {
                    quote = Some(c);
                    current.push(c);
                }
                '|' => {
                    alternatives.push(current.trim().to_string());
                    current.clear();
                }
                _ => current.push(c),
            },
        }
    }
    alternatives.push(current.trim().to_string());
    alternatives.into_iter().filter(|a| !a.is_empty()).collect()
}

/// Tokenize one alternative into its symbols: `<ref>`, quoted literals and bare
/// terminal names.
fn parse_symbols(alternative: &str) -> Vec<RhsSymbol> {
    let mut symbols = Vec::new();
    let mut chars = alternative.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '<' => {
                chars.next();
                let mut name = String::new();
                for inner in chars.by_ref() {
                    if inner == '>' {
                        break;
                    }
                    name.push(inner);
                }
                symbols.push(RhsSymbol::NonTerminal(name.trim().to_string()));
            }
            '"' | '\'' => {
                let q = c;
                chars.next();
                let mut text = String::new();
                for inner in chars.by_ref() {
                    if inner == q {
                        break;
                    }
                    text.push(inner);
                }
                symbols.push(RhsSymbol::Literal(text));
            }
            _ => {
                let mut word = String::new();
                while let Some(&inner) = chars.peek() {
                    if inner.is_whitespace() || inner == '<' || inner == '"' || inner == '\'' {
                        break;
                    }
                    word.push(inner);
                    chars.next();
                }
                if !word.is_empty() {
                    symbols.push(RhsSymbol::Terminal(word));
                }
            }
        }
    }
    symbols
}
