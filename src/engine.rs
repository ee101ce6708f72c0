use crate::encoding::{detect_encoding, SourceEncoding};
use crate::grammar::{GrammarDefinition, GrammarLoader};
use crate::parser::{record_tree_references, validate_grammar, GlrParser, UserAction};
use crate::refactor::{
    applicable_refactorings, extract_variable, find_usages, inline_variable, rename, NodeIndex,
    RefactoringContext, RefactoringRegistry, RefactoringResult,
};
use crate::scanner::PatternScanner;
use crate::symbol::SymbolTable;
use crate::unicode::UnicodeOracle;
use crate::util::{Code, CodeLocation};
use crate::{ParseError, ParseNode, ParsingResult, SafetyLimits};
use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// The front-end facade: owns the grammar loader, the loaded grammar, the
/// exploration limits, registered user actions and the state of the last parse
/// that the refactoring layer queries.
///
/// An engine is single threaded; run parallel parses on separate instances.
pub struct Engine {
    loader: GrammarLoader,
    grammar: Option<Rc<GrammarDefinition>>,
    limits: SafetyLimits,
    user_actions: Vec<(String, Rc<dyn UserAction>)>,
    registry: RefactoringRegistry,
    state: Option<EngineState>,
}

struct EngineState {
    tree: ParseNode,
    symbols: SymbolTable,
    index: NodeIndex,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        let oracle = Rc::new(UnicodeOracle::new());
        Self {
            loader: GrammarLoader::new(Rc::new(PatternScanner::new(oracle))),
            grammar: None,
            limits: SafetyLimits::default(),
            user_actions: Vec::new(),
            registry: RefactoringRegistry::default(),
            state: None,
        }
    }

    pub fn with_limits(mut self, limits: SafetyLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Register a host supplied semantic action under the name `user` handles
    /// in grammar action bodies resolve against.
    pub fn register_action(&mut self, name: &str, action: Rc<dyn UserAction>) {
        self.user_actions.push((name.to_string(), action));
    }

    pub fn refactorings(&mut self) -> &mut RefactoringRegistry {
        &mut self.registry
    }

    /// Load a grammar from a file path or inline text and make it current.
    /// Non fatal problems stay on the grammar's diagnostics list.
    pub fn load_grammar(&mut self, path_or_text: &str) -> Result<Rc<GrammarDefinition>, ParseError> {
        let grammar = self
            .loader
            .load(path_or_text)
            .map_err(ParseError::grammar)?;
        validate_grammar(grammar.as_ref())?;
        self.grammar = Some(grammar.clone());
        Ok(grammar)
    }

    pub fn grammar(&self) -> Option<&Rc<GrammarDefinition>> {
        self.grammar.as_ref()
    }

    /// A readable listing of the loaded grammar.
    pub fn grammar_text(&self) -> Result<String, std::fmt::Error> {
        match &self.grammar {
            Some(grammar) => grammar.grammar_text(),
            None => Ok(String::new()),
        }
    }

    pub fn last_tree(&self) -> Option<&ParseNode> {
        self.state.as_ref().map(|state| &state.tree)
    }

    pub fn symbols(&self) -> Option<&SymbolTable> {
        self.state.as_ref().map(|state| &state.symbols)
    }

    /// Parse a source buffer. A leading utf-8 byte order mark is stripped; any
    /// other mark is a scan error since the core only consumes utf-8 (the
    /// transcoding collaborator runs before the engine).
    pub fn parse(&mut self, bytes: &[u8], file_name: Option<&str>) -> ParsingResult {
        let started = Instant::now();
        let mut result = ParsingResult::empty();

        let grammar = match &self.grammar {
            Some(grammar) => grammar.clone(),
            None => {
                result
                    .errors
                    .push(ParseError::grammar("No grammar loaded.".to_string()));
                result.elapsed = started.elapsed();
                return result;
            }
        };

        let (encoding, bom_len) = detect_encoding(bytes);
        if encoding != SourceEncoding::Utf8 {
            result.errors.push(ParseError::scan(
                0,
                format!(
                    "Source is {} encoded; transcode to UTF-8 before parsing.",
                    encoding.name()
                ),
            ));
            result.elapsed = started.elapsed();
            return result;
        }
        let payload = &bytes[bom_len..];

        let code = Code::new(payload);
        let file: Rc<str> = Rc::from(file_name.unwrap_or("<memory>"));
        let lexer = grammar.build_lexer();
        let lexer_paths = match lexer.tokenize(&code, &file) {
            Ok(paths) => paths,
            Err(error) => {
                result.errors.push(error);
                result.elapsed = started.elapsed();
                return result;
            }
        };

        let mut parser = GlrParser::new(grammar, self.limits.clone());
        for (name, action) in &self.user_actions {
            parser.register_action(name, action.clone());
        }

        let mut first_failure: Option<ParsingResult> = None;
        for lexer_path in &lexer_paths {
            let outcome = parser.parse(&lexer_path.tokens);
            result.path_count += outcome.path_count;
            if outcome.success() {
                let mut symbols = outcome.symbols;
                let best = outcome.trees[0].clone();
                record_tree_references(&best, &mut symbols);

                result.success = true;
                result.tokens = lexer_path.tokens.clone();
                result.tree = Some(best.clone());
                result.ambiguous_parses = outcome.trees;
                result.final_context = outcome.final_context;
                result.elapsed = started.elapsed();

                let index = NodeIndex::build(&best);
                self.state = Some(EngineState {
                    tree: best,
                    symbols,
                    index,
                });
                return result;
            }
            if first_failure.is_none() {
                let mut failed = ParsingResult::empty();
                failed.tokens = lexer_path.tokens.clone();
                failed.errors = outcome.errors;
                failed.final_context = outcome.final_context;
                first_failure = Some(failed);
            }
        }

        if let Some(failed) = first_failure {
            result.tokens = failed.tokens;
            result.errors.extend(failed.errors);
            result.final_context = failed.final_context;
        }
        result.elapsed = started.elapsed();
        result
    }

    /// Parse several named buffers into one merged result. The files are
    /// processed in name order; success requires every file to parse. An empty
    /// map is unsuccessful.
    pub fn parse_many(&mut self, files: &BTreeMap<String, Vec<u8>>) -> ParsingResult {
        let started = Instant::now();
        let mut merged = ParsingResult::empty();
        if files.is_empty() {
            merged
                .errors
                .push(ParseError::grammar("No files to parse.".to_string()));
            merged.elapsed = started.elapsed();
            return merged;
        }

        merged.success = true;
        let mut combined_symbols = SymbolTable::new();
        for (name, bytes) in files {
            let result = self.parse(bytes, Some(name));
            merged.success &= result.success;
            merged.tokens.extend(result.tokens);
            merged.errors.extend(result.errors);
            merged.path_count += result.path_count;
            merged.final_context = result.final_context;
            if merged.tree.is_none() {
                merged.tree = result.tree.clone();
            }
            merged.ambiguous_parses.extend(result.ambiguous_parses);
            if let Some(symbols) = self.symbols() {
                for symbol in symbols.symbols() {
                    combined_symbols.declare(symbol.clone());
                }
            }
        }
        if let Some(state) = &mut self.state {
            state.symbols = combined_symbols;
        }
        merged.elapsed = started.elapsed();
        merged
    }

    /// Parse a buffer and return its best tree, keeping the existing tree when
    /// the new parse fails.
    pub fn parse_and_merge(
        &mut self,
        existing_tree: Option<ParseNode>,
        bytes: &[u8],
        file_name: Option<&str>,
    ) -> Option<ParseNode> {
        let result = self.parse(bytes, file_name);
        if result.success {
            result.tree
        } else {
            existing_tree
        }
    }

    pub fn find_usages(
        &self,
        location: &CodeLocation,
        scope: Option<&str>,
    ) -> RefactoringResult {
        self.run_operation("find_usages", |ctx| find_usages(ctx, location, scope))
    }

    pub fn rename(&self, location: &CodeLocation, new_name: &str) -> RefactoringResult {
        self.run_operation("rename", |ctx| rename(ctx, location, new_name))
    }

    pub fn extract_variable(
        &self,
        location: &CodeLocation,
        var_name: &str,
    ) -> RefactoringResult {
        self.run_operation("extract_variable", |ctx| {
            extract_variable(ctx, location, var_name)
        })
    }

    pub fn inline_variable(&self, location: &CodeLocation) -> RefactoringResult {
        self.run_operation("inline_variable", |ctx| inline_variable(ctx, location))
    }

    pub fn get_applicable_refactorings(&self, location: &CodeLocation) -> Vec<String> {
        match self.context() {
            Some(ctx) => applicable_refactorings(&ctx, location)
                .into_iter()
                .filter(|name| self.registry.contains(name))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Dispatch an operation by registry name. Unknown names and an engine
    /// without a parsed tree both answer "operation not available".
    pub fn run_refactoring(
        &self,
        name: &str,
        location: &CodeLocation,
        argument: Option<&str>,
    ) -> RefactoringResult {
        match name {
            "find_usages" => self.find_usages(location, argument),
            "rename" => match argument {
                Some(new_name) => self.rename(location, new_name),
                None => RefactoringResult::failure("Operation 'rename' requires a new name."),
            },
            "extract_variable" => match argument {
                Some(var_name) => self.extract_variable(location, var_name),
                None => RefactoringResult::failure(
                    "Operation 'extract_variable' requires a variable name.",
                ),
            },
            "inline_variable" => self.inline_variable(location),
            _ => RefactoringResult::not_available(),
        }
    }

    fn context(&self) -> Option<RefactoringContext<'_>> {
        self.state.as_ref().map(|state| RefactoringContext {
            tree: &state.tree,
            symbols: &state.symbols,
            index: &state.index,
        })
    }

    fn run_operation<F>(&self, name: &str, operation: F) -> RefactoringResult
    where
        F: FnOnce(&RefactoringContext) -> RefactoringResult,
    {
        if !self.registry.contains(name) {
            return RefactoringResult::not_available();
        }
        match self.context() {
            Some(ctx) => operation(&ctx),
            None => RefactoringResult::not_available(),
        }
    }
}

impl ParsingResult {
    pub(crate) fn empty() -> Self {
        Self {
            success: false,
            tokens: Vec::new(),
            tree: None,
            ambiguous_parses: Vec::new(),
            errors: Vec::new(),
            elapsed: Duration::ZERO,
            path_count: 0,
            final_context: "global".to_string(),
        }
    }
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            max_steps: None,
            max_paths: 32,
            deadline: None,
            cancelled: None,
        }
    }
}

impl SafetyLimits {
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn with_max_paths(mut self, max_paths: usize) -> Self {
        self.max_paths = max_paths;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancellation(mut self, flag: Rc<Cell<bool>>) -> Self {
        self.cancelled = Some(flag);
        self
    }
}
