use super::{second_phase::property_name, PatternScanner, PatternTokenKind, ScanError};
use crate::util::Code;
use regex::bytes::Regex;
use std::fmt::Write;

impl PatternScanner {
    /// Compile a validated pattern into its anchored execution form.
    ///
    /// Most tokens pass through verbatim; `\Q...\E` bodies are escaped and block
    /// valued properties are rewritten as explicit codepoint classes, since the
    /// execution dialect supports neither. The compiled expression is anchored at
    /// the start so rule matching never scans past the current position.
    pub fn compile(&self, pattern: &str) -> Result<Regex, ScanError> {
        let code = Code::from(pattern);
        let tokens = self.scan(&code)?;
        let resolved = self.resolve(&code, &tokens)?;

        let mut translated = String::with_capacity(pattern.len() + 8);
        translated.push_str("^(?:");
        for token in &resolved {
            match token.kind {
                PatternTokenKind::LiteralText => {
                    let body = code.text(token.start + 2, token.end - 2);
                    translated.push_str(&regex::escape(body));
                }
                PatternTokenKind::UnicodeProperty => {
                    // Properties the dialect answers itself pass through; only
                    // block-only names are rewritten as codepoint classes.
                    let name = property_name(&code, token.start, token.end);
                    let block_only = !self.oracle().has_native_matcher(name);
                    match self.oracle().block_ranges(name).filter(|_| block_only) {
                        Some(ranges) => {
                            let negated = code.byte_at(token.start + 1) == Some(b'P');
                            translated.push('[');
                            if negated {
                                translated.push('^');
                            }
                            for (start, end) in ranges {
                                write!(translated, r"\u{{{:X}}}-\u{{{:X}}}", start, end)
                                    .expect("writing to a string cannot fail");
                            }
                            translated.push(']');
                        }
                        None => translated.push_str(code.text(token.start, token.end)),
                    }
                }
                _ => translated.push_str(code.text(token.start, token.end)),
            }
        }
        translated.push(')');

        let regexp = Regex::new(&translated).map_err(|err| {
            ScanError::new(
                0,
                format!("Pattern should be a valid regex expression.{:?}", err),
            )
        })?;
        if regexp.is_match(b"") {
            return Err(ScanError::new(
                0,
                format!(
                    "Regex expression '{}' should not be nullable.",
                    pattern
                ),
            ));
        }
        Ok(regexp)
    }
}
