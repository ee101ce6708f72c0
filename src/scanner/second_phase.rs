use super::{PatternScanner, PatternTokenKind, ResolvedToken, ScanError, SplittableToken};
use crate::util::Code;

impl PatternScanner {
    /// Phase two: settle ambiguous tokens and validate semantic constraints.
    ///
    /// Each ambiguous token resolves to its longest alternative; ties keep the
    /// alternative recorded first. Every `\p{...}` / `\P{...}` name is checked
    /// against the property oracle and any unknown name fails the phase.
    pub fn resolve(
        &self,
        code: &Code,
        tokens: &[SplittableToken],
    ) -> Result<Vec<ResolvedToken>, ScanError> {
        let mut resolved = Vec::with_capacity(tokens.len());
        for token in tokens {
            if !token.valid {
                return Err(ScanError::new(
                    token.start,
                    format!("Unterminated {:?} at offset {}.", token.kind, token.start),
                ));
            }
            let settled = if token.is_ambiguous() {
                // Longest alternative wins; ties keep the first recorded one.
                let mut longest = &token.alternatives[0];
                for alternative in &token.alternatives[1..] {
                    if alternative.end > longest.end {
                        longest = alternative;
                    }
                }
                ResolvedToken {
                    kind: longest.kind,
                    start: token.start,
                    end: longest.end,
                }
            } else {
                ResolvedToken {
                    kind: token.kind,
                    start: token.start,
                    end: token.end,
                }
            };

            if settled.kind == PatternTokenKind::UnicodeProperty {
                let name = property_name(code, settled.start, settled.end);
                if !self.oracle().is_valid_property_name(name) {
                    return Err(ScanError::new(
                        settled.start,
                        format!("Unknown unicode property name '{}'.", name),
                    ));
                }
            }
            resolved.push(settled);
        }
        Ok(resolved)
    }

    /// Run both phases over a pattern text.
    pub fn scan_and_resolve(&self, pattern: &str) -> Result<Vec<ResolvedToken>, ScanError> {
        let code = Code::from(pattern);
        let tokens = self.scan(&code)?;
        self.resolve(&code, &tokens)
    }
}

/// Extract the name between the braces of a `\p{name}` span.
pub(super) fn property_name<'c>(code: &Code<'c>, start: usize, end: usize) -> &'c str {
    if end < start + 4 {
        return "";
    }
    code.text(start + 3, end - 1)
}
