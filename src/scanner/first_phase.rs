use super::{PatternScanner, PatternTokenKind, ScanError, SplitAlternative, SplittableToken};
use crate::util::Code;

const INLINE_FLAGS: &[u8] = b"imsxuUADSJ";

impl PatternScanner {
    /// Phase one: walk the pattern bytes and emit one [SplittableToken] per step.
    ///
    /// Empty input is a successful scan with no tokens. Unterminated classes and
    /// comments abort the scan; unterminated `\p{...}` groups and dangling escapes
    /// are preserved as invalid tokens for the second phase to reject.
    pub fn scan(&self, code: &Code) -> Result<Vec<SplittableToken>, ScanError> {
        let mut tokens = Vec::new();
        let mut pointer: usize = 0;
        let eof = code.len();

        while pointer < eof {
            let token = match code.byte_at(pointer) {
                Some(b'\\') => self.scan_escape(code, pointer),
                Some(b'[') => self.scan_class(code, pointer)?,
                Some(b'(') => self.scan_group(code, pointer)?,
                Some(b')') => {
                    SplittableToken::new(PatternTokenKind::GroupEnd, pointer, pointer + 1)
                }
                Some(b'*') | Some(b'+') | Some(b'?') => {
                    if code.byte_at(pointer + 1) == Some(b'?') {
                        SplittableToken::new(PatternTokenKind::LazyQuantifier, pointer, pointer + 2)
                    } else {
                        SplittableToken::new(PatternTokenKind::Quantifier, pointer, pointer + 1)
                    }
                }
                Some(b'|') => {
                    SplittableToken::new(PatternTokenKind::Alternation, pointer, pointer + 1)
                }
                Some(b'^') => {
                    SplittableToken::new(PatternTokenKind::StartAnchor, pointer, pointer + 1)
                }
                Some(b'$') => {
                    SplittableToken::new(PatternTokenKind::EndAnchor, pointer, pointer + 1)
                }
                Some(b'.') => SplittableToken::new(PatternTokenKind::AnyChar, pointer, pointer + 1),
                _ => {
                    let width = code.char_at(pointer).map_or(1, |c| c.len_utf8());
                    SplittableToken::new(PatternTokenKind::Literal, pointer, pointer + width)
                }
            };
            debug_assert!(token.end > pointer, "scanner must always make progress");
            pointer = token.end;
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn scan_escape(&self, code: &Code, at: usize) -> SplittableToken {
        let eof = code.len();
        match code.byte_at(at + 1) {
            None => SplittableToken::invalid(PatternTokenKind::EscapeSequence, at, eof),
            Some(b'Q') => match find_literal_end(code, at + 2) {
                Some(end) => SplittableToken::new(PatternTokenKind::LiteralText, at, end),
                // No \E left; the sequence degrades to a two byte escape.
                None => SplittableToken::new(PatternTokenKind::EscapeSequence, at, at + 2),
            },
            Some(b'p') | Some(b'P') => {
                if code.byte_at(at + 2) == Some(b'{') {
                    match find_byte(code, at + 3, b'}') {
                        Some(close) => SplittableToken::new(
                            PatternTokenKind::UnicodeProperty,
                            at,
                            close + 1,
                        ),
                        None => {
                            SplittableToken::invalid(PatternTokenKind::UnicodeProperty, at, eof)
                        }
                    }
                } else {
                    SplittableToken::new(
                        PatternTokenKind::EscapeSequence,
                        at,
                        std::cmp::min(at + 2, eof),
                    )
                }
            }
            Some(b'x') => {
                let mut alternatives = Vec::new();
                if at + 4 <= eof {
                    alternatives.push(SplitAlternative {
                        kind: PatternTokenKind::HexEscape,
                        end: at + 4,
                    });
                }
                if code.byte_at(at + 2) == Some(b'{') {
                    if let Some(close) = find_byte(code, at + 3, b'}') {
                        alternatives.push(SplitAlternative {
                            kind: PatternTokenKind::UnicodeEscape,
                            end: close + 1,
                        });
                    }
                }
                match alternatives.len() {
                    0 => SplittableToken::new(PatternTokenKind::EscapeSequence, at, at + 2),
                    1 => SplittableToken::new(alternatives[0].kind, at, alternatives[0].end),
                    _ => SplittableToken::ambiguous(at, alternatives),
                }
            }
            Some(_) => {
                let width = code.char_at(at + 1).map_or(1, |c| c.len_utf8());
                SplittableToken::new(PatternTokenKind::EscapeSequence, at, at + 1 + width)
            }
        }
    }

    fn scan_class(&self, code: &Code, at: usize) -> Result<SplittableToken, ScanError> {
        let mut pointer = at + 1;
        if code.byte_at(pointer) == Some(b'^') {
            pointer += 1;
        }
        while pointer < code.len() {
            match code.byte_at(pointer) {
                Some(b'\\') => pointer += 2,
                Some(b']') => {
                    return Ok(SplittableToken::new(
                        PatternTokenKind::CharacterClass,
                        at,
                        pointer + 1,
                    ))
                }
                _ => pointer += 1,
            }
        }
        Err(ScanError::new(
            at,
            "Unterminated character class.".to_string(),
        ))
    }

    fn scan_group(&self, code: &Code, at: usize) -> Result<SplittableToken, ScanError> {
        if code.byte_at(at + 1) != Some(b'?') {
            return Ok(SplittableToken::new(
                PatternTokenKind::GroupStart,
                at,
                at + 1,
            ));
        }
        match code.byte_at(at + 2) {
            Some(b'#') => {
                // Nested parentheses inside the comment body are balanced.
                let mut depth: usize = 0;
                let mut pointer = at + 3;
                while let Some(byte) = code.byte_at(pointer) {
                    match byte {
                        b'(' => depth += 1,
                        b')' if depth == 0 => {
                            return Ok(SplittableToken::new(
                                PatternTokenKind::RegexComment,
                                at,
                                pointer + 1,
                            ))
                        }
                        b')' => depth -= 1,
                        _ => {}
                    }
                    pointer += 1;
                }
                Err(ScanError::new(at, "Unterminated regex comment.".to_string()))
            }
            Some(byte) if INLINE_FLAGS.contains(&byte) => {
                let mut pointer = at + 2;
                while code
                    .byte_at(pointer)
                    .map_or(false, |b| INLINE_FLAGS.contains(&b))
                {
                    pointer += 1;
                }
                if code.byte_at(pointer) == Some(b')') {
                    Ok(SplittableToken::new(
                        PatternTokenKind::InlineModifier,
                        at,
                        pointer + 1,
                    ))
                } else {
                    // Flag characters followed by arbitrary content read as a group specifier.
                    Ok(self.scan_special_group(code, at))
                }
            }
            Some(_) => Ok(self.scan_special_group(code, at)),
            None => Ok(SplittableToken::invalid(
                PatternTokenKind::SpecialGroup,
                at,
                code.len(),
            )),
        }
    }

    fn scan_special_group(&self, code: &Code, at: usize) -> SplittableToken {
        let eof = code.len();
        match code.byte_at(at + 2) {
            Some(b':') | Some(b'=') | Some(b'!') => {
                SplittableToken::new(PatternTokenKind::SpecialGroup, at, at + 3)
            }
            Some(b'<') => match code.byte_at(at + 3) {
                Some(b'=') | Some(b'!') => {
                    SplittableToken::new(PatternTokenKind::SpecialGroup, at, at + 4)
                }
                _ => match find_byte(code, at + 3, b'>') {
                    Some(close) => {
                        SplittableToken::new(PatternTokenKind::SpecialGroup, at, close + 1)
                    }
                    None => SplittableToken::invalid(PatternTokenKind::SpecialGroup, at, eof),
                },
            },
            Some(b'P') if code.byte_at(at + 3) == Some(b'<') => {
                match find_byte(code, at + 4, b'>') {
                    Some(close) => {
                        SplittableToken::new(PatternTokenKind::SpecialGroup, at, close + 1)
                    }
                    None => SplittableToken::invalid(PatternTokenKind::SpecialGroup, at, eof),
                }
            }
            Some(_) => SplittableToken::new(PatternTokenKind::SpecialGroup, at, at + 3),
            None => SplittableToken::invalid(PatternTokenKind::SpecialGroup, at, eof),
        }
    }
}

fn find_byte(code: &Code, from: usize, needle: u8) -> Option<usize> {
    (from..code.len()).find(|index| code.byte_at(*index) == Some(needle))
}

fn find_literal_end(code: &Code, from: usize) -> Option<usize> {
    let mut pointer = from;
    while pointer + 1 < code.len() {
        if code.byte_at(pointer) == Some(b'\\') && code.byte_at(pointer + 1) == Some(b'E') {
            return Some(pointer + 2);
        }
        pointer += 1;
    }
    None
}
