use super::{Code, CodePoints, Position};
use once_cell::unsync::OnceCell;

impl<'c, T: AsRef<[u8]> + ?Sized> From<&'c T> for Code<'c> {
    fn from(value: &'c T) -> Self {
        Code::new(value.as_ref())
    }
}

impl<'c> Code<'c> {
    /// Wrap a borrowed utf-8 buffer. The line break table is not built until a
    /// position is first asked for.
    pub fn new(value: &'c [u8]) -> Self {
        Self {
            value,
            line_breaks: OnceCell::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Slice the window between two byte offsets. The offsets are clamped to the buffer end.
    pub fn slice(&self, start: usize, end: usize) -> &'c [u8] {
        let end = std::cmp::min(end, self.value.len());
        let start = std::cmp::min(start, end);
        &self.value[start..end]
    }

    /// View a byte range as utf-8 text.
    pub fn text(&self, start: usize, end: usize) -> &'c str {
        std::str::from_utf8(self.slice(start, end)).unwrap_or("")
    }

    pub fn byte_at(&self, pointer: usize) -> Option<u8> {
        self.value.get(pointer).copied()
    }

    /// Decode the utf-8 codepoint beginning at a byte offset.
    pub fn char_at(&self, pointer: usize) -> Option<char> {
        self.code_points_from(pointer).next().map(|(_, c)| c)
    }

    /// Iterate `(byte_offset, char)` pairs from a starting byte offset.
    pub fn code_points_from(&self, pointer: usize) -> CodePoints<'c> {
        CodePoints {
            bytes: self.value,
            offset: std::cmp::min(pointer, self.value.len()),
        }
    }

    pub fn code_points(&self) -> CodePoints<'c> {
        self.code_points_from(0)
    }

    /// Byte offsets of every `\n`, collected once on first use.
    pub fn obtain_line_breaks(&self) -> &[usize] {
        self.line_breaks.get_or_init(|| {
            let mut breaks = Vec::new();
            for (offset, byte) in self.value.iter().enumerate() {
                if *byte == b'\n' {
                    breaks.push(offset);
                }
            }
            breaks
        })
    }

    pub fn obtain_position(&self, pointer: usize) -> Position {
        let line_breaks = self.obtain_line_breaks();
        let index = match line_breaks.binary_search(&pointer) {
            Ok(index) | Err(index) => index,
        };

        let line_start = if index == 0 {
            0
        } else {
            line_breaks[index - 1] + 1
        };
        let column = self.text(line_start, pointer).chars().count() + 1;
        Position::new(index + 1, column)
    }

    /// Map a 1-based position back to its byte offset.
    ///
    /// Columns past the end of the line resolve to the line end, so an exclusive
    /// end position stays addressable.
    pub fn obtain_pointer(&self, position: Position) -> Option<usize> {
        if position.line == 0 || position.column == 0 {
            return None;
        }
        let line_breaks = self.obtain_line_breaks();
        let line_start = if position.line == 1 {
            0
        } else {
            *line_breaks.get(position.line - 2)? + 1
        };
        let line_end = line_breaks
            .get(position.line - 1)
            .copied()
            .unwrap_or(self.value.len());

        let mut column = 1;
        for (offset, _) in self.code_points_from(line_start) {
            if offset >= line_end {
                break;
            }
            if column == position.column {
                return Some(offset);
            }
            column += 1;
        }
        Some(line_end)
    }
}

impl<'c> Iterator for CodePoints<'c> {
    type Item = (usize, char);

    fn next(&mut self) -> Option<(usize, char)> {
        if self.offset >= self.bytes.len() {
            return None;
        }
        let rest = &self.bytes[self.offset..];
        let probe = std::cmp::min(4, rest.len());
        let decoded = (1..=probe).find_map(|width| {
            std::str::from_utf8(&rest[..width])
                .ok()
                .and_then(|s| s.chars().next().map(|c| (c, width)))
        });
        match decoded {
            Some((c, width)) => {
                let item = (self.offset, c);
                self.offset += width;
                Some(item)
            }
            None => {
                // Invalid utf-8 byte. Surface it as a replacement char and keep walking.
                let item = (self.offset, char::REPLACEMENT_CHARACTER);
                self.offset += 1;
                Some(item)
            }
        }
    }
}
