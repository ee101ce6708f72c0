//! Byte order mark sniffing for source buffers.
//!
//! The engine only consumes utf-8 internally; other encodings are reported so a
//! transcoding collaborator can convert the buffer before parsing.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The source encoding indicated by a leading byte order mark.
pub enum SourceEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

impl SourceEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            SourceEncoding::Utf8 => "UTF-8",
            SourceEncoding::Utf16Le => "UTF-16LE",
            SourceEncoding::Utf16Be => "UTF-16BE",
            SourceEncoding::Utf32Le => "UTF-32LE",
            SourceEncoding::Utf32Be => "UTF-32BE",
        }
    }
}

/// Detect a leading byte order mark, returning the indicated encoding and the
/// mark's length. A buffer without a mark is utf-8 with length zero.
///
/// The 32 bit marks share a prefix with their 16 bit counterparts and are
/// checked first.
pub fn detect_encoding(bytes: &[u8]) -> (SourceEncoding, usize) {
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        (SourceEncoding::Utf8, 3)
    } else if bytes.starts_with(&[0xFF, 0xFE, 0x00, 0x00]) {
        (SourceEncoding::Utf32Le, 4)
    } else if bytes.starts_with(&[0x00, 0x00, 0xFE, 0xFF]) {
        (SourceEncoding::Utf32Be, 4)
    } else if bytes.starts_with(&[0xFF, 0xFE]) {
        (SourceEncoding::Utf16Le, 2)
    } else if bytes.starts_with(&[0xFE, 0xFF]) {
        (SourceEncoding::Utf16Be, 2)
    } else {
        (SourceEncoding::Utf8, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::{detect_encoding, SourceEncoding};

    #[test]
    fn bom_detection() {
        assert_eq!(
            detect_encoding(&[0xEF, 0xBB, 0xBF, b'a']),
            (SourceEncoding::Utf8, 3)
        );
        assert_eq!(
            detect_encoding(&[0xFF, 0xFE, 0x00, 0x00]),
            (SourceEncoding::Utf32Le, 4)
        );
        assert_eq!(
            detect_encoding(&[0x00, 0x00, 0xFE, 0xFF]),
            (SourceEncoding::Utf32Be, 4)
        );
        assert_eq!(
            detect_encoding(&[0xFF, 0xFE, b'a', 0x00]),
            (SourceEncoding::Utf16Le, 2)
        );
        assert_eq!(detect_encoding(&[0xFE, 0xFF]), (SourceEncoding::Utf16Be, 2));
        assert_eq!(detect_encoding(b"plain"), (SourceEncoding::Utf8, 0));
        assert_eq!(detect_encoding(b""), (SourceEncoding::Utf8, 0));
    }
}
