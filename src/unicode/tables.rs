//! Built-in block range data and the recognized category name set.

/// Named unicode blocks, sorted by name for binary search.
/// Several names double as script names (`Cyrillic`, `Hebrew`, ...); those are
/// answered by the regex dialect's script table before this one is consulted,
/// so the rows here only serve genuinely block-only lookups.
static BLOCKS: &[(&str, &[(u32, u32)])] = &[
    ("Alphabetic_Presentation_Forms", &[(0xFB00, 0xFB4F)]),
    ("Arabic", &[(0x0600, 0x06FF)]),
    ("Arabic_Presentation_Forms_A", &[(0xFB50, 0xFDFF)]),
    ("Armenian", &[(0x0530, 0x058F)]),
    ("Arrows", &[(0x2190, 0x21FF)]),
    ("Basic_Latin", &[(0x0000, 0x007F)]),
    ("Bengali", &[(0x0980, 0x09FF)]),
    ("Box_Drawing", &[(0x2500, 0x257F)]),
    ("CJK_Symbols_and_Punctuation", &[(0x3000, 0x303F)]),
    ("CJK_Unified_Ideographs", &[(0x4E00, 0x9FFF)]),
    ("Cherokee", &[(0x13A0, 0x13FF)]),
    ("Combining_Diacritical_Marks", &[(0x0300, 0x036F)]),
    ("Currency_Symbols", &[(0x20A0, 0x20CF)]),
    ("Cyrillic", &[(0x0400, 0x04FF)]),
    ("Devanagari", &[(0x0900, 0x097F)]),
    ("Dingbats", &[(0x2700, 0x27BF)]),
    ("Ethiopic", &[(0x1200, 0x137F)]),
    ("General_Punctuation", &[(0x2000, 0x206F)]),
    ("Geometric_Shapes", &[(0x25A0, 0x25FF)]),
    ("Georgian", &[(0x10A0, 0x10FF)]),
    ("Greek_Extended", &[(0x1F00, 0x1FFF)]),
    ("Greek_and_Coptic", &[(0x0370, 0x03FF)]),
    ("Gujarati", &[(0x0A80, 0x0AFF)]),
    ("Gurmukhi", &[(0x0A00, 0x0A7F)]),
    ("Halfwidth_and_Fullwidth_Forms", &[(0xFF00, 0xFFEF)]),
    ("Hangul_Jamo", &[(0x1100, 0x11FF)]),
    ("Hangul_Syllables", &[(0xAC00, 0xD7AF)]),
    ("Hebrew", &[(0x0590, 0x05FF)]),
    ("Hiragana", &[(0x3040, 0x309F)]),
    ("IPA_Extensions", &[(0x0250, 0x02AF)]),
    ("Kannada", &[(0x0C80, 0x0CFF)]),
    ("Katakana", &[(0x30A0, 0x30FF)]),
    ("Lao", &[(0x0E80, 0x0EFF)]),
    ("Latin_1_Supplement", &[(0x0080, 0x00FF)]),
    ("Latin_Extended_A", &[(0x0100, 0x017F)]),
    ("Latin_Extended_Additional", &[(0x1E00, 0x1EFF)]),
    ("Latin_Extended_B", &[(0x0180, 0x024F)]),
    ("Malayalam", &[(0x0D00, 0x0D7F)]),
    ("Mathematical_Operators", &[(0x2200, 0x22FF)]),
    ("Miscellaneous_Symbols", &[(0x2600, 0x26FF)]),
    ("Mongolian", &[(0x1800, 0x18AF)]),
    ("Myanmar", &[(0x1000, 0x109F)]),
    ("Oriya", &[(0x0B00, 0x0B7F)]),
    ("Private_Use_Area", &[(0xE000, 0xF8FF)]),
    ("Sinhala", &[(0x0D80, 0x0DFF)]),
    ("Specials", &[(0xFFF0, 0xFFFF)]),
    ("Superscripts_and_Subscripts", &[(0x2070, 0x209F)]),
    ("Syriac", &[(0x0700, 0x074F)]),
    ("Tamil", &[(0x0B80, 0x0BFF)]),
    ("Telugu", &[(0x0C00, 0x0C7F)]),
    ("Thaana", &[(0x0780, 0x07BF)]),
    ("Thai", &[(0x0E00, 0x0E7F)]),
    ("Tibetan", &[(0x0F00, 0x0FFF)]),
];

/// General category names plus the binary property set the scanner accepts.
static CATEGORIES: &[&str] = &[
    "ASCII_Hex_Digit",
    "Alphabetic",
    "C",
    "Cc",
    "Cf",
    "Cn",
    "Co",
    "Cs",
    "Emoji",
    "ID_Continue",
    "ID_Start",
    "L",
    "LC",
    "Ll",
    "Lm",
    "Lo",
    "Lowercase",
    "Lt",
    "Lu",
    "M",
    "Math",
    "Mc",
    "Me",
    "Mn",
    "N",
    "Nd",
    "Nl",
    "No",
    "P",
    "Pc",
    "Pd",
    "Pe",
    "Pf",
    "Pi",
    "Po",
    "Ps",
    "S",
    "Sc",
    "Sk",
    "Sm",
    "So",
    "Uppercase",
    "White_Space",
    "Z",
    "Zl",
    "Zp",
    "Zs",
];

pub fn block_ranges(name: &str) -> Option<&'static [(u32, u32)]> {
    BLOCKS
        .binary_search_by_key(&name, |(n, _)| n)
        .ok()
        .map(|index| BLOCKS[index].1)
}

pub fn is_known_category(name: &str) -> bool {
    CATEGORIES.binary_search(&name).is_ok()
}
