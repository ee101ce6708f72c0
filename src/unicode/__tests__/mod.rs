use super::UnicodeOracle;

#[test]
fn general_category_membership() {
    let oracle = UnicodeOracle::new();
    assert!(oracle.matches('a' as u32, "L"));
    assert!(oracle.matches('a' as u32, "Ll"));
    assert!(!oracle.matches('a' as u32, "Lu"));
    assert!(oracle.matches('A' as u32, "Lu"));
    assert!(oracle.matches('A' as u32, "LC"));
    assert!(oracle.matches('7' as u32, "Nd"));
    assert!(oracle.matches('+' as u32, "Sm"));
    assert!(oracle.matches(' ' as u32, "Zs"));
    assert!(oracle.matches('\u{0301}' as u32, "Mn"));
}

#[test]
fn block_membership() {
    let oracle = UnicodeOracle::new();
    assert!(oracle.matches('a' as u32, "Basic_Latin"));
    assert!(!oracle.matches('é' as u32, "Basic_Latin"));
    assert!(oracle.matches('é' as u32, "Latin_1_Supplement"));
    assert!(oracle.matches('Ω' as u32, "Greek_and_Coptic"));
    assert!(oracle.matches('中' as u32, "CJK_Unified_Ideographs"));
}

#[test]
fn script_membership() {
    let oracle = UnicodeOracle::new();
    assert!(oracle.matches('a' as u32, "Latin"));
    assert!(oracle.matches('Ω' as u32, "Greek"));
    assert!(!oracle.matches('д' as u32, "Greek"));
    assert!(oracle.matches('д' as u32, "Cyrillic"));
    assert!(oracle.matches('א' as u32, "Hebrew"));
    assert!(oracle.matches('ひ' as u32, "Hiragana"));
}

#[test]
fn script_names_cover_the_full_script_not_one_block() {
    let oracle = UnicodeOracle::new();
    // Codepoints from supplement blocks, outside the identically named block:
    // U+0500 Cyrillic Supplement, U+0750 Arabic Supplement, U+1F00 Greek Extended.
    assert!(oracle.matches(0x0500, "Cyrillic"));
    assert!(oracle.matches(0x0750, "Arabic"));
    assert!(oracle.matches(0x1F00, "Greek"));
    assert!(!oracle.matches('a' as u32, "Cyrillic"));
}

#[test]
fn binary_properties() {
    let oracle = UnicodeOracle::new();
    assert!(oracle.matches('x' as u32, "Alphabetic"));
    assert!(oracle.matches('F' as u32, "ASCII_Hex_Digit"));
    assert!(!oracle.matches('G' as u32, "ASCII_Hex_Digit"));
    assert!(oracle.matches('_' as u32, "ID_Continue"));
    assert!(!oracle.matches('1' as u32, "ID_Start"));
    assert!(oracle.matches(' ' as u32, "White_Space"));
    assert!(oracle.matches('a' as u32, "Lowercase"));
}

#[test]
fn unknown_and_empty_names() {
    let oracle = UnicodeOracle::new();
    assert!(!oracle.matches('a' as u32, "InvalidProperty"));
    assert!(!oracle.matches('a' as u32, ""));
    assert!(!oracle.is_valid_property_name("InvalidProperty"));
    assert!(!oracle.is_valid_property_name(""));
    assert!(oracle.is_valid_property_name("L"));
    assert!(oracle.is_valid_property_name("Cs"));
    assert!(oracle.is_valid_property_name("Basic_Latin"));
    assert!(oracle.is_valid_property_name("Latin"));
}

#[test]
fn non_scalar_code_points() {
    let oracle = UnicodeOracle::new();
    // Surrogate range and values past U+10FFFF are not scalar values.
    assert!(!oracle.matches(0xD800, "C"));
    assert!(!oracle.matches(0x110000, "L"));
    assert!(oracle.matches(0x10FFFF, "Cn"));
}
