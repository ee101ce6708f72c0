//! A unicode property oracle which answers whether a codepoint satisfies a named property.
//!
//! The oracle recognizes general categories (`L`, `Lu`, `Nd`, ...), named blocks
//! (`Basic_Latin`, `Greek_and_Coptic`, ...), scripts (`Latin`, `Cyrillic`, ...) and a
//! fixed set of binary properties (`Alphabetic`, `White_Space`, `ID_Start`, ...).
//! Category, script and binary property membership is answered through the
//! [regex] crate's unicode tables by compiling `^\p{NAME}$` once per property name.
//! Block membership comes from a built-in range table since the regex dialect has
//! no block syntax; the dialect's tables are consulted first, so names shared by a
//! script and a block resolve to the script.

mod tables;

#[cfg(test)]
mod __tests__;

use regex::Regex;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Decides `matches(codepoint, property)` for pattern tokens like `\p{L}` and
/// validates property names during the scanner's second phase.
///
/// Unknown and empty property names are never an error; they simply match nothing
/// and fail validation. Codepoints outside the unicode scalar range (surrogates,
/// values above `U+10FFFF`) match nothing.
pub struct UnicodeOracle {
    compiled: RefCell<HashMap<String, Option<Rc<Regex>>>>,
}

impl Default for UnicodeOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl UnicodeOracle {
    pub fn new() -> Self {
        Self {
            compiled: RefCell::new(HashMap::new()),
        }
    }

    /// Whether the codepoint satisfies the named property.
    ///
    /// Names the regex dialect knows (categories, scripts, binary properties)
    /// are answered through its tables, so a script name that doubles as a
    /// block name (`Cyrillic`, `Hebrew`, `Arabic`, ...) covers the full script,
    /// not one block's range. Only names without a dialect property fall back
    /// to the built-in block table.
    pub fn matches(&self, code_point: u32, property: &str) -> bool {
        if property.is_empty() {
            return false;
        }
        let c = match char::from_u32(code_point) {
            Some(c) => c,
            None => return false,
        };
        if let Some(matcher) = self.obtain_matcher(property) {
            let mut buffer = [0u8; 4];
            return matcher.is_match(c.encode_utf8(&mut buffer));
        }
        match tables::block_ranges(property) {
            Some(range_set) => range_set
                .iter()
                .any(|(start, end)| (*start..=*end).contains(&code_point)),
            None => false,
        }
    }

    /// Built-in range data for a named block, when the name is a block.
    pub fn block_ranges(&self, name: &str) -> Option<&'static [(u32, u32)]> {
        tables::block_ranges(name)
    }

    /// Whether the regex dialect answers the name directly. When it does, a
    /// pattern may carry `\p{name}` verbatim; otherwise the scanner has to
    /// rewrite the property during compilation.
    pub fn has_native_matcher(&self, property: &str) -> bool {
        self.obtain_matcher(property).is_some()
    }

    /// Whether the name belongs to a recognized property family.
    pub fn is_valid_property_name(&self, property: &str) -> bool {
        if property.is_empty() {
            return false;
        }
        tables::is_known_category(property)
            || self.obtain_matcher(property).is_some()
            || tables::block_ranges(property).is_some()
    }

    fn obtain_matcher(&self, property: &str) -> Option<Rc<Regex>> {
        if let Some(cached) = self.compiled.borrow().get(property) {
            return cached.clone();
        }
        let compiled = Self::compile_property(property).map(Rc::new);
        self.compiled
            .borrow_mut()
            .insert(property.to_string(), compiled.clone());
        compiled
    }

    fn compile_property(property: &str) -> Option<Regex> {
        if !property
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return None;
        }
        let pattern = match property {
            // Cased letter and unassigned have no direct escape in the regex dialect.
            "LC" => r"^[\p{Lu}\p{Ll}\p{Lt}]$".to_string(),
            "Cn" => r"^[^\p{L}\p{M}\p{N}\p{P}\p{S}\p{Z}\p{Cc}\p{Cf}\p{Co}]$".to_string(),
            // No unicode scalar value is a surrogate, so the category is empty.
            "Cs" => return None,
            _ => format!(r"^\p{{{}}}$", property),
        };
        Regex::new(&pattern).ok()
    }
}
