//! Pure text tokenizers feeding the flat-count queries: emoji code points
//! and @mention handles. Each extractor compiles its pattern once at
//! construction and holds no other state; pass it by reference wherever a
//! scan needs it.

use regex::Regex;

/// Seam between post bodies and the counting drivers.
pub trait Tokenizer {
    /// Invoke `f` once per extracted token, in order of appearance.
    /// Duplicates are retained; empty text yields nothing.
    fn for_each_token<'t>(&self, text: &'t str, f: &mut dyn FnMut(&'t str));
}

// One character class, one alternative per Unicode block. Matches a single
// code point at a time: "😀😀" yields two tokens, not one run.
const EMOJI_CLASS: &str = concat!(
    "[",
    "\u{1F600}-\u{1F64F}", // emoticons
    "\u{1F300}-\u{1F5FF}", // symbols & pictographs
    "\u{1F680}-\u{1F6FF}", // transport & map symbols
    "\u{1F700}-\u{1F77F}", // alchemical symbols
    "\u{1F780}-\u{1F7FF}", // geometric shapes extended
    "\u{1F800}-\u{1F8FF}", // supplemental arrows-C
    "\u{1F900}-\u{1F9FF}", // supplemental symbols and pictographs
    "\u{1FA00}-\u{1FA6F}", // chess symbols, etc.
    "\u{1FA70}-\u{1FAFF}", // symbols and pictographs extended-A
    "\u{2702}-\u{27B0}",   // dingbats
    "\u{24C2}-\u{1F251}",  // enclosed characters
    "]",
);

/// Extracts emoji code points falling inside a fixed block-range table.
pub struct EmojiExtractor {
    pattern: Regex,
}

impl EmojiExtractor {
    pub fn new() -> Self {
        Self { pattern: Regex::new(EMOJI_CLASS).unwrap() }
    }
}

impl Default for EmojiExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for EmojiExtractor {
    fn for_each_token<'t>(&self, text: &'t str, f: &mut dyn FnMut(&'t str)) {
        if text.is_empty() {
            return;
        }
        for m in self.pattern.find_iter(text) {
            f(m.as_str());
        }
    }
}

/// Extracts `@handle` mentions: `@` followed by one or more word characters.
/// Yields the handle without the `@`.
pub struct MentionExtractor {
    pattern: Regex,
}

impl MentionExtractor {
    pub fn new() -> Self {
        Self { pattern: Regex::new(r"@(\w+)").unwrap() }
    }
}

impl Default for MentionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for MentionExtractor {
    fn for_each_token<'t>(&self, text: &'t str, f: &mut dyn FnMut(&'t str)) {
        if text.is_empty() {
            return;
        }
        for cap in self.pattern.captures_iter(text) {
            if let Some(handle) = cap.get(1) {
                f(handle.as_str());
            }
        }
    }
}
