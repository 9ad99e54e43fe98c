// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Normalises the raw corpus before the vocabulary is built.
//
// Cleaning steps (applied in order):
//   1. Drop every character outside the allow-list:
//        word characters, whitespace, and  . , ! ? ; : - ( )
//   2. Lowercase what remains
//
// Keeping the alphabet small matters for a character model:
// every stray symbol becomes a vocabulary entry with almost no
// training signal behind it.

use anyhow::Result;
use fancy_regex::Regex;

/// Characters NOT in the allow-list.
/// `\w` is Unicode-aware, so accented letters survive.
const DISALLOWED: &str = r"[^\w\s.,!?;:()\-]";

pub struct Preprocessor {
    disallowed: Regex,
}

impl Preprocessor {
    pub fn new() -> Result<Self> {
        Ok(Self { disallowed: Regex::new(DISALLOWED)? })
    }

    /// Strip disallowed characters, then lowercase
    pub fn clean(&self, text: &str) -> String {
        self.disallowed.replace_all(text, "").to_lowercase()
    }
}
