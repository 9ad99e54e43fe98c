// ============================================================
// Layer 3 — Character Vocabulary
// ============================================================
// A bijection between the distinct characters of a corpus and
// the dense index range [0, len).
//
// Indices are assigned in sorted character order, so two runs
// over the same text always produce the same mapping:
//
//   "abcabc"  →  { 'a': 0, 'b': 1, 'c': 2 }
//
// The vocabulary also acts as the sequence encoder. Encoding is
// total: a character the corpus never contained (e.g. in a
// generation seed) maps to FALLBACK_INDEX instead of failing.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Index used for characters outside the vocabulary
pub const FALLBACK_INDEX: usize = 0;

/// Character shown for an index with no mapping
pub const FALLBACK_CHAR: char = '?';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    char_to_index: BTreeMap<char, usize>,
    index_to_char: Vec<char>,
}

impl Vocabulary {
    /// Scan `text` and assign one index per distinct character,
    /// in ascending character order.
    pub fn build(text: &str) -> Self {
        let distinct: BTreeSet<char> = text.chars().collect();
        let index_to_char: Vec<char> = distinct.into_iter().collect();
        let char_to_index = index_to_char
            .iter()
            .enumerate()
            .map(|(i, &c)| (c, i))
            .collect();

        Self { char_to_index, index_to_char }
    }

    pub fn len(&self) -> usize {
        self.index_to_char.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_to_char.is_empty()
    }

    /// Index of `c`, or [`FALLBACK_INDEX`] when `c` was never seen.
    ///
    /// This is a total function: it never fails, and the miss case
    /// is indistinguishable from the character stored at index 0.
    /// Use [`Vocabulary::lookup`] when the difference matters.
    pub fn index_of(&self, c: char) -> usize {
        self.lookup(c).unwrap_or(FALLBACK_INDEX)
    }

    /// Index of `c` if it belongs to the vocabulary
    pub fn lookup(&self, c: char) -> Option<usize> {
        self.char_to_index.get(&c).copied()
    }

    /// Character stored at `index`, if any
    pub fn char_of(&self, index: usize) -> Option<char> {
        self.index_to_char.get(index).copied()
    }

    /// Encode every character of `text`, one index per character
    pub fn encode(&self, text: &str) -> Vec<u32> {
        text.chars().map(|c| self.index_of(c) as u32).collect()
    }

    /// Decode indices back to text, showing [`FALLBACK_CHAR`] for
    /// indices outside the vocabulary
    pub fn decode(&self, indices: &[u32]) -> String {
        indices
            .iter()
            .map(|&i| self.char_of(i as usize).unwrap_or(FALLBACK_CHAR))
            .collect()
    }

    /// All characters in index order
    pub fn chars(&self) -> &[char] {
        &self.index_to_char
    }

    /// Serialise both mappings as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a vocabulary written by [`Vocabulary::to_json`] and check
    /// that the two mappings are still inverse to each other.
    pub fn from_json(json: &str) -> Result<Self> {
        let vocab: Self = serde_json::from_str(json)?;

        if vocab.char_to_index.len() != vocab.index_to_char.len() {
            bail!(
                "vocabulary mappings disagree in size: {} vs {}",
                vocab.char_to_index.len(),
                vocab.index_to_char.len()
            );
        }
        for (i, c) in vocab.index_to_char.iter().enumerate() {
            if vocab.char_to_index.get(c) != Some(&i) {
                bail!("vocabulary mapping for {c:?} does not round-trip to index {i}");
            }
        }

        Ok(vocab)
    }
}
