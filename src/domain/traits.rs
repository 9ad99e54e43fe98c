// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer talks to these traits, not to the
// concrete loaders, so a different corpus source (a single
// file, an in-memory string in tests) can be swapped in.

use anyhow::Result;

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Any component that can produce the raw training text.
///
/// Implementations:
///   - CorpusLoader → numbered text files in a directory
///   - &str         → an in-memory corpus
pub trait CorpusSource {
    /// Load the full raw corpus as one string.
    /// An empty string is a valid result; rejecting it is the caller's job.
    fn load_corpus(&self) -> Result<String>;
}

impl CorpusSource for &str {
    fn load_corpus(&self) -> Result<String> {
        Ok((*self).to_string())
    }
}

// ─── TextGenerator ────────────────────────────────────────────────────────────
/// Any component that can continue a seed phrase.
pub trait TextGenerator {
    /// Continue `seed` for at most `max_length` characters.
    /// The returned text starts with `seed`.
    fn continue_text(&mut self, seed: &str, max_length: usize) -> Result<String>;
}
