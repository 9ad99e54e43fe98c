// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Reads a numbered series of plain-text files and concatenates
// them into one corpus:
//
//   data/HPBook1.txt ─┐
//   data/HPBook2.txt ─┼─→ "<book 1>\n<book 2>\n..."
//   data/HPBook3.txt ─┘
//
// Each file's content is followed by a single newline. Files
// missing from the series are skipped without error, so a
// partial collection still trains.

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};

use crate::domain::traits::CorpusSource;

/// Loads `<dir>/<prefix><i>.txt` for `i` in `1..=count`.
pub struct CorpusLoader {
    dir:    PathBuf,
    prefix: String,
    count:  usize,
}

impl CorpusLoader {
    pub fn new(dir: impl AsRef<Path>, prefix: impl Into<String>, count: usize) -> Self {
        Self {
            dir:    dir.as_ref().to_path_buf(),
            prefix: prefix.into(),
            count,
        }
    }

    /// The path of the i-th file in the series (1-based)
    pub fn file_path(&self, i: usize) -> PathBuf {
        self.dir.join(format!("{}{}.txt", self.prefix, i))
    }
}

impl CorpusSource for CorpusLoader {
    fn load_corpus(&self) -> Result<String> {
        let mut text   = String::new();
        let mut loaded = 0usize;

        for i in 1..=self.count {
            let path = self.file_path(i);

            if !path.is_file() {
                tracing::debug!("Skipping missing corpus file '{}'", path.display());
                continue;
            }

            let content = fs::read_to_string(&path)
                .with_context(|| format!("Cannot read corpus file '{}'", path.display()))?;

            tracing::debug!("Loaded '{}' ({} chars)", path.display(), content.chars().count());
            text.push_str(&content);
            text.push('\n');
            loaded += 1;
        }

        if loaded == 0 {
            tracing::warn!(
                "No '{}<n>.txt' files found in '{}'",
                self.prefix,
                self.dir.display()
            );
        }

        tracing::info!("Loaded {} of {} corpus files", loaded, self.count);
        Ok(text)
    }
}
