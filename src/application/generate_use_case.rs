// ============================================================
// Layer 2 — GenerateUseCase
// ============================================================
// Loads a previously trained artifact and continues seed
// phrases with it. No corpus is read: the vocabulary comes
// from the artifact itself.

use anyhow::Result;
use rand::Rng;

use crate::domain::vocabulary::Vocabulary;
use crate::infra::checkpoint::ArtifactStore;
use crate::ml::{generator::Generator, model::CharRnn, Device, InnerBackend};

pub struct GenerateUseCase {
    model:  CharRnn<InnerBackend>,
    vocab:  Vocabulary,
    device: Device,
}

impl GenerateUseCase {
    pub fn new(checkpoint_dir: &str, device: Device) -> Result<Self> {
        let store          = ArtifactStore::new(checkpoint_dir)?;
        let (model, vocab) = store.load::<InnerBackend>(&device)?;
        Ok(Self { model, vocab, device })
    }

    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    /// Continue `seed` for at most `max_length` characters
    pub fn generate(&self, seed: &str, max_length: usize, rng: impl Rng) -> Result<String> {
        Generator::new(&self.model, &self.vocab, self.device.clone(), rng)
            .generate(seed, max_length)
    }
}
