// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Persists the trained model so text can be generated later
// without the corpus.
//
// What gets saved:
//   1. text_model.mpk.gz — ONE artifact holding:
//        • the model parameters
//        • hidden_size (to rebuild the architecture)
//        • vocab_size
//        • the vocabulary (char → index and index → char) as JSON
//   2. train_config.json — the hyperparameters of the run, for
//      reference only; loading does not need it
//
// The recorder is named MessagePack + gzip at full precision, so
// the reloaded parameters are bit-identical to the trained ones.
// Loading fails if the record layout doesn't match.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{bail, Context, Result};
use std::{fs, path::PathBuf};
use burn::{
    prelude::*,
    record::{FileRecorder, FullPrecisionSettings, NamedMpkGzFileRecorder, Record, Recorder},
};

use crate::application::train_use_case::TrainConfig;
use crate::domain::vocabulary::Vocabulary;
use crate::ml::model::{CharRnn, CharRnnConfig, CharRnnRecord};

/// File stem of the artifact; the recorder appends its own extension
pub const ARTIFACT_NAME: &str = "text_model";

/// f32 parameters in, f32 parameters out
pub type ArtifactRecorder = NamedMpkGzFileRecorder<FullPrecisionSettings>;

/// Everything needed to rebuild a trained model in one record.
#[derive(Record)]
pub struct ArtifactRecord<B: Backend> {
    pub model:       CharRnnRecord<B>,
    pub hidden_size: usize,
    pub vocab_size:  usize,
    /// `Vocabulary::to_json`, both mappings
    pub vocabulary:  String,
}

/// Saves and loads the artifact in a fixed directory.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Create a new store, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Path without extension, as the recorder expects it
    pub fn artifact_path(&self) -> PathBuf {
        self.dir.join(ARTIFACT_NAME)
    }

    /// Where the recorder actually puts the artifact on disk
    pub fn artifact_file<B: Backend>(&self) -> PathBuf {
        self.artifact_path()
            .with_extension(<ArtifactRecorder as FileRecorder<B>>::file_extension())
    }

    /// Write the model and its vocabulary as a single artifact.
    /// Returns the path of the file written.
    pub fn save<B: Backend>(
        &self,
        model:       &CharRnn<B>,
        hidden_size: usize,
        vocab:       &Vocabulary,
    ) -> Result<PathBuf> {
        let path   = self.artifact_path();
        let record = ArtifactRecord::<B> {
            model:      model.clone().into_record(),
            hidden_size,
            vocab_size: vocab.len(),
            vocabulary: vocab.to_json()?,
        };

        ArtifactRecorder::new()
            .record(record, path.clone())
            .with_context(|| format!("Failed to save artifact to '{}'", path.display()))?;

        let file = self.artifact_file::<B>();
        tracing::debug!("Saved artifact '{}'", file.display());
        Ok(file)
    }

    /// Rebuild the model and vocabulary from the artifact.
    pub fn load<B: Backend>(&self, device: &B::Device) -> Result<(CharRnn<B>, Vocabulary)> {
        let path = self.artifact_path();

        let record: ArtifactRecord<B> = ArtifactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load artifact '{}'. Have you trained the model first?",
                    path.display())
            })?;

        let vocab = Vocabulary::from_json(&record.vocabulary)
            .with_context(|| format!("Corrupt vocabulary in '{}'", path.display()))?;
        if vocab.len() != record.vocab_size {
            bail!(
                "Artifact '{}' declares {} characters but its vocabulary has {}",
                path.display(),
                record.vocab_size,
                vocab.len()
            );
        }

        let model = CharRnnConfig::new(record.vocab_size)
            .with_hidden_size(record.hidden_size)
            .init::<B>(device)
            .load_record(record.model);

        tracing::info!(
            "Loaded artifact '{}' ({} chars, hidden {})",
            path.display(),
            vocab.len(),
            record.hidden_size
        );
        Ok((model, vocab))
    }

    /// Save the training configuration to JSON.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join("train_config.json");
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| {
                format!("Cannot write config to '{}'", path.display())
            })?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_artifact_round_trip() {
        let dir    = tempfile::tempdir().unwrap();
        let store  = ArtifactStore::new(dir.path()).unwrap();
        let device = Default::default();

        let vocab = Vocabulary::build("the golden snitch!");
        let model = CharRnnConfig::new(vocab.len())
            .with_hidden_size(12)
            .init::<TestBackend>(&device);

        let file = store.save(&model, 12, &vocab).unwrap();
        assert_eq!(file, dir.path().join("text_model.mpk.gz"));
        assert!(file.exists());

        let (loaded, loaded_vocab) = store.load::<TestBackend>(&device).unwrap();
        assert_eq!(loaded_vocab, vocab);

        let input = Tensor::<TestBackend, 1, Int>::from_ints([0, 3, 5, 1], &device)
            .reshape([1, 4]);
        model
            .forward(input.clone())
            .into_data()
            .assert_approx_eq(&loaded.forward(input).into_data(), 5);
    }

    #[test]
    fn test_reloaded_parameters_are_exact() {
        let dir    = tempfile::tempdir().unwrap();
        let store  = ArtifactStore::new(dir.path()).unwrap();
        let device = Default::default();

        let vocab = Vocabulary::build("expecto patronum");
        let model = CharRnnConfig::new(vocab.len())
            .with_hidden_size(12)
            .init::<TestBackend>(&device);
        store.save(&model, 12, &vocab).unwrap();
        let (loaded, _) = store.load::<TestBackend>(&device).unwrap();

        let floats = |t: Tensor<TestBackend, 2>| t.into_data().to_vec::<f32>().unwrap();
        assert_eq!(
            floats(model.embedding.weight.val()),
            floats(loaded.embedding.weight.val())
        );
        assert_eq!(
            floats(model.output.weight.val()),
            floats(loaded.output.weight.val())
        );
        let bias = |m: &CharRnn<TestBackend>| {
            m.output.bias.as_ref().unwrap().val().into_data().to_vec::<f32>().unwrap()
        };
        assert_eq!(bias(&model), bias(&loaded));
    }

    #[test]
    fn test_load_without_artifact_fails() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();
        assert!(store.load::<TestBackend>(&Default::default()).is_err());
    }

    #[test]
    fn test_save_config_writes_json() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();

        store.save_config(&TrainConfig::default()).unwrap();
        let json = fs::read_to_string(dir.path().join("train_config.json")).unwrap();
        let cfg: TrainConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.seq_len, 50);
    }
}
