// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load the numbered corpus files    (Layer 4 - data)
//   Step 2: Clean the text                    (Layer 4 - data)
//   Step 3: Build the vocabulary, encode      (Layer 3 - domain)
//   Step 4: Slice into sliding windows        (Layer 4 - data)
//   Step 5: Ordered train/evaluation split    (Layer 4 - data)
//   Step 6: Save config, open metrics log     (Layer 6 - infra)
//   Step 7: Train + evaluate every epoch      (Layer 5 - ml)
//   Step 8: Sample text for each seed phrase  (Layer 5 - ml)
//   Step 9: Save the model artifact           (Layer 6 - infra)
//
// Steps 1–5 reject impossible inputs up front (empty corpus,
// no windows, an empty split) instead of letting them surface
// as NaN losses halfway through training.

use anyhow::Result;
use burn::{
    module::AutodiffModule,
    optim::AdamConfig,
    prelude::*,
};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    loader::CorpusLoader,
    preprocessor::Preprocessor,
    splitter::split_ordered,
    windows::SequenceWindows,
};
use crate::domain::{
    error::PipelineError,
    traits::{CorpusSource, TextGenerator},
    vocabulary::Vocabulary,
};
use crate::infra::{
    checkpoint::ArtifactStore,
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::{
    evaluator::Evaluator,
    generator::Generator,
    model::{CharRnn, CharRnnConfig},
    trainer::{Trainer, TrainingState},
    Device, InnerBackend, TrainBackend,
};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Saved next to the artifact as JSON so a run can be reproduced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_dir:       String,
    pub file_prefix:    String,
    pub file_count:     usize,
    pub checkpoint_dir: String,
    pub seq_len:        usize,
    pub batch_size:     usize,
    pub epochs:         usize,
    pub lr:             f64,
    pub hidden_size:    usize,
    pub train_fraction: f64,
    pub max_length:     usize,
    pub seed_phrases:   Vec<String>,
    pub seed:           Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir:       "data".to_string(),
            file_prefix:    "HPBook".to_string(),
            file_count:     7,
            checkpoint_dir: "checkpoints".to_string(),
            seq_len:        50,
            batch_size:     32,
            epochs:         5,
            lr:             1e-3,
            hidden_size:    128,
            train_fraction: 0.8,
            max_length:     100,
            seed_phrases:   ["harry potter", "the boy", "magic was", "dumbledore"]
                .map(String::from)
                .to_vec(),
            seed:           None,
        }
    }
}

impl TrainConfig {
    /// Reject hyperparameters no run can succeed with.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let invalid = |msg: &str| Err(PipelineError::InvalidConfig(msg.to_string()));

        if self.seq_len == 0 {
            return invalid("seq_len must be at least 1");
        }
        if self.batch_size == 0 {
            return invalid("batch_size must be at least 1");
        }
        if self.hidden_size == 0 {
            return invalid("hidden_size must be at least 1");
        }
        if !(self.lr.is_finite() && self.lr > 0.0) {
            return invalid("lr must be a positive number");
        }
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            return invalid("train_fraction must lie strictly between 0 and 1");
        }
        Ok(())
    }
}

// ─── Corpus Preparation ──────────────────────────────────────────────────────
/// The encoded corpus, ready for training.
#[derive(Debug, Clone)]
pub struct PreparedCorpus {
    pub vocab: Vocabulary,
    pub train: SequenceWindows,
    pub eval:  SequenceWindows,
}

/// Steps 2–5: clean, build the vocabulary, window, split.
pub fn prepare_corpus(raw: &str, cfg: &TrainConfig) -> Result<PreparedCorpus> {
    let text = Preprocessor::new()?.clean(raw);
    if text.is_empty() {
        return Err(PipelineError::EmptyCorpus.into());
    }
    let corpus_len = text.chars().count();
    tracing::info!("Corpus size: {} characters", corpus_len);

    let vocab = Vocabulary::build(&text);
    if vocab.is_empty() {
        return Err(PipelineError::EmptyVocabulary.into());
    }
    tracing::info!("Vocabulary size: {} characters", vocab.len());

    let windows = SequenceWindows::new(vocab.encode(&text), cfg.seq_len);
    if windows.is_empty() {
        return Err(PipelineError::NoSequences { corpus_len, seq_len: cfg.seq_len }.into());
    }
    tracing::info!("Built {} training sequences", windows.len());

    let (train, eval) = split_ordered(&windows, cfg.train_fraction);
    if train.is_empty() {
        return Err(PipelineError::EmptySplit { split: "training" }.into());
    }
    if eval.is_empty() {
        return Err(PipelineError::EmptySplit { split: "evaluation" }.into());
    }
    tracing::info!("Split: {} train, {} evaluation", train.len(), eval.len());

    Ok(PreparedCorpus { vocab, train, eval })
}

/// Continue every seed phrase once.
pub fn sample_seeds(
    generator:  &mut impl TextGenerator,
    seeds:      &[String],
    max_length: usize,
) -> Result<Vec<(String, String)>> {
    seeds
        .iter()
        .map(|seed| -> Result<(String, String)> {
            Ok((seed.clone(), generator.continue_text(seed, max_length)?))
        })
        .collect()
}

// ─── TrainSummary ─────────────────────────────────────────────────────────────
/// What a finished run reports back to the CLI.
#[derive(Debug, Clone)]
pub struct TrainSummary {
    pub vocab_size:      usize,
    pub train_sequences: usize,
    pub eval_sequences:  usize,
    pub epochs:          Vec<EpochMetrics>,
    /// (seed phrase, generated text)
    pub samples:         Vec<(String, String)>,
    /// The artifact file as written to disk
    pub artifact:        PathBuf,
}

impl TrainSummary {
    /// Epoch with the lowest evaluation loss
    pub fn best_epoch(&self) -> Option<&EpochMetrics> {
        self.epochs
            .iter()
            .min_by(|a, b| a.eval_loss.total_cmp(&b.eval_loss))
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
    device: Device,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig, device: Device) -> Self {
        Self { config, device }
    }

    /// Train on the numbered corpus files named by the config
    pub fn execute(&self) -> Result<TrainSummary> {
        let cfg    = &self.config;
        let loader = CorpusLoader::new(&cfg.data_dir, cfg.file_prefix.as_str(), cfg.file_count);
        tracing::info!("Loading corpus from '{}'", cfg.data_dir);
        self.run(&loader)
    }

    /// Execute the full pipeline on any corpus source
    pub fn run(&self, source: &impl CorpusSource) -> Result<TrainSummary> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Steps 1–5: corpus → windows ───────────────────────────────────────
        let raw    = source.load_corpus()?;
        let corpus = prepare_corpus(&raw, cfg)?;

        // ── Step 6: persistence and metrics ───────────────────────────────────
        let store = ArtifactStore::new(&cfg.checkpoint_dir)?;
        store.save_config(cfg)?;
        let metrics_log = MetricsLogger::new(store.dir())?;

        // ── Step 7: train + evaluate ──────────────────────────────────────────
        if let Some(seed) = cfg.seed {
            TrainBackend::seed(seed);
        }

        let model = CharRnnConfig::new(corpus.vocab.len())
            .with_hidden_size(cfg.hidden_size)
            .init::<TrainBackend>(&self.device);
        let optim = AdamConfig::new()
            .with_epsilon(1e-8)
            .init::<TrainBackend, CharRnn<TrainBackend>>();
        tracing::info!("Model ready: hidden_size={}, vocab={}", cfg.hidden_size, corpus.vocab.len());

        let mut trainer = Trainer::new(
            TrainingState::new(model, optim, cfg.lr),
            cfg.batch_size,
            self.device.clone(),
        );
        let evaluator = Evaluator::<InnerBackend>::new(cfg.batch_size, self.device.clone());

        let mut history = Vec::with_capacity(cfg.epochs);
        let mut best    = f64::INFINITY;

        for epoch in 1..=cfg.epochs {
            let train_loss = trainer.train_epoch(&corpus.train)?;
            let report     = evaluator.evaluate(&trainer.model().valid(), &corpus.eval)?;

            println!(
                "Epoch {:>3}/{} | train_loss={:.4} | eval_loss={:.4} | accuracy={:.4}",
                epoch, cfg.epochs, train_loss, report.loss, report.accuracy,
            );

            let metrics = EpochMetrics::new(epoch, train_loss, report.loss, report.accuracy);
            if metrics.is_improvement(best) {
                best = metrics.eval_loss;
                tracing::info!("Best evaluation loss so far: {:.4} (epoch {})", best, epoch);
            }
            metrics_log.log(&metrics)?;
            history.push(metrics);
        }

        // ── Step 8: sample ────────────────────────────────────────────────────
        let model = trainer.into_model().valid();
        let rng   = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        let mut generator = Generator::new(&model, &corpus.vocab, self.device.clone(), rng);
        let samples = sample_seeds(&mut generator, &cfg.seed_phrases, cfg.max_length)?;

        // ── Step 9: persist ───────────────────────────────────────────────────
        let artifact = store.save(&model, cfg.hidden_size, &corpus.vocab)?;
        tracing::info!("Training complete, artifact at '{}'", artifact.display());
        tracing::info!("Metrics written to '{}'", metrics_log.csv_path().display());

        Ok(TrainSummary {
            vocab_size:      corpus.vocab.len(),
            train_sequences: corpus.train.len(),
            eval_sequences:  corpus.eval.len(),
            epochs:          history,
            samples,
            artifact,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TrainConfig {
        TrainConfig { seq_len: 2, ..TrainConfig::default() }
    }

    fn pipeline_error(err: &anyhow::Error) -> Option<&PipelineError> {
        err.downcast_ref::<PipelineError>()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(TrainConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_impossible_values() {
        let bad = [
            TrainConfig { seq_len: 0, ..TrainConfig::default() },
            TrainConfig { batch_size: 0, ..TrainConfig::default() },
            TrainConfig { hidden_size: 0, ..TrainConfig::default() },
            TrainConfig { lr: 0.0, ..TrainConfig::default() },
            TrainConfig { lr: f64::NAN, ..TrainConfig::default() },
            TrainConfig { train_fraction: 1.0, ..TrainConfig::default() },
            TrainConfig { train_fraction: 0.0, ..TrainConfig::default() },
        ];
        for cfg in bad {
            assert!(
                matches!(cfg.validate(), Err(PipelineError::InvalidConfig(_))),
                "{cfg:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_prepare_abcabc() {
        // 4 windows → ⌊0.8 · 4⌋ = 3 train, 1 eval
        let corpus = prepare_corpus("ABCabc", &config()).unwrap();
        assert_eq!(corpus.vocab.chars(), &['a', 'b', 'c']);
        assert_eq!(corpus.train.len(), 3);
        assert_eq!(corpus.eval.len(), 1);
        assert_eq!(corpus.eval.get(0).unwrap().input, vec![0, 1]);
    }

    #[test]
    fn test_empty_corpus_is_a_config_error() {
        let err = prepare_corpus("", &config()).unwrap_err();
        assert_eq!(pipeline_error(&err), Some(&PipelineError::EmptyCorpus));

        // Nothing survives cleanup
        let err = prepare_corpus("@#$%^&*", &config()).unwrap_err();
        assert_eq!(pipeline_error(&err), Some(&PipelineError::EmptyCorpus));
    }

    #[test]
    fn test_empty_corpus_rejected_before_training() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            checkpoint_dir: dir.path().display().to_string(),
            ..config()
        };

        let err = TrainUseCase::new(cfg, Default::default()).run(&"").unwrap_err();
        assert_eq!(pipeline_error(&err), Some(&PipelineError::EmptyCorpus));
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_short_corpus_has_no_sequences() {
        let err = prepare_corpus("ab", &config()).unwrap_err();
        assert_eq!(
            pipeline_error(&err),
            Some(&PipelineError::NoSequences { corpus_len: 2, seq_len: 2 })
        );
    }

    #[test]
    fn test_single_window_leaves_training_empty() {
        // 1 window → ⌊0.8⌋ = 0 train
        let err = prepare_corpus("abc", &config()).unwrap_err();
        assert_eq!(
            pipeline_error(&err),
            Some(&PipelineError::EmptySplit { split: "training" })
        );
    }

    #[test]
    fn test_end_to_end_run() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            checkpoint_dir: dir.path().display().to_string(),
            seq_len:        8,
            batch_size:     4,
            epochs:         2,
            hidden_size:    8,
            lr:             1e-2,
            max_length:     20,
            seed_phrases:   vec!["the".to_string(), "".to_string()],
            seed:           Some(5),
            ..TrainConfig::default()
        };
        let corpus = "The sorting hat placed students in their houses. ".repeat(4);

        let summary = TrainUseCase::new(cfg, Default::default())
            .run(&corpus.as_str())
            .unwrap();

        assert_eq!(summary.epochs.len(), 2);
        assert!(summary.epochs.iter().all(|m| m.train_loss.is_finite()));
        assert_eq!(summary.train_sequences + summary.eval_sequences, corpus.len() - 8);

        assert_eq!(summary.samples.len(), 2);
        let (seed, text) = &summary.samples[0];
        assert!(text.starts_with(seed.as_str()));
        assert!(text.chars().count() <= seed.chars().count() + 20);

        assert_eq!(summary.artifact, dir.path().join("text_model.mpk.gz"));
        assert!(summary.artifact.exists());
        assert!(ArtifactStore::new(dir.path()).unwrap().load::<InnerBackend>(&Default::default()).is_ok());

        let best = summary.best_epoch().unwrap();
        assert!(summary.epochs.iter().all(|m| best.eval_loss <= m.eval_loss));
        assert!(dir.path().join("train_config.json").exists());
        assert!(dir.path().join("metrics.csv").exists());
    }
}
