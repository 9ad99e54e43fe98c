// ============================================================
// Layer 3 — Pipeline Errors
// ============================================================
// The conditions under which the pipeline refuses to run.
// Without these guards an empty corpus would surface much later
// as a divide-by-zero in the epoch average or a NaN loss.
//
// Everything else (I/O, persistence) travels as anyhow::Error
// with context attached at the call site.

use thiserror::Error;

/// A configuration the pipeline cannot run with.
///
/// These errors are wrapped in `anyhow::Error` as they propagate,
/// so callers that care can recover the variant with
/// `err.downcast_ref::<PipelineError>()`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    /// Nothing was left after loading and cleaning the corpus
    #[error("corpus is empty after loading and cleanup")]
    EmptyCorpus,

    /// The vocabulary has no characters, so no logits can be produced
    #[error("vocabulary is empty")]
    EmptyVocabulary,

    /// The corpus is not longer than one window
    #[error("corpus of {corpus_len} characters yields no sequences of length {seq_len}")]
    NoSequences { corpus_len: usize, seq_len: usize },

    /// A train or evaluation split ended up with zero sequences
    #[error("{split} split contains no sequences")]
    EmptySplit { split: &'static str },

    /// A hyperparameter is out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The output distribution could not be sampled (all-zero or NaN)
    #[error("cannot sample from output distribution: {0}")]
    SamplingFailed(String),
}
