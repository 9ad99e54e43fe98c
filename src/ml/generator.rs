// ============================================================
// Layer 5 — Generator
// ============================================================
// Autoregressive sampling, one character at a time:
//
//   context ──encode──▶ [1, 1] ──model──▶ logits ──softmax──▶ p
//      ▲                                                      │
//      └────────────── append ◀── decode ◀── sample(p) ◀──────┘
//
// The model only ever sees the single previous character (the
// LSTM state is fresh on every call), matching how it is queried
// during training at window position 0.
//
// Stops after `max_length` appended characters, or right after
// appending one of  . ! ?  — whichever comes first.
//
// Sampling draws from the full distribution. Greedy argmax
// decoding tends to loop on the most frequent character run.

use anyhow::Result;
use burn::{prelude::*, tensor::activation::softmax};
use rand::{
    distributions::{Distribution, WeightedIndex},
    Rng,
};

use crate::domain::{
    error::PipelineError,
    traits::TextGenerator,
    vocabulary::{Vocabulary, FALLBACK_CHAR},
};
use crate::ml::model::CharRnn;

/// Context used when the seed is empty
pub const DEFAULT_CONTEXT: char = 'h';

/// Characters that end generation once produced
pub const TERMINATORS: [char; 3] = ['.', '!', '?'];

/// The running buffer of one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationState {
    buffer:   String,
    context:  char,
    steps:    usize,
    finished: bool,
}

impl GenerationState {
    pub fn new(seed: &str) -> Self {
        Self {
            buffer:   seed.to_string(),
            context:  seed.chars().last().unwrap_or(DEFAULT_CONTEXT),
            steps:    0,
            finished: false,
        }
    }

    /// True once `max_length` characters were appended or a
    /// terminator was produced.
    pub fn is_terminal(&self, max_length: usize) -> bool {
        self.finished || self.steps >= max_length
    }

    pub fn context(&self) -> char {
        self.context
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Append a sampled character and make it the new context
    pub fn advance(&mut self, next: char) {
        self.buffer.push(next);
        self.context  = next;
        self.steps   += 1;
        self.finished = TERMINATORS.contains(&next);
    }

    pub fn into_text(self) -> String {
        self.buffer
    }
}

pub struct Generator<'a, B: Backend, R: Rng> {
    model:  &'a CharRnn<B>,
    vocab:  &'a Vocabulary,
    device: B::Device,
    rng:    R,
}

impl<'a, B: Backend, R: Rng> Generator<'a, B, R> {
    pub fn new(model: &'a CharRnn<B>, vocab: &'a Vocabulary, device: B::Device, rng: R) -> Self {
        Self { model, vocab, device, rng }
    }

    /// Continue `seed` until a terminator or `max_length` new characters.
    /// The returned text starts with `seed`.
    pub fn generate(&mut self, seed: &str, max_length: usize) -> Result<String> {
        if self.vocab.is_empty() {
            return Err(PipelineError::EmptyVocabulary.into());
        }
        if self.model.vocab_size() != self.vocab.len() {
            return Err(PipelineError::SamplingFailed(format!(
                "model predicts {} characters but the vocabulary has {}",
                self.model.vocab_size(),
                self.vocab.len()
            ))
            .into());
        }

        let mut state = GenerationState::new(seed);
        while !state.is_terminal(max_length) {
            let next = self.sample_next(state.context())?;
            state.advance(next);
        }

        tracing::debug!("Generated {} chars from seed {:?}", state.steps(), seed);
        Ok(state.into_text())
    }

    fn sample_next(&mut self, context: char) -> Result<char> {
        let index  = self.vocab.index_of(context) as i32;
        let input  = Tensor::<B, 1, Int>::from_ints([index], &self.device).reshape([1, 1]);
        let logits = self.model.forward(input);
        let [_, _, vocab_size] = logits.dims();

        let probs: Vec<f32> = softmax(logits.reshape([vocab_size]), 0)
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| PipelineError::SamplingFailed(format!("{e:?}")))?;

        let dist = WeightedIndex::new(&probs)
            .map_err(|e| PipelineError::SamplingFailed(e.to_string()))?;
        let sampled = dist.sample(&mut self.rng);

        Ok(self.vocab.char_of(sampled).unwrap_or(FALLBACK_CHAR))
    }
}

impl<B: Backend, R: Rng> TextGenerator for Generator<'_, B, R> {
    fn continue_text(&mut self, seed: &str, max_length: usize) -> Result<String> {
        self.generate(seed, max_length)
    }
}
