// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Mini-batch gradient descent over the training windows.
//
// Per batch:
//   1. forward pass → logits [batch, L, vocab]
//   2. cross-entropy against the shifted targets, averaged over
//      every position of every window
//   3. loss.backward() → gradients for all parameters
//   4. one Adam step, updating the model
//   5. the gradients are dropped; each backward() starts from zero
//
// Batches are contiguous and in corpus order, the last one may
// be short, and nothing is shuffled between epochs.
//
// The reported epoch loss weights every batch by its token
// count, so a short final batch counts for exactly what it holds.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    optim::{GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::data::{batcher::SequenceBatcher, windows::SequenceWindows};
use crate::domain::error::PipelineError;
use crate::ml::model::{CharRnn, CharRnnOutput};

/// Token-weighted running mean of batch losses.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunningLoss {
    weighted_sum: f64,
    tokens:       usize,
}

impl RunningLoss {
    pub fn add<B: Backend>(&mut self, output: &CharRnnOutput<B>) {
        let tokens = output.num_tokens();
        self.weighted_sum += output.loss_value() * tokens as f64;
        self.tokens       += tokens;
    }

    /// `None` until at least one token has been seen
    pub fn mean(&self) -> Option<f64> {
        (self.tokens > 0).then(|| self.weighted_sum / self.tokens as f64)
    }

    pub fn tokens(&self) -> usize {
        self.tokens
    }
}

/// Everything the optimisation step mutates, owned by one Trainer.
pub struct TrainingState<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<CharRnn<B>, B>,
{
    model: CharRnn<B>,
    optim: O,
    lr:    f64,
}

impl<B, O> TrainingState<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<CharRnn<B>, B>,
{
    pub fn new(model: CharRnn<B>, optim: O, lr: f64) -> Self {
        Self { model, optim, lr }
    }

    /// Backward pass plus one optimiser step
    fn apply(&mut self, loss: Tensor<B, 1>) {
        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &self.model);
        let model = self.model.clone();
        self.model = self.optim.step(self.lr, model, grads);
    }
}

pub struct Trainer<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<CharRnn<B>, B>,
{
    state:      TrainingState<B, O>,
    batch_size: usize,
    device:     B::Device,
}

impl<B, O> Trainer<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<CharRnn<B>, B>,
{
    pub fn new(state: TrainingState<B, O>, batch_size: usize, device: B::Device) -> Self {
        Self { state, batch_size, device }
    }

    /// Run one pass over `split` and return the token-weighted mean loss.
    pub fn train_epoch(&mut self, split: &SequenceWindows) -> Result<f64> {
        if split.is_empty() {
            return Err(PipelineError::EmptySplit { split: "training" }.into());
        }

        let loader = DataLoaderBuilder::new(SequenceBatcher::<B>::new(self.device.clone()))
            .batch_size(self.batch_size)
            .build(split.clone());

        let mut running = RunningLoss::default();
        let mut batches = 0usize;

        for batch in loader.iter() {
            let output = self.state.model.forward_step(batch.inputs, batch.targets);
            running.add(&output);
            batches += 1;

            self.state.apply(output.loss);
        }

        let mean = running
            .mean()
            .ok_or(PipelineError::EmptySplit { split: "training" })?;

        tracing::debug!("Epoch done: {} batches, {} tokens", batches, running.tokens());
        Ok(mean)
    }

    pub fn model(&self) -> &CharRnn<B> {
        &self.state.model
    }

    pub fn into_model(self) -> CharRnn<B> {
        self.state.model
    }
}
