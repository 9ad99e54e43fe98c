// ============================================================
// Layer 4 — Sequence Batcher
// ============================================================
// Implements Burn's Batcher trait to stack SequencePairs into
// tensors the model can consume.
//
//   Input:  Vec of N SequencePairs, each holding two windows of length L
//   Output: SequenceBatch with two Int tensors of shape [N, L]
//
// All windows share the same length, so no padding is needed:
// the pairs are flattened row by row and reshaped.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::windows::SequencePair;

/// A batch of windows ready for the forward pass.
#[derive(Debug, Clone)]
pub struct SequenceBatch<B: Backend> {
    /// Input windows — shape: [batch_size, seq_len]
    pub inputs: Tensor<B, 2, Int>,

    /// Next-character targets — shape: [batch_size, seq_len]
    pub targets: Tensor<B, 2, Int>,
}

/// Builds SequenceBatches on a fixed device
#[derive(Clone, Debug)]
pub struct SequenceBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> SequenceBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    fn stack<'a>(
        &self,
        rows:    impl Iterator<Item = &'a [u32]>,
        shape:   [usize; 2],
    ) -> Tensor<B, 2, Int> {
        let flat: Vec<i32> = rows
            .flat_map(|row| row.iter().map(|&x| x as i32))
            .collect();

        Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device).reshape(shape)
    }
}

impl<B: Backend> Batcher<SequencePair, SequenceBatch<B>> for SequenceBatcher<B> {
    fn batch(&self, items: Vec<SequencePair>) -> SequenceBatch<B> {
        let batch_size = items.len();
        let seq_len    = items.first().map_or(0, |p| p.input.len());
        let shape      = [batch_size, seq_len];

        let inputs  = self.stack(items.iter().map(|p| p.input.as_slice()), shape);
        let targets = self.stack(items.iter().map(|p| p.target.as_slice()), shape);

        SequenceBatch { inputs, targets }
    }
}
