// ============================================================
// Layer 5 — Evaluator
// ============================================================
// Scores a frozen model on the held-out windows.
//
// Run it on the inner (non-autodiff) backend, i.e. pass
// `model.valid()`: no graph is recorded and nothing is updated.
//
// Accuracy is counted, not averaged:
//   correct += #positions where argmax(logits) == target
//   total   += #positions
//   accuracy = correct / total
// so the result does not depend on how the split is batched.

use anyhow::Result;
use burn::{data::dataloader::DataLoaderBuilder, prelude::*};

use crate::data::{batcher::SequenceBatcher, windows::SequenceWindows};
use crate::domain::error::PipelineError;
use crate::ml::{model::CharRnn, trainer::RunningLoss};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalReport {
    /// Token-weighted mean cross-entropy
    pub loss:     f64,
    /// correct / total over the whole split
    pub accuracy: f64,
    pub correct:  usize,
    pub total:    usize,
}

pub struct Evaluator<B: Backend> {
    batch_size: usize,
    device:     B::Device,
}

impl<B: Backend> Evaluator<B> {
    pub fn new(batch_size: usize, device: B::Device) -> Self {
        Self { batch_size, device }
    }

    pub fn evaluate(&self, model: &CharRnn<B>, split: &SequenceWindows) -> Result<EvalReport> {
        if split.is_empty() {
            return Err(PipelineError::EmptySplit { split: "evaluation" }.into());
        }

        let loader = DataLoaderBuilder::new(SequenceBatcher::<B>::new(self.device.clone()))
            .batch_size(self.batch_size)
            .build(split.clone());

        let mut running = RunningLoss::default();
        let mut correct = 0usize;
        let mut total   = 0usize;

        for batch in loader.iter() {
            let output = model.forward_step(batch.inputs, batch.targets);
            running.add(&output);
            correct += output.num_correct();
            total   += output.num_tokens();
        }

        let loss = running
            .mean()
            .ok_or(PipelineError::EmptySplit { split: "evaluation" })?;

        Ok(EvalReport {
            loss,
            accuracy: correct as f64 / total as f64,
            correct,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    use crate::domain::vocabulary::Vocabulary;
    use crate::ml::model::CharRnnConfig;

    type TestBackend = NdArray;

    fn fixture() -> (CharRnn<TestBackend>, SequenceWindows) {
        let text    = "hermione granger was the brightest witch of her age.";
        let vocab   = Vocabulary::build(text);
        let windows = SequenceWindows::new(vocab.encode(text), 6);
        let model   = CharRnnConfig::new(vocab.len())
            .with_hidden_size(16)
            .init::<TestBackend>(&Default::default());
        (model, windows)
    }

    #[test]
    fn test_accuracy_is_invariant_to_batch_size() {
        let (model, windows) = fixture();

        let per_item = Evaluator::<TestBackend>::new(1, Default::default())
            .evaluate(&model, &windows)
            .unwrap();
        let whole = Evaluator::<TestBackend>::new(windows.len(), Default::default())
            .evaluate(&model, &windows)
            .unwrap();
        let uneven = Evaluator::<TestBackend>::new(7, Default::default())
            .evaluate(&model, &windows)
            .unwrap();

        assert_eq!(per_item.total, windows.len() * windows.seq_len());
        for report in [whole, uneven] {
            assert_eq!(report.correct, per_item.correct);
            assert_eq!(report.total, per_item.total);
            assert_eq!(report.accuracy, per_item.accuracy);
            assert!((report.loss - per_item.loss).abs() < 1e-4);
        }
    }

    #[test]
    fn test_accuracy_is_a_fraction() {
        let (model, windows) = fixture();
        let report = Evaluator::<TestBackend>::new(4, Default::default())
            .evaluate(&model, &windows)
            .unwrap();

        assert!((0.0..=1.0).contains(&report.accuracy));
        assert_eq!(report.accuracy, report.correct as f64 / report.total as f64);
    }

    #[test]
    fn test_empty_split_is_rejected() {
        let (model, _) = fixture();
        let empty      = SequenceWindows::new(vec![0, 1, 2], 6);

        let err = Evaluator::<TestBackend>::new(4, Default::default())
            .evaluate(&model, &empty)
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<PipelineError>(),
            Some(&PipelineError::EmptySplit { split: "evaluation" })
        );
    }
}
