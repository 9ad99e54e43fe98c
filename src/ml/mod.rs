// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn model code lives here:
//
//   model.rs     — CharRnn: embedding → LSTM → linear logits
//   trainer.rs   — TrainingState + per-epoch Adam loop
//   evaluator.rs — loss and token accuracy on held-out windows
//   generator.rs — character-by-character sampling
//
// Every component is generic over the backend and takes its
// device as a constructor argument. The concrete backend is
// chosen once, below, and handed down by the application layer.
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

use burn::prelude::Backend;

/// Character-level recurrent model
pub mod model;

/// Training loop and optimiser state
pub mod trainer;

/// Inference-only scoring
pub mod evaluator;

/// Autoregressive text sampling
pub mod generator;

/// Backend used for evaluation, generation and saved artifacts
#[cfg(not(feature = "wgpu"))]
pub type InnerBackend = burn::backend::NdArray;

/// Backend used for evaluation, generation and saved artifacts
#[cfg(feature = "wgpu")]
pub type InnerBackend = burn::backend::Wgpu;

/// Backend used for training (records the autodiff graph)
pub type TrainBackend = burn::backend::Autodiff<InnerBackend>;

pub type Device = <InnerBackend as Backend>::Device;
