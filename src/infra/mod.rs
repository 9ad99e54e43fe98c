// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Persistence that other layers use but that belongs to none
// of them:
//
//   checkpoint.rs — the trained-model artifact
//                   One full-precision .mpk.gz file holding the model
//                   parameters and the vocabulary, plus the run's
//                   TrainConfig as JSON.
//
//   metrics.rs    — training metrics logging
//                   Writes epoch-level loss and accuracy to a CSV
//                   file for later analysis and plotting.
//
// Reference: Burn Book §5 (Checkpointing)

/// Trained model artifact saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;
