// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from numbered text files on disk to tensor
// batches, in this order:
//
//   HPBook<n>.txt files
//       │
//       ▼
//   CorpusLoader      → concatenates the files into one string
//       │
//       ▼
//   Preprocessor      → filters to the allowed alphabet, lowercases
//       │
//       ▼
//   Vocabulary        → (domain layer) char ↔ index, encodes the text
//       │
//       ▼
//   SequenceWindows   → stride-1 (input, target) windows, Burn Dataset
//       │
//       ▼
//   split_ordered     → first 80% train, last 20% evaluate
//       │
//       ▼
//   SequenceBatcher   → stacks windows into [batch, L] Int tensors
//       │
//       ▼
//   DataLoader        → feeds contiguous batches to trainer/evaluator
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Loads numbered corpus files from a directory
pub mod loader;

/// Regex-based character filtering and lowercasing
pub mod preprocessor;

/// Fixed-length sliding windows over the encoded corpus
pub mod windows;

/// Ordered train/evaluation split
pub mod splitter;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
