// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that describe the problem, with no Burn
// tensors, no file I/O and no model code:
//
//   vocabulary.rs — the char ↔ index bijection and the encoder
//   error.rs      — the configurations the pipeline rejects
//   traits.rs     — seams implemented by other layers
//
// Everything here can be tested without a backend.

/// Character vocabulary and sequence encoder
pub mod vocabulary;

/// Pipeline configuration errors
pub mod error;

/// Core abstractions (traits) that other layers implement
pub mod traits;
