// ============================================================
// Layer 4 — Sliding-Window Sequences
// ============================================================
// Turns the encoded corpus into fixed-length (input, target)
// pairs with stride 1. The target is the input shifted one
// position to the right:
//
//   stream  = [0, 1, 2, 0, 1, 2]        L = 2
//
//   i = 0   input [0, 1]   target [1, 2]
//   i = 1   input [1, 2]   target [2, 0]
//   i = 2   input [2, 0]   target [0, 1]
//   i = 3   input [0, 1]   target [1, 2]
//
// A stream of N indices yields N − L pairs (none when N ≤ L).
//
// Windows overlap almost entirely, so storing them would cost
// 2·L integers per corpus character. SequenceWindows keeps one
// shared copy of the stream and slices pairs out on demand.
//
// Reference: Burn Book §4 (Datasets)

use std::{ops::Range, sync::Arc};

use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One training example: a window and its one-step-ahead target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencePair {
    pub input:  Vec<u32>,
    pub target: Vec<u32>,
}

/// An ordered, lazily materialised range of sequence pairs
/// over a shared encoded stream.
#[derive(Debug, Clone)]
pub struct SequenceWindows {
    stream:  Arc<[u32]>,
    seq_len: usize,
    /// Start offsets (into `stream`) of the windows in this view
    starts:  Range<usize>,
}

impl SequenceWindows {
    /// Build every window of length `seq_len` over `stream`
    pub fn new(stream: Vec<u32>, seq_len: usize) -> Self {
        let count = stream.len().saturating_sub(seq_len);
        Self {
            stream: stream.into(),
            seq_len,
            starts: 0..count,
        }
    }

    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    /// Number of pairs in this view
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// The `index`-th pair of this view
    pub fn get(&self, index: usize) -> Option<SequencePair> {
        if index >= self.len() {
            return None;
        }
        let start = self.starts.start + index;
        let end   = start + self.seq_len;
        Some(SequencePair {
            input:  self.stream[start..end].to_vec(),
            target: self.stream[start + 1..end + 1].to_vec(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = SequencePair> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Split into `[0, mid)` and `[mid, len)`, both sharing the stream.
    /// `mid` is clamped to the view length.
    pub fn split_at(&self, mid: usize) -> (Self, Self) {
        let mid   = self.starts.start + mid.min(self.len());
        let left  = Self { starts: self.starts.start..mid, ..self.clone() };
        let right = Self { starts: mid..self.starts.end, ..self.clone() };
        (left, right)
    }
}

impl Dataset<SequencePair> for SequenceWindows {
    fn get(&self, index: usize) -> Option<SequencePair> {
        SequenceWindows::get(self, index)
    }

    fn len(&self) -> usize {
        SequenceWindows::len(self)
    }
}
