// ============================================================
// Layer 4 — Train/Evaluation Splitter
// ============================================================
// Splits the windows into two contiguous, ordered parts:
//   - Training set:   the first ⌊fraction · n⌋ sequences
//   - Evaluation set: everything after that
//
// There is no shuffle. Adjacent windows overlap in all but one
// character, so a random split would put near-copies of each
// evaluation window into the training set. Splitting by position
// keeps the evaluation text genuinely later in the corpus.
//
// Split ratio: 80% training, 20% evaluation (configurable)

use crate::data::windows::SequenceWindows;

/// Number of leading items that go to training: `⌊total · fraction⌋`,
/// clamped to `[0, total]`.
pub fn split_index(total: usize, train_fraction: f64) -> usize {
    let split_at = (total as f64 * train_fraction).floor();
    if split_at <= 0.0 {
        0
    } else {
        (split_at as usize).min(total)
    }
}

/// Split `windows` into (train, evaluation) by position.
pub fn split_ordered(
    windows:        &SequenceWindows,
    train_fraction: f64,
) -> (SequenceWindows, SequenceWindows) {
    let total    = windows.len();
    let split_at = split_index(total, train_fraction);
    let (train, eval) = windows.split_at(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} evaluation ({}% / {}%)",
        train.len(),
        eval.len(),
        (train.len() * 100) / total.max(1),
        (eval.len()  * 100) / total.max(1),
    );

    (train, eval)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn windows(n: usize) -> SequenceWindows {
        // seq_len 1 over n + 1 indices gives exactly n pairs
        SequenceWindows::new((0..=n as u32).collect(), 1)
    }

    #[test]
    fn test_correct_split_sizes() {
        let (train, eval) = split_ordered(&windows(100), 0.8);
        assert_eq!(train.len(), 80);
        assert_eq!(eval.len(),  20);
    }

    #[test]
    fn test_split_truncates_towards_training_floor() {
        // 0.8 * 9 = 7.2 → 7 train, 2 eval
        let (train, eval) = split_ordered(&windows(9), 0.8);
        assert_eq!(train.len(), 7);
        assert_eq!(eval.len(),  2);
    }

    #[test]
    fn test_split_is_ordered() {
        let (train, eval) = split_ordered(&windows(10), 0.8);
        assert_eq!(train.get(7).unwrap().input, vec![7]);
        assert_eq!(eval.get(0).unwrap().input,  vec![8]);
    }

    #[test]
    fn test_all_items_preserved() {
        let (train, eval) = split_ordered(&windows(50), 0.7);
        assert_eq!(train.len() + eval.len(), 50);
    }

    #[test]
    fn test_empty_dataset() {
        let (train, eval) = split_ordered(&windows(0), 0.8);
        assert!(train.is_empty());
        assert!(eval.is_empty());
    }

    #[test]
    fn test_split_index_clamps() {
        assert_eq!(split_index(10, 1.0), 10);
        assert_eq!(split_index(10, 1.5), 10);
        assert_eq!(split_index(10, 0.0), 0);
        assert_eq!(split_index(10, -0.5), 0);
    }
}
