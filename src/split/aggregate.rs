//! Overlap-aware score aggregation.
//!
//! Every window is scored independently, so a token covered by several
//! windows receives several predictions made under different surrounding
//! context. The accumulator reconciles them with a running mean.

use ndarray::Array2;

use crate::error::{Error, Result};
use crate::split::window::Window;

/// Logistic transform mapping a raw score onto (0, 1).
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Running per-token mean over overlapping window predictions.
///
/// Sized once from the token count and owned by a single pipeline call.
#[derive(Debug)]
pub struct ScoreAccumulator {
    sums: Vec<f32>,
    counts: Vec<u32>,
}

impl ScoreAccumulator {
    /// Creates an accumulator for `token_count` tokens.
    pub fn new(token_count: usize) -> Self {
        Self {
            sums: vec![0.0; token_count],
            counts: vec![0; token_count],
        }
    }

    /// Folds one window's raw scores into the running means.
    ///
    /// `scores` carries one row per submitted position, including the two
    /// boundary markers at the first and last row; those rows are discarded.
    /// Column 0 holds the boundary logit. Interior row `i + 1` belongs to
    /// absolute token index `window.start + i`.
    pub fn add_window(&mut self, window: Window, scores: &Array2<f32>) -> Result<()> {
        let interior = window.len();
        if scores.nrows() != interior + 2 {
            return Err(Error::Backend(format!(
                "expected {} scored positions for window [{}, {}), got {}",
                interior + 2,
                window.start,
                window.end,
                scores.nrows()
            )));
        }
        if scores.ncols() == 0 {
            return Err(Error::Backend(
                "score tensor has no label column".to_string(),
            ));
        }

        for i in 0..interior {
            let p = sigmoid(scores[[i + 1, 0]]);
            self.sums[window.start + i] += p;
            self.counts[window.start + i] += 1;
        }

        Ok(())
    }

    /// Number of windows that have scored the token at `index`.
    pub fn count(&self, index: usize) -> u32 {
        self.counts[index]
    }

    /// Final per-token probabilities: `sum / count` where the token was
    /// covered, 0 otherwise.
    pub fn into_probs(self) -> Vec<f32> {
        self.sums
            .into_iter()
            .zip(self.counts)
            .map(|(sum, count)| if count > 0 { sum / count as f32 } else { 0.0 })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores_from(logits: &[f32]) -> Array2<f32> {
        Array2::from_shape_vec((logits.len(), 1), logits.to_vec()).unwrap()
    }

    #[test]
    fn test_sigmoid() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }

    #[test]
    fn test_boundary_rows_discarded() {
        let mut acc = ScoreAccumulator::new(2);
        // Poisoned boundary rows: if they leaked in, both probabilities
        // would be pushed toward 1.
        let scores = scores_from(&[100.0, 0.0, 0.0, 100.0]);
        acc.add_window(Window { start: 0, end: 2 }, &scores).unwrap();

        let probs = acc.into_probs();
        assert!((probs[0] - 0.5).abs() < 1e-6);
        assert!((probs[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_mean_over_overlapping_windows() {
        let mut acc = ScoreAccumulator::new(3);
        // Token 1 is scored by both windows: once at logit 0 (p = 0.5) and
        // once at a strongly positive logit (p ~ 1). The mean lands between.
        acc.add_window(Window { start: 0, end: 2 }, &scores_from(&[0.0, 0.0, 0.0, 0.0]))
            .unwrap();
        acc.add_window(Window { start: 1, end: 3 }, &scores_from(&[0.0, 20.0, 0.0, 0.0]))
            .unwrap();

        assert_eq!(acc.count(0), 1);
        assert_eq!(acc.count(1), 2);
        assert_eq!(acc.count(2), 1);

        let probs = acc.into_probs();
        assert!((probs[0] - 0.5).abs() < 1e-6);
        assert!((probs[1] - 0.75).abs() < 1e-3);
        assert!((probs[2] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_uncovered_token_defaults_to_zero() {
        let mut acc = ScoreAccumulator::new(3);
        acc.add_window(Window { start: 0, end: 2 }, &scores_from(&[0.0, 5.0, 5.0, 0.0]))
            .unwrap();

        let probs = acc.into_probs();
        assert_eq!(probs.len(), 3);
        assert_eq!(probs[2], 0.0);
    }

    #[test]
    fn test_row_count_mismatch_rejected() {
        let mut acc = ScoreAccumulator::new(4);
        let scores = scores_from(&[0.0, 0.0, 0.0]);
        let result = acc.add_window(Window { start: 0, end: 4 }, &scores);
        assert!(matches!(result, Err(Error::Backend(_))));
    }

    #[test]
    fn test_extra_label_columns_ignored() {
        let mut acc = ScoreAccumulator::new(1);
        // Two label columns; only the first is read.
        let scores = Array2::from_shape_vec((3, 2), vec![0.0, 9.0, 20.0, -20.0, 0.0, 9.0]).unwrap();
        acc.add_window(Window { start: 0, end: 1 }, &scores).unwrap();

        let probs = acc.into_probs();
        assert!(probs[0] > 0.99);
    }
}
