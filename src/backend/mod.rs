//! Scoring backend seam.
//!
//! The pipeline never talks to a model directly; it hands a framed token
//! window to a [`ScoringBackend`] and gets raw per-position scores back. The
//! shipped implementation is the Triton HTTP adapter in [`triton`].

pub mod triton;

use ndarray::Array2;

use crate::error::Result;

pub use triton::TritonBackend;

/// A model endpoint that scores one token window per call.
///
/// The window arrives already framed with the boundary-marker ids. An
/// implementation must return one row per submitted position, in order, with
/// at least one label column; only column 0 is read downstream.
pub trait ScoringBackend {
    /// Scores a single framed window. Shape: `[input_ids.len(), num_labels]`.
    fn score(&self, input_ids: &[i64], attention_mask: &[i64]) -> Result<Array2<f32>>;
}

impl<B: ScoringBackend + ?Sized> ScoringBackend for &B {
    fn score(&self, input_ids: &[i64], attention_mask: &[i64]) -> Result<Array2<f32>> {
        (**self).score(input_ids, attention_mask)
    }
}
