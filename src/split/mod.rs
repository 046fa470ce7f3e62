//! Sentence splitting pipeline.
//!
//! One `split` call runs the full chain: tokenize, align tokens to character
//! spans, schedule overlapping windows, score each window against the
//! backend, reconcile the overlapping predictions, and cut sentences at the
//! characters whose probability clears the threshold. Every intermediate
//! container is created for the call and dropped on return; nothing is shared
//! across calls or threads.

pub mod aggregate;
pub mod align;
pub mod extract;
pub mod window;

use tokenizers::Tokenizer;

use crate::backend::ScoringBackend;
use crate::config::SplitConfig;
use crate::error::Result;
use crate::split::aggregate::ScoreAccumulator;
use crate::split::window::Windows;
use crate::tokenize;

/// Sentence splitter backed by a remote scoring model.
///
/// # Example
/// ```no_run
/// use satsplit::{SplitConfig, Splitter, TritonBackend};
/// use tokenizers::Tokenizer;
///
/// let backend = TritonBackend::new("localhost", 8000, "sat_3l_sm")?;
/// backend.ensure_ready()?;
/// let tokenizer = Tokenizer::from_file(satsplit::fetch_tokenizer(None)?)?;
/// let splitter = Splitter::new(backend, tokenizer, SplitConfig::default())?;
///
/// let sentences = splitter.split("Hello world. This is a test.")?;
/// assert_eq!(sentences.len(), 2);
/// # Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
/// ```
pub struct Splitter<B: ScoringBackend> {
    backend: B,
    tokenizer: Tokenizer,
    config: SplitConfig,
}

impl<B: ScoringBackend> Splitter<B> {
    /// Creates a splitter; fails if the configuration is invalid.
    pub fn new(backend: B, tokenizer: Tokenizer, config: SplitConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            backend,
            tokenizer,
            config,
        })
    }

    /// Splits `text` into ordered sentences.
    ///
    /// Empty input returns an empty list without touching the backend. Any
    /// tokenizer or backend failure aborts the whole call; there is no
    /// partial-result mode.
    pub fn split(&self, text: &str) -> Result<Vec<String>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let char_probs = self.predict_char_probs(text)?;
        Ok(extract::extract_sentences(
            text,
            &char_probs,
            self.config.threshold,
        ))
    }

    /// Returns the boundary probability for every character of `text`.
    pub fn predict_char_probs(&self, text: &str) -> Result<Vec<f32>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let (token_ids, token_strings) = tokenize::encode(&self.tokenizer, text)?;
        let spans = align::align_tokens(text, &token_strings);

        let mut accumulator = ScoreAccumulator::new(token_ids.len());
        let windows = Windows::new(token_ids.len(), self.config.block_size, self.config.stride);
        for window in windows {
            let (input_ids, attention_mask) =
                self.frame_window(&token_ids[window.start..window.end]);
            let scores = self.backend.score(&input_ids, &attention_mask)?;
            accumulator.add_window(window, &scores)?;
        }

        let token_probs = accumulator.into_probs();
        Ok(extract::token_to_char_probs(
            text.chars().count(),
            &token_probs,
            &spans,
        ))
    }

    /// Wraps a window's token ids with the configured boundary markers.
    fn frame_window(&self, tokens: &[i64]) -> (Vec<i64>, Vec<i64>) {
        let mut input_ids = Vec::with_capacity(tokens.len() + 2);
        input_ids.push(self.config.cls_token_id);
        input_ids.extend_from_slice(tokens);
        input_ids.push(self.config.sep_token_id);
        let attention_mask = vec![1i64; input_ids.len()];
        (input_ids, attention_mask)
    }
}
