//! Subword tokenizer adapter.

use tokenizers::Tokenizer;

use crate::error::Result;

/// Encodes `text` without special tokens.
///
/// Returns the token ids and display strings as two sequences of equal
/// length, in document order. Display strings keep the tokenizer's own
/// space-marker conventions; the alignment indexer normalizes those away.
pub fn encode(tokenizer: &Tokenizer, text: &str) -> Result<(Vec<i64>, Vec<String>)> {
    let encoding = tokenizer.encode(text, false)?;
    let ids = encoding.get_ids().iter().map(|&id| id as i64).collect();
    let tokens = encoding.get_tokens().to_vec();
    Ok((ids, tokens))
}
