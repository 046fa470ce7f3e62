//! Token-to-character alignment.
//!
//! The scoring model works on subword tokens, but boundary decisions are made
//! per character. This module recovers a character span for every token by
//! scanning the original text with a forward-only cursor.

/// Marker characters some tokenizers prepend to word-initial tokens in place
/// of a space (SentencePiece `▁`, byte-level BPE `Ġ`).
const SPACE_MARKERS: [char; 2] = ['▁', 'Ġ'];

/// How far past the cursor a token match may begin. Bounds the search so a
/// short token cannot latch onto an unrelated later occurrence.
const LOOKAHEAD: usize = 10;

/// Computes one character span per token, in token order.
///
/// Spans are monotonically non-decreasing and end-anchored to the cursor. A
/// token that cannot be located within the lookahead collapses to a
/// one-character span at the cursor, which keeps the scan moving forward; the
/// fallback is deliberate behavior, never an error.
pub fn align_tokens(text: &str, tokens: &[String]) -> Vec<(usize, usize)> {
    let chars: Vec<char> = text.chars().collect();
    let folded: Vec<char> = chars.iter().map(|&c| fold_char(c)).collect();

    let mut spans = Vec::with_capacity(tokens.len());
    let mut cursor = 0usize;

    for token in tokens {
        let needle = normalize_token(token, cursor);
        match find_within_lookahead(&folded, &needle, cursor) {
            Some(start) => {
                let end = start + needle.len();
                spans.push((start, end));
                cursor = end;
            }
            None => {
                let end = (cursor + 1).min(chars.len());
                spans.push((cursor, end));
                cursor = end;
            }
        }
    }

    spans
}

/// Rewrites a token display string into the form it takes in the text:
/// space markers become literal spaces, and a leading space is dropped when
/// the cursor still sits at the start of the text.
fn normalize_token(token: &str, cursor: usize) -> Vec<char> {
    let mut needle: Vec<char> = token
        .chars()
        .map(|c| if SPACE_MARKERS.contains(&c) { ' ' } else { c })
        .map(fold_char)
        .collect();

    if cursor == 0 && needle.first() == Some(&' ') {
        needle.remove(0);
    }

    needle
}

/// Case-insensitive search for `needle` starting at `cursor`, accepted only
/// if the match begins within [`LOOKAHEAD`] characters of the cursor.
fn find_within_lookahead(haystack: &[char], needle: &[char], cursor: usize) -> Option<usize> {
    if cursor >= haystack.len() {
        return None;
    }

    let limit = (cursor + LOOKAHEAD).min(haystack.len());
    for start in cursor..=limit {
        if start + needle.len() > haystack.len() {
            break;
        }
        if haystack[start..start + needle.len()] == *needle {
            return Some(start);
        }
    }

    None
}

/// Single-character case fold, keeping indices 1:1 with the original text.
#[inline]
fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}
