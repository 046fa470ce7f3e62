//! Character projection and sentence extraction.

/// Projects per-token probabilities onto characters.
///
/// Each token's probability lands on the last character of its span. When two
/// spans end on the same character (possible through the alignment fallback),
/// the larger probability wins; values are never summed or overwritten
/// downward.
pub fn token_to_char_probs(
    char_len: usize,
    token_probs: &[f32],
    spans: &[(usize, usize)],
) -> Vec<f32> {
    let mut char_probs = vec![0.0f32; char_len];

    for (&prob, &(_, end)) in token_probs.iter().zip(spans) {
        if end > 0 && end <= char_len {
            let idx = end - 1;
            if prob > char_probs[idx] {
                char_probs[idx] = prob;
            }
        }
    }

    char_probs
}

/// Cuts `text` into sentences wherever the character probability exceeds
/// `threshold`.
///
/// A single left-to-right pass: each cut takes the substring since the
/// previous cut, inclusive of the boundary character; whatever remains after
/// the last cut becomes the final sentence. Segments that are empty after
/// trimming are dropped.
pub fn extract_sentences(text: &str, char_probs: &[f32], threshold: f32) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut last_split = 0usize;

    for (i, &prob) in char_probs.iter().enumerate() {
        if prob > threshold {
            push_trimmed(&chars[last_split..=i], &mut sentences);
            last_split = i + 1;
        }
    }

    if last_split < chars.len() {
        push_trimmed(&chars[last_split..], &mut sentences);
    }

    sentences
}

fn push_trimmed(slice: &[char], out: &mut Vec<String>) {
    let sentence: String = slice.iter().collect();
    let sentence = sentence.trim();
    if !sentence.is_empty() {
        out.push(sentence.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_assigns_last_character() {
        let probs = token_to_char_probs(5, &[0.9, 0.2], &[(0, 3), (3, 5)]);
        assert_eq!(probs, vec![0.0, 0.0, 0.9, 0.0, 0.2]);
    }

    #[test]
    fn test_projection_keeps_max_on_collision() {
        // Fallback spans can make two tokens end on the same character.
        let probs = token_to_char_probs(2, &[0.3, 0.8, 0.1], &[(0, 2), (1, 2), (1, 2)]);
        assert_eq!(probs, vec![0.0, 0.8]);
    }

    #[test]
    fn test_projection_skips_out_of_range_spans() {
        let probs = token_to_char_probs(2, &[0.9, 0.9], &[(0, 0), (0, 7)]);
        assert_eq!(probs, vec![0.0, 0.0]);
    }

    #[test]
    fn test_two_sentence_scenario() {
        let text = "Hello world. This is a test.";
        let mut probs = vec![0.0f32; text.chars().count()];
        probs[11] = 0.9; // first period
        probs[27] = 0.9; // second period

        let sentences = extract_sentences(text, &probs, 0.25);
        assert_eq!(sentences, vec!["Hello world.", "This is a test."]);
    }

    #[test]
    fn test_no_boundary_returns_whole_text() {
        let text = "no boundary here";
        let probs = vec![0.0f32; text.chars().count()];
        assert_eq!(extract_sentences(text, &probs, 0.25), vec![text]);
    }

    #[test]
    fn test_boundary_on_last_character_leaves_no_remainder() {
        let text = "One. Two.";
        let mut probs = vec![0.0f32; 9];
        probs[3] = 0.9;
        probs[8] = 0.9;
        assert_eq!(extract_sentences(text, &probs, 0.25), vec!["One.", "Two."]);
    }

    #[test]
    fn test_whitespace_only_segments_dropped() {
        let text = "A.   B.";
        let mut probs = vec![0.0f32; 7];
        probs[1] = 0.9;
        probs[4] = 0.9; // cuts "  " plus the space already consumed
        probs[6] = 0.9;
        let sentences = extract_sentences(text, &probs, 0.25);
        assert_eq!(sentences, vec!["A.", "B."]);
    }

    #[test]
    fn test_threshold_monotonicity() {
        let text = "a. b. c. d.";
        let probs: Vec<f32> = text
            .chars()
            .map(|c| if c == '.' { 0.6 } else { 0.05 })
            .collect();

        let mut previous = usize::MAX;
        for threshold in [0.0, 0.3, 0.5, 0.7, 1.0] {
            let count = extract_sentences(text, &probs, threshold).len();
            assert!(count <= previous);
            previous = count;
        }
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_sentences("", &[], 0.25).is_empty());
    }
}
