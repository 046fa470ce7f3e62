//! Sliding-window scheduling over the token sequence.

/// A half-open range of token indices submitted to the backend in one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// First token index in the window.
    pub start: usize,
    /// One past the last token index.
    pub end: usize,
}

impl Window {
    /// Number of tokens in the window, excluding boundary markers.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for a zero-length window.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Lazy sequence of overlapping windows covering `token_count` tokens.
///
/// Each window holds at most `block_size - 2` tokens, leaving the two slots
/// the boundary markers occupy on the wire. When the last window would come
/// up short it is shifted backward to full length, so the trailing tokens are
/// scored with the same amount of left context as the rest. Every token index
/// is covered at least once provided `stride` does not exceed the effective
/// block length.
#[derive(Debug, Clone)]
pub struct Windows {
    token_count: usize,
    effective_block: usize,
    stride: usize,
    next_start: usize,
    done: bool,
}

impl Windows {
    /// Creates the schedule. `stride` must be positive; configuration
    /// validation enforces this before the pipeline runs.
    pub fn new(token_count: usize, block_size: usize, stride: usize) -> Self {
        let effective_block = block_size.saturating_sub(2).min(token_count);
        Self {
            token_count,
            effective_block,
            stride,
            next_start: 0,
            done: token_count == 0,
        }
    }
}

impl Iterator for Windows {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        if self.done {
            return None;
        }

        let mut start = self.next_start;
        let end = (start + self.effective_block).min(self.token_count);
        if end == self.token_count && start > 0 {
            // Full-length final window instead of a short tail.
            start = end.saturating_sub(self.effective_block);
        }

        if end >= self.token_count {
            self.done = true;
        } else {
            self.next_start = start + self.stride;
        }

        Some(Window { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(token_count: usize, block_size: usize, stride: usize) -> Vec<(usize, usize)> {
        Windows::new(token_count, block_size, stride)
            .map(|w| (w.start, w.end))
            .collect()
    }

    #[test]
    fn test_single_window_when_tokens_fit() {
        // 8 tokens, effective block 510: one window covering everything.
        assert_eq!(collect(8, 512, 64), vec![(0, 8)]);
    }

    #[test]
    fn test_single_window_exact_fit() {
        assert_eq!(collect(4, 6, 2), vec![(0, 4)]);
    }

    #[test]
    fn test_overlapping_schedule() {
        // block 6 -> effective 4, stride 2.
        assert_eq!(collect(10, 6, 2), vec![(0, 4), (2, 6), (4, 8), (6, 10)]);
    }

    #[test]
    fn test_final_window_shifted_to_full_length() {
        // Without the shift the last window would be (4, 10), only 6 tokens
        // against an effective block of 8.
        assert_eq!(collect(10, 10, 4), vec![(0, 8), (2, 10)]);
    }

    #[test]
    fn test_every_token_covered() {
        for (n, block, stride) in [(10, 6, 2), (25, 9, 3), (100, 12, 5), (7, 9, 4)] {
            let mut covered = vec![false; n];
            for window in Windows::new(n, block, stride) {
                assert!(window.len() <= block - 2);
                for slot in &mut covered[window.start..window.end] {
                    *slot = true;
                }
            }
            assert!(covered.iter().all(|&c| c), "n={} block={} stride={}", n, block, stride);
        }
    }

    #[test]
    fn test_zero_tokens_yield_no_windows() {
        assert!(collect(0, 512, 64).is_empty());
    }

    #[test]
    fn test_schedule_is_lazy() {
        // A huge token count must not cost anything until iterated.
        let mut windows = Windows::new(usize::MAX / 2, 512, 64);
        let first = windows.next().unwrap();
        assert_eq!((first.start, first.end), (0, 510));
    }
}
