//! # satsplit - Remote-Model Sentence Segmentation
//!
//! satsplit cuts raw text into sentences by querying a remote SaT
//! (Segment any Text) scoring model and interpreting its per-token
//! boundary scores.
//!
//! ## Overview
//!
//! The scoring model only accepts bounded-length token sequences, so long
//! documents are chunked into overlapping windows, each window is scored
//! remotely, and the overlapping predictions are reconciled into a single
//! probability per character. Characters whose probability clears a
//! configurable threshold become sentence boundaries.
//!
//! ## Key Features
//!
//! - **Sliding-window scheduling** with configurable block size and stride
//! - **Mean aggregation** of overlapping window predictions
//! - **Cursor-based token alignment** that never fails on tokenizer/text
//!   mismatches
//! - **Triton HTTP transport** with FP16/FP32 output decoding
//! - **Concurrent benchmark harness** with rank-selected p99 latency
//!
//! ## Quick Start
//!
//! ```no_run
//! use satsplit::{SplitConfig, Splitter, TritonBackend};
//! use tokenizers::Tokenizer;
//!
//! let backend = TritonBackend::new("localhost", 8000, "sat_3l_sm")?;
//! backend.ensure_ready()?;
//!
//! let tokenizer = Tokenizer::from_file(satsplit::fetch_tokenizer(None)?)?;
//! let splitter = Splitter::new(backend, tokenizer, SplitConfig::default())?;
//!
//! for sentence in splitter.split("Hello world. This is a test.")? {
//!     println!("{}", sentence);
//! }
//! # Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`split`] - the segmentation pipeline (alignment, windowing,
//!   aggregation, extraction)
//! - [`backend`] - the scoring seam and the Triton HTTP adapter
//! - [`tokenize`] - subword tokenizer adapter
//! - [`hub`] - tokenizer download from the HuggingFace Hub
//! - [`bench`] - concurrent load harness
//! - [`config`] - pipeline configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod bench;
pub mod config;
pub mod error;
pub mod hub;
pub mod split;
pub mod tokenize;

// Re-export commonly used types
pub use backend::{ScoringBackend, TritonBackend};
pub use bench::{percentile, BenchResult, Benchmark};
pub use config::SplitConfig;
pub use error::{Error, Result};
pub use hub::fetch_tokenizer;
pub use split::Splitter;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
