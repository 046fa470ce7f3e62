//! Pipeline configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for the sentence splitting pipeline.
///
/// The boundary-marker ids belong to the tokenizer vocabulary and differ per
/// model family; the defaults match XLM-RoBERTa (`<s>` = 0, `</s>` = 2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Probability above which a character is treated as a sentence end.
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// Maximum token window per scoring request, including the two
    /// boundary-marker slots.
    #[serde(default = "default_block_size")]
    pub block_size: usize,

    /// Token advance between consecutive window starts.
    #[serde(default = "default_stride")]
    pub stride: usize,

    /// Token id prepended to every window.
    #[serde(default = "default_cls_token_id")]
    pub cls_token_id: i64,

    /// Token id appended to every window.
    #[serde(default = "default_sep_token_id")]
    pub sep_token_id: i64,
}

fn default_threshold() -> f32 {
    0.25
}

fn default_block_size() -> usize {
    512
}

fn default_stride() -> usize {
    64
}

fn default_cls_token_id() -> i64 {
    0
}

fn default_sep_token_id() -> i64 {
    2
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            block_size: default_block_size(),
            stride: default_stride(),
            cls_token_id: default_cls_token_id(),
            sep_token_id: default_sep_token_id(),
        }
    }
}

impl SplitConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Rejects configurations the window scheduler cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.stride == 0 {
            return Err(Error::InvalidConfig(
                "stride must be greater than 0".to_string(),
            ));
        }
        if self.block_size < 3 {
            return Err(Error::InvalidConfig(
                "block_size must leave room for the boundary markers".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SplitConfig::default();
        assert!((config.threshold - 0.25).abs() < 1e-6);
        assert_eq!(config.block_size, 512);
        assert_eq!(config.stride, 64);
        assert_eq!(config.cls_token_id, 0);
        assert_eq!(config.sep_token_id, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_with_partial_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"threshold": 0.5, "stride": 32}}"#).unwrap();

        let config = SplitConfig::from_file(&path).unwrap();
        assert!((config.threshold - 0.5).abs() < 1e-6);
        assert_eq!(config.stride, 32);
        // Unspecified fields fall back to the defaults.
        assert_eq!(config.block_size, 512);
        assert_eq!(config.sep_token_id, 2);
    }

    #[test]
    fn test_zero_stride_rejected() {
        let config = SplitConfig {
            stride: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_tiny_block_rejected() {
        let config = SplitConfig {
            block_size: 2,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}
