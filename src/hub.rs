//! HuggingFace Hub integration for tokenizer files.

use std::path::{Path, PathBuf};

use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};

use crate::error::{Error, Result};

/// Repository hosting the XLM-RoBERTa tokenizer used by SaT models.
pub const TOKENIZER_REPO: &str = "FacebookAI/xlm-roberta-base";

/// Resolves a tokenizer file: the given local path if any, the Hub otherwise.
pub fn fetch_tokenizer(local: Option<&Path>) -> Result<PathBuf> {
    match local {
        Some(path) if path.exists() => Ok(path.to_path_buf()),
        Some(path) => Err(Error::HubDownload(format!(
            "tokenizer file not found: {}",
            path.display()
        ))),
        None => download_tokenizer(TOKENIZER_REPO),
    }
}

/// Downloads `tokenizer.json` from a Hub repository.
pub fn download_tokenizer(repo_id: &str) -> Result<PathBuf> {
    log::info!("Downloading tokenizer from {}", repo_id);

    let api = Api::new().map_err(|e| Error::HubDownload(e.to_string()))?;
    let repo = api.repo(Repo::new(repo_id.to_string(), RepoType::Model));

    repo.get("tokenizer.json").map_err(|e| {
        Error::HubDownload(format!("Failed to download tokenizer.json: {}", e))
    })
}
