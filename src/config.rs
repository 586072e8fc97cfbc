//! Engine configuration.
//!
//! Defaults mirror the tuned production values; a TOML file and a couple of
//! environment variables can override them without recompiling.

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// Section-aware re-chunking parameters (characters).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Hard cap on chunk size.
    pub max_characters: usize,
    /// Soft boundary: close the current chunk once it reaches this size,
    /// even mid-section.
    pub new_after: usize,
    /// Overlap carried from the tail of the previous chunk on size-driven
    /// breaks.
    pub overlap: usize,
    /// Fragments below this size merge into a neighbor instead of standing
    /// alone.
    pub combine_under: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_characters: 1500,
            new_after: 1200,
            overlap: 400,
            combine_under: 75,
        }
    }
}

/// Endpoints and model ids for the two opaque oracles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// OpenAI-compatible base URL for chat completions.
    pub chat_base_url: String,
    pub chat_model: String,
    /// OpenAI-compatible base URL for embeddings.
    pub embed_base_url: String,
    pub embed_model: String,
    /// API key; usually injected via `CASEFILE_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Per-request HTTP timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            chat_base_url: "https://api.deepseek.com/v1".to_string(),
            chat_model: "deepseek-chat".to_string(),
            embed_base_url: "http://127.0.0.1:8080/v1".to_string(),
            embed_model: "all-mpnet-base-v2".to_string(),
            api_key: None,
            request_timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub chunking: ChunkingConfig,
    pub oracle: OracleConfig,
    /// Joint deadline for the retrieval fan-in barrier; `None` waits
    /// indefinitely.
    pub retrieval_timeout_secs: Option<u64>,
}

impl EngineConfig {
    /// Load from a TOML file, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let raw = std::fs::read_to_string(path).map_err(EngineError::internal)?;
        let mut config: EngineConfig = toml::from_str(&raw).map_err(EngineError::internal)?;
        config.apply_env();
        Ok(config)
    }

    /// Environment overrides for deployment-varying values.
    pub fn apply_env(&mut self) {
        if let Ok(key) = env::var("CASEFILE_API_KEY") {
            if !key.trim().is_empty() {
                self.oracle.api_key = Some(key);
            }
        }
        if let Ok(url) = env::var("CASEFILE_CHAT_BASE_URL") {
            if !url.trim().is_empty() {
                self.oracle.chat_base_url = url;
            }
        }
        if let Ok(url) = env::var("CASEFILE_EMBED_BASE_URL") {
            if !url.trim().is_empty() {
                self.oracle.embed_base_url = url;
            }
        }
    }
}
