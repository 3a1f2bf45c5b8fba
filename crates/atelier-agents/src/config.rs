//! Backend configuration: endpoint, model identity, sampling parameters.
//!
//! Defaults come from the environment so a bare `atelier-agents --prompt ...`
//! works against a local server; a TOML file can override any subset of
//! fields. Sampling parameters are fixed per run so logged histories stay
//! reproducible against the same backend.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Error loading a backend config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// OpenAI-compatible chat backend configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the chat API, up to and including `/v1`.
    pub url: String,
    /// Model name sent in every request.
    pub model: String,
    /// Bearer token; omitted for local servers that need none.
    pub api_key: Option<String>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling threshold.
    pub top_p: f32,
    /// Completion token cap per invocation.
    pub max_tokens: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("ATELIER_BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:8080/v1".into()),
            model: std::env::var("ATELIER_BACKEND_MODEL").unwrap_or_else(|_| "Qwen3-8B".into()),
            api_key: std::env::var("ATELIER_BACKEND_API_KEY").ok(),
            temperature: 0.7,
            top_p: 0.9,
            max_tokens: 4096,
            timeout_secs: 300,
        }
    }
}

impl BackendConfig {
    /// Load from a TOML file. Fields missing from the file keep their
    /// environment-backed defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
