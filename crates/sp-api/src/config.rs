//! API server configuration.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level API server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Where the prompt-embedding snapshot is persisted.
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,
    /// Sentence-embedding model name (see `embedding::FastEmbedder`).
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    7860
}

fn default_index_path() -> PathBuf {
    PathBuf::from("prompt_index.json")
}

fn default_embedding_model() -> String {
    "all-MiniLM-L6-v2".to_string()
}

impl ApiConfig {
    /// Load config from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(port) = std::env::var("PORT")
            && let Ok(port) = port.parse()
        {
            config.port = port;
        }
        if let Ok(path) = std::env::var("INDEX_PATH") {
            config.index_path = PathBuf::from(path);
        }
        if let Ok(model) = std::env::var("EMBEDDING_MODEL") {
            config.embedding_model = model;
        }
        config
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            index_path: default_index_path(),
            embedding_model: default_embedding_model(),
        }
    }
}
