//! Configuration for the summarization service

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// LLM configuration
    pub llm: LlmConfig,
    /// Chunk sizing policy
    pub chunking: ChunkPolicy,
    /// Known model context windows
    pub models: ModelTable,
}

impl SummarizerConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&raw).map_err(|e| Error::Config(format!("invalid config file: {}", e)))
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 100MB)
    pub max_upload_size: usize,
    /// Deadline for one summarization request in seconds
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 100 * 1024 * 1024, // 100MB
            request_timeout_secs: 300,
        }
    }
}

/// LLM (OpenAI-compatible) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Chat-completions base URL
    pub base_url: String,
    /// API credential, passed through to the provider unexamined
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Model used when a request does not select one
    pub model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
    /// Partial summaries combined per reduce call
    pub max_combine_batch: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.0,
            timeout_secs: 120,
            max_retries: 2,
            max_combine_batch: 8,
        }
    }
}

/// Policy constants for deriving chunk plans from model context windows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkPolicy {
    /// Fraction of the context window considered usable
    pub usable_ratio: f64,
    /// Tokens reserved for the prompt itself
    pub prompt_reservation: i64,
    /// Character-per-token approximation used for chunk sizing
    pub chars_per_token: usize,
    /// Budget used when no model has been selected
    pub default_budget: i64,
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        Self {
            usable_ratio: 0.7,
            prompt_reservation: 2048,
            chars_per_token: 4,
            default_budget: 512,
        }
    }
}

/// Context-window sizes (tokens) keyed by model name.
///
/// This is versioned configuration data about third-party models; extending
/// support for a new model means adding a table entry, not a code branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelTable(BTreeMap<String, u32>);

impl Default for ModelTable {
    fn default() -> Self {
        let mut table = BTreeMap::new();
        table.insert("gpt-3.5-turbo".to_string(), 4096);
        table.insert("gpt-3.5-turbo-16k".to_string(), 16384);
        table.insert("gpt-4".to_string(), 8192);
        table.insert("gpt-4-32k".to_string(), 32768);
        Self(table)
    }
}

impl ModelTable {
    /// Context window for a model, if known
    pub fn context_window(&self, model: &str) -> Option<u32> {
        self.0.get(model).copied()
    }

    /// Iterate over known models and their context windows
    pub fn models(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(name, window)| (name.as_str(), *window))
    }

    /// Register or replace a model entry
    pub fn insert(&mut self, model: impl Into<String>, context_window: u32) {
        self.0.insert(model.into(), context_window);
    }

    /// Number of known models
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no models are configured
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_model_table_has_four_entries() {
        let table = ModelTable::default();
        assert_eq!(table.len(), 4);
        assert_eq!(table.context_window("gpt-3.5-turbo"), Some(4096));
        assert_eq!(table.context_window("gpt-3.5-turbo-16k"), Some(16384));
        assert_eq!(table.context_window("gpt-4"), Some(8192));
        assert_eq!(table.context_window("gpt-4-32k"), Some(32768));
        assert_eq!(table.context_window("claude-2"), None);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: SummarizerConfig = toml::from_str(
            r#"
            [llm]
            api_key = "sk-test"
            model = "gpt-4"

            [chunking]
            prompt_reservation = 1024
            "#,
        )
        .unwrap();

        assert_eq!(config.llm.api_key, "sk-test");
        assert_eq!(config.llm.model, "gpt-4");
        assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
        assert_eq!(config.chunking.prompt_reservation, 1024);
        assert!((config.chunking.usable_ratio - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn model_table_is_extensible_from_toml() {
        let config: SummarizerConfig = toml::from_str(
            r#"
            [models]
            "gpt-3.5-turbo" = 4096
            "in-house-8k" = 8192
            "#,
        )
        .unwrap();

        assert_eq!(config.models.context_window("in-house-8k"), Some(8192));
        // the table is replaced wholesale, not merged
        assert_eq!(config.models.context_window("gpt-4"), None);
    }

    #[test]
    fn loads_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 9090").unwrap();

        let config = SummarizerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
    }

    #[test]
    fn rejects_malformed_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml [[").unwrap();

        let err = SummarizerConfig::from_file(file.path()).unwrap_err();
        assert_eq!(err.stage(), "config");
    }
}
