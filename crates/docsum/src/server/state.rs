//! Application state for the summarization server

use std::sync::Arc;

use crate::config::SummarizerConfig;
use crate::summarize::{OpenAiClient, OpenAiSummarizer, Summarizer};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: SummarizerConfig,
    /// Summarization provider
    summarizer: Arc<dyn Summarizer>,
}

impl AppState {
    /// Create state with the OpenAI provider from config
    pub fn new(config: SummarizerConfig) -> Self {
        let client = Arc::new(OpenAiClient::new(&config.llm));
        let summarizer: Arc<dyn Summarizer> =
            Arc::new(OpenAiSummarizer::new(client, config.llm.max_combine_batch));

        tracing::info!(
            "Application state initialized (provider: openai, default model: {})",
            config.llm.model
        );

        Self {
            inner: Arc::new(AppStateInner { config, summarizer }),
        }
    }

    /// Create state with an explicit provider
    pub fn with_summarizer(config: SummarizerConfig, summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, summarizer }),
        }
    }

    /// Service configuration
    pub fn config(&self) -> &SummarizerConfig {
        &self.inner.config
    }

    /// Summarization provider
    pub fn summarizer(&self) -> &Arc<dyn Summarizer> {
        &self.inner.summarizer
    }
}
