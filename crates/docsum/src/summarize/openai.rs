//! OpenAI chat-completions client with retry logic

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::types::DocumentChunk;

use super::prompt::PromptBuilder;
use super::provider::Summarizer;

/// OpenAI-compatible API client with automatic retry
pub struct OpenAiClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: LlmConfig,
    /// Maximum retries
    max_retries: u32,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl OpenAiClient {
    /// Create a new client with retry support
    pub fn new(config: &LlmConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            max_retries: config.max_retries,
            config: config.clone(),
        }
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        let delay = Duration::from_secs(2u64.pow(attempt));
                        tracing::warn!(
                            "Request failed (attempt {}/{}), retrying in {:?}",
                            attempt + 1,
                            self.max_retries + 1,
                            delay
                        );
                        sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::summarization("Unknown error")))
    }

    /// Check if the API is reachable with the configured credential
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.config.base_url);

        match self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Run one chat completion and return the first choice's content
    pub async fn complete(&self, model: &str, prompt: String) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let model = model.to_string();
        let temperature = self.config.temperature;
        let api_key = self.config.api_key.clone();
        let client = self.client.clone();

        self.retry_request(|| {
            let url = url.clone();
            let prompt = prompt.clone();
            let model = model.clone();
            let api_key = api_key.clone();
            let client = client.clone();

            async move {
                let request = ChatRequest {
                    model,
                    messages: vec![ChatMessage {
                        role: "user".to_string(),
                        content: prompt,
                    }],
                    temperature,
                };

                let response = client
                    .post(&url)
                    .bearer_auth(&api_key)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| Error::summarization(format!("completion request failed: {}", e)))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::summarization(format!(
                        "completion failed: HTTP {} - {}",
                        status, body
                    )));
                }

                let chat_response: ChatResponse = response.json().await.map_err(|e| {
                    Error::summarization(format!("failed to parse completion response: {}", e))
                })?;

                chat_response
                    .choices
                    .into_iter()
                    .next()
                    .map(|choice| choice.message.content)
                    .ok_or_else(|| Error::summarization("completion response had no choices"))
            }
        })
        .await
    }
}

/// Map-reduce summarizer backed by an [`OpenAiClient`]
pub struct OpenAiSummarizer {
    client: Arc<OpenAiClient>,
    max_combine_batch: usize,
}

impl OpenAiSummarizer {
    /// Create a new summarizer provider
    pub fn new(client: Arc<OpenAiClient>, max_combine_batch: usize) -> Self {
        Self {
            client,
            // a batch of one partial would never converge
            max_combine_batch: max_combine_batch.max(2),
        }
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, model: &str, chunks: &[DocumentChunk]) -> Result<String> {
        if chunks.is_empty() {
            return Err(Error::summarization("no chunks to summarize"));
        }

        tracing::info!("Summarizing {} chunks with model: {}", chunks.len(), model);

        // map: one partial summary per chunk, in sequence order
        let mut partials = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let prompt = PromptBuilder::map_prompt(&chunk.content);
            partials.push(self.client.complete(model, prompt).await?);
        }

        // reduce: combine partials in order-preserving batches until one remains
        let mut round = 0u32;
        while partials.len() > 1 {
            round += 1;
            tracing::debug!("Reduce round {}: {} partials", round, partials.len());

            let mut combined = Vec::with_capacity(partials.len().div_ceil(self.max_combine_batch));
            for batch in partials.chunks(self.max_combine_batch) {
                let prompt = PromptBuilder::reduce_prompt(batch);
                combined.push(self.client.complete(model, prompt).await?);
            }
            partials = combined;
        }

        Ok(partials.remove(0))
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "openai"
    }
}
