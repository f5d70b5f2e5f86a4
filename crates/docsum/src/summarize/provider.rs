//! Summarizer provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::DocumentChunk;

/// Trait for map-reduce summarization backends.
///
/// Implementations must preserve chunk order: partial summaries are produced
/// in sequence order and combined in order-preserving batches.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce one combined summary from an ordered chunk sequence
    async fn summarize(&self, model: &str, chunks: &[DocumentChunk]) -> Result<String>;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
