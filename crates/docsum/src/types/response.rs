//! Response types for summarization requests

use serde::{Deserialize, Serialize};

use super::document::DocumentDigest;
use crate::chunking::ChunkPlan;

/// Response from a summarization request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeResponse {
    /// Combined summary across all uploaded documents
    pub summary: String,
    /// Model that produced the summary
    pub model: String,
    /// Per-file ingestion records, in upload order
    pub documents: Vec<DocumentDigest>,
    /// Total chunks handed to the summarizer
    pub total_chunks: u32,
    /// Chunk plan used for splitting
    pub chunk_plan: ChunkPlan,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Completion timestamp
    pub summarized_at: chrono::DateTime<chrono::Utc>,
}

/// One entry in the model listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model name
    pub name: String,
    /// Total context window in tokens
    pub context_window: u32,
    /// Token budget derived from the current chunk policy.
    /// May be negative for models too small for the prompt reservation.
    pub token_budget: i64,
}

/// Response for listing configured models
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    /// Known models
    pub models: Vec<ModelInfo>,
    /// Budget used when no model is selected
    pub default_budget: i64,
}
