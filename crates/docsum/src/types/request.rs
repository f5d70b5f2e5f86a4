//! Request option types

use serde::{Deserialize, Serialize};

/// Per-request options carried in the multipart `options` part
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarizeOptions {
    /// Target model; falls back to the configured default when absent.
    /// When absent the chunk plan uses the policy's default token budget.
    #[serde(default)]
    pub model: Option<String>,
    /// Override the derived chunk size (characters)
    #[serde(default)]
    pub chunk_size: Option<usize>,
    /// Override the derived chunk overlap (characters)
    #[serde(default)]
    pub chunk_overlap: Option<usize>,
}
