//! Document summarization endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use uuid::Uuid;

use crate::chunking::ChunkPlan;
use crate::config::SummarizerConfig;
use crate::error::{Error, Result};
use crate::ingestion::IngestPipeline;
use crate::server::state::AppState;
use crate::types::{SummarizeOptions, SummarizeResponse, UploadedFile};

/// POST /api/summarize - Upload files and produce one combined summary
pub async fn summarize_documents(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SummarizeResponse>> {
    let start = Instant::now();
    let mut options = SummarizeOptions::default();
    let mut files: Vec<UploadedFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::internal(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        // options part carries model selection and chunk overrides
        if name == "options" {
            let data = field
                .bytes()
                .await
                .map_err(|e| Error::internal(format!("Failed to read options: {}", e)))?;
            options = serde_json::from_slice(&data)?;
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("file_{}", Uuid::new_v4()));
        let content_type = field.content_type().unwrap_or("").to_string();

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::extraction(&filename, format!("failed to read upload: {}", e)))?;

        files.push(UploadedFile {
            filename,
            content_type,
            data: data.to_vec(),
        });
    }

    if files.is_empty() {
        return Err(Error::config("no files provided"));
    }

    let config = state.config();
    let plan = resolve_plan(&options, config)?;

    tracing::info!(
        "Summarizing {} files (chunk size {}, overlap {})",
        files.len(),
        plan.chunk_size,
        plan.chunk_overlap
    );

    let pipeline = IngestPipeline::new(plan);
    let (documents, chunks) = pipeline.ingest_batch(&files)?;

    let model = options
        .model
        .clone()
        .unwrap_or_else(|| config.llm.model.clone());
    let deadline = Duration::from_secs(config.server.request_timeout_secs);

    let summary = timeout(deadline, state.summarizer().summarize(&model, &chunks))
        .await
        .map_err(|_| {
            Error::summarization(format!("timed out after {}s", deadline.as_secs()))
        })??;

    Ok(Json(SummarizeResponse {
        summary,
        model,
        total_chunks: chunks.len() as u32,
        documents,
        chunk_plan: plan,
        processing_time_ms: start.elapsed().as_millis() as u64,
        summarized_at: chrono::Utc::now(),
    }))
}

/// Derive the chunk plan for a request, honoring explicit overrides.
///
/// The model selection drives the token budget; when the request names no
/// model the policy's default budget applies.
fn resolve_plan(options: &SummarizeOptions, config: &SummarizerConfig) -> Result<ChunkPlan> {
    let mut plan = ChunkPlan::for_model(options.model.as_deref(), &config.models, &config.chunking)?;

    if let Some(size) = options.chunk_size {
        if size == 0 {
            return Err(Error::InvalidChunkPlan(0));
        }
        plan.chunk_size = size;
        plan.chunk_overlap = (size as f64 * 0.1).round() as usize;
    }
    if let Some(overlap) = options.chunk_overlap {
        if overlap >= plan.chunk_size {
            return Err(Error::config(
                "chunk_overlap must be smaller than chunk_size",
            ));
        }
        plan.chunk_overlap = overlap;
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_follows_the_selected_model() {
        let config = SummarizerConfig::default();
        let options = SummarizeOptions {
            model: Some("gpt-3.5-turbo".to_string()),
            ..Default::default()
        };

        let plan = resolve_plan(&options, &config).unwrap();
        assert_eq!(plan.chunk_size, 3276);
        assert_eq!(plan.chunk_overlap, 328);
    }

    #[test]
    fn no_model_uses_the_default_budget() {
        let config = SummarizerConfig::default();
        let plan = resolve_plan(&SummarizeOptions::default(), &config).unwrap();
        assert_eq!(plan.chunk_size, 512 * 4);
    }

    #[test]
    fn explicit_size_override_recomputes_overlap() {
        let config = SummarizerConfig::default();
        let options = SummarizeOptions {
            chunk_size: Some(1000),
            ..Default::default()
        };

        let plan = resolve_plan(&options, &config).unwrap();
        assert_eq!(plan.chunk_size, 1000);
        assert_eq!(plan.chunk_overlap, 100);
    }

    #[test]
    fn oversized_overlap_is_rejected() {
        let config = SummarizerConfig::default();
        let options = SummarizeOptions {
            chunk_size: Some(100),
            chunk_overlap: Some(100),
            ..Default::default()
        };

        assert!(resolve_plan(&options, &config).is_err());
    }

    #[test]
    fn unknown_model_fails_at_planning() {
        let config = SummarizerConfig::default();
        let options = SummarizeOptions {
            model: Some("gpt-12".to_string()),
            ..Default::default()
        };

        let err = resolve_plan(&options, &config).unwrap_err();
        assert_eq!(err.stage(), "model_selection");
    }
}
