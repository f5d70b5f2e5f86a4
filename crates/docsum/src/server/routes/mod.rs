//! API routes for the summarization server

pub mod models;
pub mod summarize;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Routes mounted under `/api`
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // summarization takes the enlarged body limit for file uploads
        .route(
            "/summarize",
            post(summarize::summarize_documents).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/models", get(models::list_models))
        .route("/info", get(info))
}

/// Service metadata endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "docsum",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Multi-document summarization with format-aware ingestion and token-budget chunking",
        "endpoints": {
            "POST /api/summarize": "Upload documents and receive one combined summary",
            "GET /api/models": "List configured models and their token budgets",
        },
        "supported_formats": ["pdf", "docx", "pptx", "xlsx", "txt", "csv", "eml"],
    }))
}
