//! Error types for the summarization service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for summarization operations
pub type Result<T> = std::result::Result<T, Error>;

/// Summarization service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Declared content type has no entry in the format table
    #[error("Unsupported content type: {0}")]
    UnsupportedFormat(String),

    /// Model name has no entry in the model table
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    /// Token budget produced a non-positive chunk size
    #[error("Invalid chunk plan: computed chunk size {0} is not positive")]
    InvalidChunkPlan(i64),

    /// Text extraction error
    #[error("Failed to extract text from '{filename}': {message}")]
    Extraction { filename: String, message: String },

    /// External summarization call failed
    #[error("Summarization failed: {0}")]
    Summarization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an extraction error
    pub fn extraction(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create a summarization error
    pub fn summarization(message: impl Into<String>) -> Self {
        Self::Summarization(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Pipeline stage that produced this error, reported to clients
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::UnsupportedFormat(_) => "type_detection",
            Self::UnsupportedModel(_) => "model_selection",
            Self::InvalidChunkPlan(_) => "chunk_planning",
            Self::Extraction { .. } => "extraction",
            Self::Summarization(_) => "summarization",
            Self::Io(_) => "io",
            Self::Json(_) => "serialization",
            Self::Http(_) => "http",
            Self::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Config(_)
            | Error::UnsupportedFormat(_)
            | Error::UnsupportedModel(_)
            | Error::InvalidChunkPlan(_)
            | Error::Extraction { .. }
            | Error::Json(_) => StatusCode::BAD_REQUEST,
            Error::Summarization(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Http(_) => StatusCode::BAD_GATEWAY,
            Error::Io(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": {
                "stage": self.stage(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_names_follow_pipeline_order() {
        assert_eq!(
            Error::UnsupportedFormat("image/png".into()).stage(),
            "type_detection"
        );
        assert_eq!(
            Error::UnsupportedModel("gpt-99".into()).stage(),
            "model_selection"
        );
        assert_eq!(Error::InvalidChunkPlan(-8).stage(), "chunk_planning");
        assert_eq!(Error::extraction("a.pdf", "bad xref").stage(), "extraction");
        assert_eq!(Error::summarization("rate limited").stage(), "summarization");
    }

    #[test]
    fn extraction_error_names_the_file() {
        let err = Error::extraction("report.docx", "truncated archive");
        assert_eq!(
            err.to_string(),
            "Failed to extract text from 'report.docx': truncated archive"
        );
    }
}
