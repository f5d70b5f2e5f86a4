//! docsum: multi-document summarization with format-aware ingestion
//!
//! This crate accepts a batch of uploaded documents, extracts text from each
//! with a format-specific extractor, splits the text into token-budget-bounded
//! overlapping chunks, and drives a map-reduce LLM pipeline to produce one
//! combined summary.
//!
//! The reusable core is deliberately small and pure:
//! - [`types::FormatTag`] resolves a declared MIME type to one of seven
//!   supported formats and selects an extractor capability.
//! - [`chunking`] derives a per-model token budget, converts it into a
//!   character-based [`chunking::ChunkPlan`], and splits text at natural
//!   boundaries (paragraph, sentence, word) before hard character cuts.
//!
//! Extraction and summarization are swappable collaborators behind the
//! [`ingestion::TextExtractor`] and [`summarize::Summarizer`] traits; the
//! shipped implementations use pdf-extract/docx-rs/calamine/csv/mail-parser
//! for extraction and an OpenAI-compatible chat API for summarization.

pub mod chunking;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod server;
pub mod summarize;
pub mod types;

pub use config::SummarizerConfig;
pub use error::{Error, Result};
pub use types::{
    document::{DocumentChunk, DocumentDigest, FormatTag, LoaderKind, UploadedFile},
    response::SummarizeResponse,
};
