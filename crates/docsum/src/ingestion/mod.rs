//! Document ingestion pipeline with multi-format text extraction

mod extract;
mod pipeline;

pub use extract::{extractor_for, TextExtractor};
pub use pipeline::IngestPipeline;
