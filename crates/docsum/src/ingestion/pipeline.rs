//! Ingestion pipeline orchestration

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::chunking::{ChunkPlan, TextSplitter};
use crate::error::Result;
use crate::types::{DocumentChunk, DocumentDigest, FormatTag, UploadedFile};

use super::extract::extractor_for;

/// Resolves, extracts, and chunks uploaded files.
///
/// Stateless over requests; chunk ordering follows upload order, then
/// fragment order within each file.
pub struct IngestPipeline {
    splitter: TextSplitter,
}

impl IngestPipeline {
    /// Create a pipeline for a chunk plan
    pub fn new(plan: ChunkPlan) -> Self {
        Self {
            splitter: TextSplitter::new(plan),
        }
    }

    /// Resolve the format of a file and extract its text
    pub fn extract_file(&self, file: &UploadedFile) -> Result<(FormatTag, String)> {
        let format = FormatTag::from_mime(&file.content_type)?;
        let text = extractor_for(format.loader()).extract(&file.filename, &file.data)?;
        Ok((format, text))
    }

    /// Extract and chunk one file
    pub fn ingest_file(&self, file: &UploadedFile) -> Result<(DocumentDigest, Vec<DocumentChunk>)> {
        let (format, text) = self.extract_file(file)?;
        let document_id = Uuid::new_v4();

        let chunks: Vec<DocumentChunk> = self
            .splitter
            .split(&text)
            .into_iter()
            .enumerate()
            .map(|(index, fragment)| {
                DocumentChunk::new(
                    document_id,
                    file.filename.clone(),
                    format,
                    fragment.content,
                    fragment.start,
                    fragment.end,
                    index as u32,
                )
            })
            .collect();

        let digest = DocumentDigest {
            id: document_id,
            filename: file.filename.clone(),
            format,
            content_hash: hash_content(&text),
            extracted_chars: text.len(),
            chunk_count: chunks.len() as u32,
        };

        tracing::info!(
            "Ingested '{}': {} ({} chars, {} chunks)",
            file.filename,
            format.display_name(),
            text.len(),
            chunks.len()
        );

        Ok((digest, chunks))
    }

    /// Ingest a batch of files in upload order.
    ///
    /// The merged chunk sequence preserves upload order, then in-file order.
    /// Fail-fast: the first failing file aborts the batch with that file
    /// named in the error.
    pub fn ingest_batch(
        &self,
        files: &[UploadedFile],
    ) -> Result<(Vec<DocumentDigest>, Vec<DocumentChunk>)> {
        let mut documents = Vec::with_capacity(files.len());
        let mut merged = Vec::new();

        for file in files {
            let (digest, chunks) = self.ingest_file(file).map_err(|e| {
                tracing::warn!(
                    "Ingestion failed for '{}' at stage {}: {}",
                    file.filename,
                    e.stage(),
                    e
                );
                e
            })?;
            documents.push(digest);
            merged.extend(chunks);
        }

        Ok((documents, merged))
    }
}

/// Hash extracted content for log correlation
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
