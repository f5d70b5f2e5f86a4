//! End-to-end flow: upload batch through ingestion into a scripted provider

use async_trait::async_trait;
use std::sync::Mutex;

use docsum::chunking::ChunkPlan;
use docsum::config::{ChunkPolicy, ModelTable};
use docsum::error::Result;
use docsum::ingestion::IngestPipeline;
use docsum::summarize::Summarizer;
use docsum::types::{DocumentChunk, FormatTag, UploadedFile};

/// Provider double that records the chunks it receives
struct ScriptedSummarizer {
    seen: Mutex<Vec<(String, String)>>,
}

impl ScriptedSummarizer {
    fn new() -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Summarizer for ScriptedSummarizer {
    async fn summarize(&self, _model: &str, chunks: &[DocumentChunk]) -> Result<String> {
        let mut seen = self.seen.lock().unwrap();
        for chunk in chunks {
            seen.push((chunk.filename.clone(), chunk.content.clone()));
        }
        Ok("combined summary".to_string())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn upload(filename: &str, content_type: &str, body: &str) -> UploadedFile {
    UploadedFile {
        filename: filename.to_string(),
        content_type: content_type.to_string(),
        data: body.as_bytes().to_vec(),
    }
}

#[tokio::test]
async fn txt_and_csv_flow_through_in_upload_order() {
    let plan = ChunkPlan::for_model(
        Some("gpt-3.5-turbo"),
        &ModelTable::default(),
        &ChunkPolicy::default(),
    )
    .unwrap();
    assert_eq!(plan.chunk_size, 3276);

    let files = vec![
        upload("hello.txt", "text/plain", "Hello world."),
        upload("table.csv", "text/csv", "a,b\n1,2\n"),
    ];

    let pipeline = IngestPipeline::new(plan);
    let (documents, chunks) = pipeline.ingest_batch(&files).unwrap();

    // both files resolve correctly and fit in a single chunk each
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].format, FormatTag::Txt);
    assert_eq!(documents[1].format, FormatTag::Csv);
    assert_eq!(documents[0].chunk_count, 1);
    assert_eq!(documents[1].chunk_count, 1);

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].content, "Hello world.");
    assert_eq!(chunks[1].content, "a | b\n1 | 2\n");

    // the provider receives the merged sequence in upload order
    let summarizer = ScriptedSummarizer::new();
    let summary = summarizer.summarize("gpt-3.5-turbo", &chunks).await.unwrap();
    assert_eq!(summary, "combined summary");

    let seen = summarizer.seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].0, "hello.txt");
    assert_eq!(seen[1].0, "table.csv");
}

#[tokio::test]
async fn multi_chunk_document_reaches_the_provider_in_order() {
    let plan = ChunkPlan {
        chunk_size: 64,
        chunk_overlap: 6,
    };
    let body = "Sentence number one. Sentence number two. Sentence number three. \
                Sentence number four. Sentence number five."
        .to_string();

    let pipeline = IngestPipeline::new(plan);
    let (documents, chunks) = pipeline
        .ingest_batch(&[upload("long.txt", "text/plain", &body)])
        .unwrap();

    assert!(documents[0].chunk_count > 1);

    let summarizer = ScriptedSummarizer::new();
    summarizer.summarize("gpt-4", &chunks).await.unwrap();

    let seen = summarizer.seen.lock().unwrap();
    assert_eq!(seen.len() as u32, documents[0].chunk_count);
    // each recorded chunk appears in in-file order
    for (recorded, chunk) in seen.iter().zip(chunks.iter()) {
        assert_eq!(recorded.1, chunk.content);
    }
}

#[tokio::test]
async fn unsupported_upload_aborts_the_batch() {
    let plan = ChunkPlan {
        chunk_size: 2048,
        chunk_overlap: 205,
    };
    let files = vec![
        upload("notes.txt", "text/plain", "fine"),
        upload("photo.png", "image/png", "not really an image"),
    ];

    let err = IngestPipeline::new(plan).ingest_batch(&files).unwrap_err();
    assert_eq!(err.stage(), "type_detection");
}
