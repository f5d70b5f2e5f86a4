//! Uploaded file, format, and chunk types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Canonical document formats accepted by the service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FormatTag {
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx)
    Docx,
    /// Microsoft PowerPoint presentation (.pptx)
    Pptx,
    /// Excel spreadsheet (.xlsx)
    Xlsx,
    /// Plain text file
    Txt,
    /// CSV file
    Csv,
    /// Email message (.eml)
    Eml,
}

impl FormatTag {
    /// Resolve a declared MIME content type to a format tag.
    ///
    /// MIME parameters (`; charset=...`) are stripped and the essence is
    /// compared case-insensitively. Anything outside the fixed table is an
    /// error; there is no fallback tag and no extension sniffing.
    pub fn from_mime(content_type: &str) -> Result<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "application/pdf" => Ok(Self::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Ok(Self::Docx)
            }
            "application/vnd.openxmlformats-officedocument.presentationml.presentation" => {
                Ok(Self::Pptx)
            }
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => Ok(Self::Xlsx),
            "text/plain" => Ok(Self::Txt),
            "text/csv" => Ok(Self::Csv),
            "message/rfc822" => Ok(Self::Eml),
            _ => Err(Error::UnsupportedFormat(content_type.to_string())),
        }
    }

    /// Extractor capability for this format (1:1)
    pub fn loader(self) -> LoaderKind {
        match self {
            Self::Pdf => LoaderKind::PdfText,
            Self::Docx => LoaderKind::DocxText,
            Self::Pptx => LoaderKind::Presentation,
            Self::Xlsx => LoaderKind::Spreadsheet,
            Self::Txt => LoaderKind::PlainText,
            Self::Csv => LoaderKind::DelimitedTable,
            Self::Eml => LoaderKind::EmailMessage,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "Word Document (.docx)",
            Self::Pptx => "PowerPoint (.pptx)",
            Self::Xlsx => "Excel Spreadsheet (.xlsx)",
            Self::Txt => "Text File",
            Self::Csv => "CSV",
            Self::Eml => "Email Message (.eml)",
        }
    }
}

/// Extractor capabilities, decoupling format detection from parser crates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoaderKind {
    /// PDF text extractor
    PdfText,
    /// DOCX text extractor
    DocxText,
    /// Presentation extractor
    Presentation,
    /// Spreadsheet extractor
    Spreadsheet,
    /// Plain-text reader
    PlainText,
    /// Delimited-table reader
    DelimitedTable,
    /// Email-message extractor
    EmailMessage,
}

/// One uploaded file as received at the transport boundary.
///
/// Lives only for a single request cycle.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original filename as uploaded
    pub filename: String,
    /// Declared MIME content type
    pub content_type: String,
    /// Raw bytes
    pub data: Vec<u8>,
}

/// A chunk of extracted text with its provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Parent document ID
    pub document_id: Uuid,
    /// Originating filename
    pub filename: String,
    /// Originating format
    pub format: FormatTag,
    /// Text content
    pub content: String,
    /// Byte range in the extracted document text
    pub char_start: usize,
    pub char_end: usize,
    /// Chunk index within the document
    pub chunk_index: u32,
}

impl DocumentChunk {
    /// Create a new chunk
    pub fn new(
        document_id: Uuid,
        filename: String,
        format: FormatTag,
        content: String,
        char_start: usize,
        char_end: usize,
        chunk_index: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            filename,
            format,
            content,
            char_start,
            char_end,
            chunk_index,
        }
    }
}

/// Per-file ingestion record returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentDigest {
    /// Document ID
    pub id: Uuid,
    /// Original filename
    pub filename: String,
    /// Resolved format
    pub format: FormatTag,
    /// Content hash of the extracted text
    pub content_hash: String,
    /// Length of the extracted text in bytes
    pub extracted_chars: usize,
    /// Number of chunks created
    pub chunk_count: u32,
}
