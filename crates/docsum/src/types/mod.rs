//! Core data types

pub mod document;
pub mod request;
pub mod response;

pub use document::{DocumentChunk, DocumentDigest, FormatTag, LoaderKind, UploadedFile};
pub use request::SummarizeOptions;
pub use response::{ModelInfo, ModelsResponse, SummarizeResponse};
