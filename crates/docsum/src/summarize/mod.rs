//! Map-reduce summarization providers

pub mod openai;
pub mod prompt;
pub mod provider;

pub use openai::{OpenAiClient, OpenAiSummarizer};
pub use prompt::PromptBuilder;
pub use provider::Summarizer;
