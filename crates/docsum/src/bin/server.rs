//! Summarization server binary
//!
//! Run with: cargo run -p docsum --bin docsum-server

use docsum::{config::SummarizerConfig, server::SummarizerServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docsum=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration: explicit path, local file, or defaults
    let mut config = match std::env::var("DOCSUM_CONFIG") {
        Ok(path) => SummarizerConfig::from_file(&path)?,
        Err(_) if std::path::Path::new("docsum.toml").exists() => {
            SummarizerConfig::from_file("docsum.toml")?
        }
        Err(_) => SummarizerConfig::default(),
    };

    // The credential is read from the environment only here, at the binary
    // edge; components receive it through explicit configuration.
    if config.llm.api_key.is_empty() {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.llm.api_key = key;
        }
    }
    if config.llm.api_key.is_empty() {
        tracing::warn!("No API key configured; summarization requests will fail");
        tracing::warn!("Set OPENAI_API_KEY or llm.api_key in docsum.toml");
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Default model: {}", config.llm.model);
    tracing::info!("  - Known models: {}", config.models.len());
    tracing::info!("  - Default token budget: {}", config.chunking.default_budget);

    let server = SummarizerServer::new(config);

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/summarize - Upload documents, receive one summary");
    println!("  GET  /api/models    - List configured models");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
