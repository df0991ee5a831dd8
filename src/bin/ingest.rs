use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use review_responder::embedding::EmbeddingClient;
use review_responder::ingest::run_ingestion;
use review_responder::transformers::providers::openai::OpenAIProvider;
use review_responder::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let source: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: faq-ingest <faqs.json>")?;
    let cfg = Config::from_env().context("invalid configuration")?;
    info!("starting FAQ ingestion from {}", source.display());

    let provider = OpenAIProvider::from_config(&cfg)?;
    let client = EmbeddingClient::new(Arc::new(provider));
    let catalog = run_ingestion(
        &source,
        &cfg.faq_index_path,
        &cfg.faq_metadata_path,
        &client,
        cfg.embed_batch_size,
    )
    .await
    .context("FAQ ingestion failed")?;

    info!(
        "indexed {} FAQ entries (dimension {})",
        catalog.len(),
        catalog.dimension()
    );
    Ok(())
}
