use log::debug;
use std::sync::Arc;

use crate::errors::ResponderError;
use crate::transformers::providers::EmbeddingProvider;
use crate::types::Embedding;

/// Thin wrapper over an [`EmbeddingProvider`] enforcing one vector per input and a
/// single shared dimension. No caching: every review is embedded fresh.
#[derive(Clone)]
pub struct EmbeddingClient {
    provider: Arc<dyn EmbeddingProvider>,
}

impl EmbeddingClient {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        EmbeddingClient { provider }
    }

    pub async fn embed(&self, text: &str) -> Result<Embedding, ResponderError> {
        if text.is_empty() {
            return Err(ResponderError::InvalidInput(
                "cannot embed empty text".to_string(),
            ));
        }
        let mut vectors = self.provider.generate_embedding(&[text.to_string()]).await?;
        if vectors.len() != 1 {
            return Err(ResponderError::UpstreamUnavailable(format!(
                "expected 1 embedding, received {}",
                vectors.len()
            )));
        }
        let vector = vectors.remove(0);
        if vector.is_empty() {
            return Err(ResponderError::UpstreamUnavailable(
                "received an empty embedding".to_string(),
            ));
        }
        Ok(Embedding::new(vector))
    }

    /// Embeds `texts` in chunks of `batch_size`, used by offline ingestion.
    pub async fn embed_batch(
        &self,
        texts: &[String],
        batch_size: usize,
    ) -> Result<Vec<Embedding>, ResponderError> {
        if batch_size == 0 {
            return Err(ResponderError::InvalidInput(
                "batch_size must be positive".to_string(),
            ));
        }
        let mut embeddings: Vec<Embedding> = Vec::with_capacity(texts.len());
        for (i, batch) in texts.chunks(batch_size).enumerate() {
            debug!("embedding batch {} ({} texts)", i, batch.len());
            let vectors = self.provider.generate_embedding(batch).await?;
            if vectors.len() != batch.len() {
                return Err(ResponderError::UpstreamUnavailable(format!(
                    "batch {} returned {} embeddings for {} inputs",
                    i,
                    vectors.len(),
                    batch.len()
                )));
            }
            embeddings.extend(vectors.into_iter().map(Embedding::new));
        }

        if let Some(first) = embeddings.first() {
            let expected = first.dimension();
            if let Some(bad) = embeddings.iter().find(|e| e.dimension() != expected) {
                return Err(ResponderError::DimensionMismatch {
                    expected,
                    actual: bad.dimension(),
                });
            }
        }
        Ok(embeddings)
    }
}
