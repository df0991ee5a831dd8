//! Review-response orchestration.
//!
//! [`Responder::respond`] never fails: short mode returns a canned reply without
//! touching any external service, and every failure in the normal path (embedding,
//! classification, FAQ lookup, generation) degrades to that same canned reply.

use log::{debug, info, warn};
use std::sync::Arc;

use crate::chat::ops::ResponseSynthesizer;
use crate::chat::prompts::canned_reply;
use crate::config::Config;
use crate::embedding::EmbeddingClient;
use crate::errors::ResponderError;
use crate::index::FaqCatalog;
use crate::sentiment::SentimentGate;
use crate::transformers::providers::openai::OpenAIProvider;
use crate::transformers::providers::{ChatProvider, EmbeddingProvider};
use crate::types::{FaqEntry, Response, ResponseMode, Review};

pub struct Responder {
    embedder: EmbeddingClient,
    gate: SentimentGate,
    synthesizer: ResponseSynthesizer,
    catalog: Option<Arc<FaqCatalog>>,
}

pub fn canned_response(rating: Option<u8>) -> Response {
    Response::new(canned_reply(rating))
}

impl Responder {
    pub fn new(
        embedding: Arc<dyn EmbeddingProvider>,
        chat: Arc<dyn ChatProvider>,
        catalog: Option<Arc<FaqCatalog>>,
    ) -> Result<Self, ResponderError> {
        Ok(Responder {
            embedder: EmbeddingClient::new(embedding),
            gate: SentimentGate::new(chat.clone()),
            synthesizer: ResponseSynthesizer::new(chat)?,
            catalog,
        })
    }

    /// Loads the FAQ artifacts and wires the OpenAI provider. Errors here abort startup.
    pub fn from_config(cfg: &Config) -> Result<Self, ResponderError> {
        let catalog = FaqCatalog::load(&cfg.faq_index_path, &cfg.faq_metadata_path)?;
        let provider = Arc::new(OpenAIProvider::from_config(cfg)?);
        Responder::new(provider.clone(), provider, Some(Arc::new(catalog)))
    }

    pub async fn respond(&self, review: &Review) -> Response {
        if review.mode() == ResponseMode::Short {
            return canned_response(review.rating());
        }

        info!("review: {}", review.text());
        if let Some(rating) = review.rating() {
            info!("rating: {rating}");
        }

        match self.generate(review).await {
            Ok(response) => response,
            Err(e) => {
                warn!("replying with canned response: {e}");
                canned_response(review.rating())
            }
        }
    }

    /// Caller-facing entry point. Only input validation can fail.
    pub async fn respond_to(
        &self,
        text: &str,
        rating: Option<u8>,
        mode: Option<ResponseMode>,
    ) -> Result<String, ResponderError> {
        let review = Review::new(text, rating, mode.unwrap_or_default())?;
        Ok(self.respond(&review).await.text)
    }

    async fn generate(&self, review: &Review) -> Result<Response, ResponderError> {
        // Review guarantees non-blank text
        let embedding = self.embedder.embed(review.text()).await?;
        let decision = self.gate.classify(review).await?;
        debug!(
            "sentiment: negative={} source={}",
            decision.is_negative, decision.source
        );

        let faq: Option<FaqEntry> = if decision.is_negative {
            let catalog = self.catalog.as_ref().ok_or_else(|| {
                ResponderError::IndexNotLoaded("no FAQ catalog attached".to_string())
            })?;
            catalog.nearest(&embedding)?
        } else {
            None
        };
        if let Some(entry) = &faq {
            debug!("matched FAQ #{}: {}", entry.id, entry.query_text);
        }

        self.synthesizer
            .synthesize(review, &decision, faq.as_ref())
            .await
    }
}
