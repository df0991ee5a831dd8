use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{split_vector, ChatProvider, EmbeddingProvider};
use crate::config::{Config, DEFAULT_CHAT_MODEL, DEFAULT_EMBEDDING_MODEL};
use crate::errors::ResponderError;
use crate::transformers::http_handler::handle_response;
use crate::transformers::types::{
    ChatBody, ChatMessageRequest, ChatResponse, EmbeddingBody, EmbeddingResponse,
};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
// hard limit on inputs per embeddings request
pub const MAX_INPUTS_PER_REQUEST: usize = 2048;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct OpenAIProvider {
    pub url: String,
    api_key: String,
    pub embedding_model: String,
    pub chat_model: String,
    pub timeout: Duration,
    client: Client,
}

impl OpenAIProvider {
    pub fn new(url: Option<String>, api_key: Option<String>) -> Result<Self, ResponderError> {
        let final_url = match url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => OPENAI_BASE_URL.to_string(),
        };
        // the key is resolved by Config; an empty key is the same as none
        let final_api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ResponderError::InvalidInput("OPENAI_API_KEY not set".to_string()))?;
        Ok(OpenAIProvider {
            url: final_url,
            api_key: final_api_key,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            client: Client::new(),
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, ResponderError> {
        Ok(
            OpenAIProvider::new(Some(cfg.openai_base_url.clone()), cfg.openai_api_key.clone())?
                .with_models(&cfg.embedding_model, &cfg.chat_model)
                .with_timeout(cfg.request_timeout),
        )
    }

    pub fn with_models(mut self, embedding_model: &str, chat_model: &str) -> Self {
        self.embedding_model = embedding_model.to_string();
        self.chat_model = chat_model.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIProvider {
    async fn generate_embedding(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ResponderError> {
        let embeddings_url = format!("{}/embeddings", self.url);
        let mut all_embeddings: Vec<Vec<f32>> = Vec::with_capacity(inputs.len());

        for chunk in split_vector(inputs, MAX_INPUTS_PER_REQUEST) {
            let expected = chunk.len();
            let payload = EmbeddingBody {
                model: self.embedding_model.clone(),
                input: chunk,
            };
            let response = self
                .client
                .post(&embeddings_url)
                .timeout(self.timeout)
                .header("Accept", "application/json")
                .header("Content-Type", "application/json")
                .header("Authorization", format!("Bearer {}", self.api_key))
                .json(&payload)
                .send()
                .await?;

            let mut embeddings =
                handle_response::<EmbeddingResponse>(response, "embeddings").await?;
            if embeddings.data.len() != expected {
                return Err(ResponderError::UpstreamUnavailable(format!(
                    "embeddings returned {} vectors for {} inputs",
                    embeddings.data.len(),
                    expected
                )));
            }
            // the API tags each vector with its input position
            embeddings.data.sort_by_key(|d| d.index);
            all_embeddings.extend(embeddings.data.into_iter().map(|d| d.embedding));
        }
        Ok(all_embeddings)
    }
}

#[async_trait]
impl ChatProvider for OpenAIProvider {
    async fn generate_response(
        &self,
        messages: &[ChatMessageRequest],
    ) -> Result<String, ResponderError> {
        let chat_url = format!("{}/chat/completions", self.url);
        let body = ChatBody {
            model: &self.chat_model,
            messages,
        };
        let response = self
            .client
            .post(&chat_url)
            .timeout(self.timeout)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;
        let chat_response = handle_response::<ChatResponse>(response, "chat/completions").await?;
        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                ResponderError::UpstreamUnavailable("no response from chat model".to_string())
            })
    }
}
