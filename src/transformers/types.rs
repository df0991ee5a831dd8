use serde::{Deserialize, Serialize};

// wire types for OpenAI-compatible embedding and chat completion endpoints

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmbeddingBody {
    pub model: String,
    pub input: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmbeddingResponse {
    pub data: Vec<EmbeddingObject>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmbeddingObject {
    pub index: usize,
    pub embedding: Vec<f32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageRequest {
    pub role: String,
    pub content: String,
}

impl ChatMessageRequest {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessageRequest {
            role: "system".to_owned(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessageRequest {
            role: "user".to_owned(),
            content: content.into(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ChatBody<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessageRequest],
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessageResponse,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChatMessageResponse {
    pub content: Option<String>,
}
