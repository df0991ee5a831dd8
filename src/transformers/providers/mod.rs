pub mod openai;

use async_trait::async_trait;

use crate::errors::ResponderError;
use crate::transformers::types::ChatMessageRequest;

/// Turns text into fixed-dimension vectors. Output order matches input order.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn generate_embedding(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ResponderError>;
}

/// Produces one free-text reply for a sequence of role-tagged turns.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn generate_response(
        &self,
        messages: &[ChatMessageRequest],
    ) -> Result<String, ResponderError>;
}

pub(crate) fn split_vector(vec: &[String], chunk_size: usize) -> Vec<Vec<String>> {
    vec.chunks(chunk_size).map(|chunk| chunk.to_vec()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_vector() {
        let input: Vec<String> = (0..5).map(|i| i.to_string()).collect();
        let chunks = split_vector(&input, 2);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], vec!["0", "1"]);
        assert_eq!(chunks[2], vec!["4"]);
    }
}
