pub mod common {
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use review_responder::index::FaqCatalog;
    use review_responder::transformers::providers::{ChatProvider, EmbeddingProvider};
    use review_responder::transformers::types::ChatMessageRequest;
    use review_responder::types::{Embedding, FaqRecord};
    use review_responder::ResponderError;

    pub const SIGN_OFF: &str = "Best regards,\nTeam Zaggle\nZaggle Support Team";

    /// Embeds known texts to fixed vectors; unknown texts map to the origin.
    pub struct ScriptedEmbedder {
        vectors: HashMap<String, Vec<f32>>,
        dimension: usize,
        fail: bool,
        pub calls: AtomicUsize,
    }

    impl ScriptedEmbedder {
        pub fn new(dimension: usize, vectors: &[(&str, Vec<f32>)]) -> Arc<Self> {
            Arc::new(ScriptedEmbedder {
                vectors: vectors
                    .iter()
                    .map(|(t, v)| (t.to_string(), v.clone()))
                    .collect(),
                dimension,
                fail: false,
                calls: AtomicUsize::new(0),
            })
        }

        pub fn failing() -> Arc<Self> {
            Arc::new(ScriptedEmbedder {
                vectors: HashMap::new(),
                dimension: 0,
                fail: true,
                calls: AtomicUsize::new(0),
            })
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EmbeddingProvider for ScriptedEmbedder {
        async fn generate_embedding(
            &self,
            inputs: &[String],
        ) -> Result<Vec<Vec<f32>>, ResponderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ResponderError::UpstreamUnavailable(
                    "embedding service down".to_string(),
                ));
            }
            Ok(inputs
                .iter()
                .map(|t| {
                    self.vectors
                        .get(t)
                        .cloned()
                        .unwrap_or_else(|| vec![0.0; self.dimension])
                })
                .collect())
        }
    }

    /// Answers classifier prompts with `classifier_answer` and every other prompt
    /// with a reply that ends in the sign-off. Records every conversation.
    pub struct ScriptedChat {
        classifier_answer: String,
        fail_generation: bool,
        pub conversations: Mutex<Vec<Vec<ChatMessageRequest>>>,
    }

    impl ScriptedChat {
        pub fn new(classifier_answer: &str) -> Arc<Self> {
            Arc::new(ScriptedChat {
                classifier_answer: classifier_answer.to_string(),
                fail_generation: false,
                conversations: Mutex::new(Vec::new()),
            })
        }

        pub fn failing_generation(classifier_answer: &str) -> Arc<Self> {
            Arc::new(ScriptedChat {
                classifier_answer: classifier_answer.to_string(),
                fail_generation: true,
                conversations: Mutex::new(Vec::new()),
            })
        }

        pub fn classifier_calls(&self) -> usize {
            self.conversations
                .lock()
                .unwrap()
                .iter()
                .filter(|c| is_classifier(c))
                .count()
        }

        pub fn generation_prompts(&self) -> Vec<Vec<ChatMessageRequest>> {
            self.conversations
                .lock()
                .unwrap()
                .iter()
                .filter(|c| !is_classifier(c))
                .cloned()
                .collect()
        }
    }

    fn is_classifier(messages: &[ChatMessageRequest]) -> bool {
        messages
            .first()
            .map(|m| m.content.contains("classifies app reviews"))
            .unwrap_or(false)
    }

    #[async_trait]
    impl ChatProvider for ScriptedChat {
        async fn generate_response(
            &self,
            messages: &[ChatMessageRequest],
        ) -> Result<String, ResponderError> {
            self.conversations.lock().unwrap().push(messages.to_vec());
            if is_classifier(messages) {
                return Ok(self.classifier_answer.clone());
            }
            if self.fail_generation {
                return Err(ResponderError::UpstreamUnavailable(
                    "chat completions timed out".to_string(),
                ));
            }
            Ok(format!(
                "  We're sorry about the trouble. Please update the app and try again.\n\n{SIGN_OFF}\n"
            ))
        }
    }

    pub fn faq_catalog() -> FaqCatalog {
        let records = vec![
            FaqRecord {
                query_text: "App crashes on launch".to_string(),
                answer_text: "Update to the latest version and clear the app cache.".to_string(),
            },
            FaqRecord {
                query_text: "Card payment failed".to_string(),
                answer_text: "Check your card limits under Cards > Settings.".to_string(),
            },
            FaqRecord {
                query_text: "KYC pending".to_string(),
                answer_text: "KYC verification takes up to 48 hours.".to_string(),
            },
        ];
        let embeddings = vec![
            Embedding::new(vec![1.0, 0.0, 0.0]),
            Embedding::new(vec![0.0, 1.0, 0.0]),
            Embedding::new(vec![0.0, 0.0, 1.0]),
        ];
        FaqCatalog::from_embeddings(records, &embeddings).expect("aligned catalog")
    }
}
