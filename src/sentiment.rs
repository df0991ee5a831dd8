use log::debug;
use std::sync::Arc;

use crate::errors::ResponderError;
use crate::transformers::providers::ChatProvider;
use crate::transformers::types::ChatMessageRequest;
use crate::types::{Review, SentimentDecision, SentimentSource};

pub const CLASSIFIER_SYSTEM_PROMPT: &str =
    "You are an assistant that classifies app reviews as positive or negative.";

/// Decides from the rating alone. `None` means the rating is absent or the
/// ambiguous middle value and the classifier must be consulted.
pub fn decide_from_rating(rating: Option<u8>) -> Option<SentimentDecision> {
    match rating {
        Some(r) if r <= 2 => Some(SentimentDecision {
            is_negative: true,
            source: SentimentSource::RatingLow,
        }),
        Some(r) if r >= 4 => Some(SentimentDecision {
            is_negative: false,
            source: SentimentSource::RatingHigh,
        }),
        _ => None,
    }
}

/// The classifier answers in free text; any "yes" in it means negative.
pub fn parse_classifier_answer(answer: &str) -> bool {
    answer.trim().to_lowercase().contains("yes")
}

pub fn classifier_messages(review_text: &str) -> Vec<ChatMessageRequest> {
    vec![
        ChatMessageRequest::system(CLASSIFIER_SYSTEM_PROMPT),
        ChatMessageRequest::user(format!(
            "Is this review negative?\n\nReview: \"{review_text}\""
        )),
    ]
}

#[derive(Clone)]
pub struct SentimentGate {
    classifier: Arc<dyn ChatProvider>,
}

impl SentimentGate {
    pub fn new(classifier: Arc<dyn ChatProvider>) -> Self {
        SentimentGate { classifier }
    }

    pub async fn classify(&self, review: &Review) -> Result<SentimentDecision, ResponderError> {
        if let Some(decision) = decide_from_rating(review.rating()) {
            return Ok(decision);
        }
        let answer = self
            .classifier
            .generate_response(&classifier_messages(review.text()))
            .await?;
        debug!("classifier answered: {}", answer.trim());
        Ok(SentimentDecision {
            is_negative: parse_classifier_answer(&answer),
            source: SentimentSource::Classifier,
        })
    }
}
