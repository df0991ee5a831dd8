use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::errors::ResponderError;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    // retrieval + generation
    #[default]
    Normal,
    // canned reply keyed by rating, no external calls
    Short,
}

impl FromStr for ResponseMode {
    type Err = ResponderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" | "large" => Ok(ResponseMode::Normal),
            "short" | "small" => Ok(ResponseMode::Short),
            other => Err(ResponderError::InvalidInput(format!(
                "unknown response mode: {other}"
            ))),
        }
    }
}

impl Display for ResponseMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            ResponseMode::Normal => write!(f, "normal"),
            ResponseMode::Short => write!(f, "short"),
        }
    }
}

/// A single incoming product review.
///
/// Fields are private so every `Review` in circulation has passed validation:
/// non-blank text, a rating within 1..=5 when present, and a rating whenever
/// the short mode is requested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Review {
    text: String,
    rating: Option<u8>,
    mode: ResponseMode,
}

impl Review {
    pub fn new(
        text: impl Into<String>,
        rating: Option<u8>,
        mode: ResponseMode,
    ) -> Result<Self, ResponderError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ResponderError::InvalidInput(
                "review text is required".to_string(),
            ));
        }
        if let Some(r) = rating {
            if !(MIN_RATING..=MAX_RATING).contains(&r) {
                return Err(ResponderError::InvalidInput(format!(
                    "rating must be between {MIN_RATING} and {MAX_RATING}, got {r}"
                )));
            }
        }
        if mode == ResponseMode::Short && rating.is_none() {
            return Err(ResponderError::InvalidInput(
                "short responses are keyed by rating; a rating is required".to_string(),
            ));
        }
        Ok(Review { text, rating, mode })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn rating(&self) -> Option<u8> {
        self.rating
    }

    pub fn mode(&self) -> ResponseMode {
        self.mode
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub vector: Vec<f32>,
}

impl Embedding {
    pub fn new(vector: Vec<f32>) -> Self {
        Embedding { vector }
    }

    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}

/// One row of the FAQ metadata table, keyed by the source spreadsheet's column names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqRecord {
    #[serde(rename = "User Query")]
    pub query_text: String,
    #[serde(rename = "Product Responses")]
    pub answer_text: String,
}

impl FaqRecord {
    // the text that gets embedded for this entry
    pub fn embedding_input(&self) -> String {
        format!("{} {}", self.query_text, self.answer_text)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FaqEntry {
    pub id: usize,
    pub query_text: String,
    pub answer_text: String,
    pub embedding: Embedding,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentSource {
    RatingLow,
    RatingHigh,
    Classifier,
}

impl Display for SentimentSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            SentimentSource::RatingLow => write!(f, "rating_low"),
            SentimentSource::RatingHigh => write!(f, "rating_high"),
            SentimentSource::Classifier => write!(f, "classifier"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentDecision {
    pub is_negative: bool,
    pub source: SentimentSource,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub text: String,
}

impl Response {
    pub fn new(text: impl Into<String>) -> Self {
        Response { text: text.into() }
    }
}

impl Display for Response {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.text)
    }
}
