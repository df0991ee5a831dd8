use serde::Serialize;
use std::fmt::{Display, Formatter};

use crate::types::SentimentDecision;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplyPolicy {
    NegativeWithFaq,
    NegativeWithoutFaq,
    Positive,
}

impl ReplyPolicy {
    pub fn select(decision: &SentimentDecision, has_faq: bool) -> Self {
        match (decision.is_negative, has_faq) {
            (true, true) => ReplyPolicy::NegativeWithFaq,
            (true, false) => ReplyPolicy::NegativeWithoutFaq,
            (false, _) => ReplyPolicy::Positive,
        }
    }

    pub fn template_name(&self) -> &'static str {
        match self {
            ReplyPolicy::NegativeWithFaq => "negative_with_faq",
            ReplyPolicy::NegativeWithoutFaq => "negative_without_faq",
            ReplyPolicy::Positive => "positive",
        }
    }
}

impl Display for ReplyPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.template_name())
    }
}

/// One system turn followed by user turns, all handlebars sources.
pub struct PromptTemplate {
    pub sys_prompt: &'static str,
    pub user_prompts: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct PromptValues<'a> {
    pub review_text: &'a str,
    pub faq_query: &'a str,
    pub faq_answer: &'a str,
    pub sign_off: &'a str,
}
