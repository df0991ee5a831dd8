use handlebars::{no_escape, Handlebars};
use log::debug;
use std::sync::Arc;

use super::prompts::{template_for, SIGN_OFF};
use super::types::{PromptValues, ReplyPolicy};
use crate::errors::ResponderError;
use crate::transformers::providers::ChatProvider;
use crate::transformers::types::ChatMessageRequest;
use crate::types::{FaqEntry, Response, Review, SentimentDecision};

const POLICIES: [ReplyPolicy; 3] = [
    ReplyPolicy::NegativeWithFaq,
    ReplyPolicy::NegativeWithoutFaq,
    ReplyPolicy::Positive,
];

pub struct ResponseSynthesizer {
    chat: Arc<dyn ChatProvider>,
    registry: Handlebars<'static>,
}

impl ResponseSynthesizer {
    pub fn new(chat: Arc<dyn ChatProvider>) -> Result<Self, ResponderError> {
        let mut registry = Handlebars::new();
        // prompts are plain text, not HTML
        registry.register_escape_fn(no_escape);
        registry.set_strict_mode(true);
        for policy in POLICIES {
            let template = template_for(policy);
            registry.register_template_string(&system_key(policy), template.sys_prompt)?;
            for (i, user_prompt) in template.user_prompts.iter().enumerate() {
                registry.register_template_string(&user_key(policy, i), user_prompt)?;
            }
        }
        Ok(ResponseSynthesizer { chat, registry })
    }

    pub fn build_messages(
        &self,
        policy: ReplyPolicy,
        review: &Review,
        faq: Option<&FaqEntry>,
    ) -> Result<Vec<ChatMessageRequest>, ResponderError> {
        let values = PromptValues {
            review_text: review.text(),
            faq_query: faq.map(|f| f.query_text.as_str()).unwrap_or_default(),
            faq_answer: faq.map(|f| f.answer_text.as_str()).unwrap_or_default(),
            sign_off: SIGN_OFF,
        };
        let template = template_for(policy);
        let mut messages = Vec::with_capacity(template.user_prompts.len() + 1);
        messages.push(ChatMessageRequest::system(
            self.registry.render(&system_key(policy), &values)?,
        ));
        for i in 0..template.user_prompts.len() {
            messages.push(ChatMessageRequest::user(
                self.registry.render(&user_key(policy, i), &values)?,
            ));
        }
        Ok(messages)
    }

    pub async fn synthesize(
        &self,
        review: &Review,
        decision: &SentimentDecision,
        faq: Option<&FaqEntry>,
    ) -> Result<Response, ResponderError> {
        let policy = ReplyPolicy::select(decision, faq.is_some());
        debug!("synthesizing reply with policy {policy}");
        let messages = self.build_messages(policy, review, faq)?;
        let reply = self.chat.generate_response(&messages).await?;
        Ok(Response::new(reply.trim()))
    }
}

fn system_key(policy: ReplyPolicy) -> String {
    format!("{}.system", policy.template_name())
}

fn user_key(policy: ReplyPolicy, i: usize) -> String {
    format!("{}.user.{}", policy.template_name(), i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Embedding, ResponseMode, SentimentSource};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct EchoChat {
        seen: Mutex<Vec<Vec<ChatMessageRequest>>>,
    }

    #[async_trait]
    impl ChatProvider for EchoChat {
        async fn generate_response(
            &self,
            messages: &[ChatMessageRequest],
        ) -> Result<String, ResponderError> {
            self.seen.lock().unwrap().push(messages.to_vec());
            Ok(format!("\n  We are on it.\n\n{SIGN_OFF}  \n"))
        }
    }

    fn faq() -> FaqEntry {
        FaqEntry {
            id: 0,
            query_text: "App crashes on launch".to_string(),
            answer_text: "Update to the latest version & clear the cache.".to_string(),
            embedding: Embedding::new(vec![0.0, 1.0]),
        }
    }

    fn negative() -> SentimentDecision {
        SentimentDecision {
            is_negative: true,
            source: SentimentSource::RatingLow,
        }
    }

    #[test]
    fn test_policy_selection() {
        let positive = SentimentDecision {
            is_negative: false,
            source: SentimentSource::RatingHigh,
        };
        assert_eq!(
            ReplyPolicy::select(&negative(), true),
            ReplyPolicy::NegativeWithFaq
        );
        assert_eq!(
            ReplyPolicy::select(&negative(), false),
            ReplyPolicy::NegativeWithoutFaq
        );
        assert_eq!(ReplyPolicy::select(&positive, true), ReplyPolicy::Positive);
        assert_eq!(ReplyPolicy::select(&positive, false), ReplyPolicy::Positive);
    }

    #[test]
    fn test_negative_with_faq_messages() {
        let synthesizer = ResponseSynthesizer::new(Arc::new(EchoChat {
            seen: Mutex::new(vec![]),
        }))
        .unwrap();
        let review = Review::new("It \"always\" crashes", Some(1), ResponseMode::Normal).unwrap();
        let faq = faq();
        let messages = synthesizer
            .build_messages(ReplyPolicy::NegativeWithFaq, &review, Some(&faq))
            .unwrap();

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, "system");
        // no HTML escaping of quotes or ampersands
        assert_eq!(messages[1].content, "User review: \"It \"always\" crashes\"");
        assert_eq!(
            messages[2].content,
            "The following FAQ might help: \nQ: App crashes on launch\nA: Update to the latest version & clear the cache."
        );
        assert!(messages[3]
            .content
            .ends_with("'Best regards,\nTeam Zaggle\nZaggle Support Team'"));
    }

    #[test]
    fn test_negative_without_faq_mentions_support_hours() {
        let synthesizer = ResponseSynthesizer::new(Arc::new(EchoChat {
            seen: Mutex::new(vec![]),
        }))
        .unwrap();
        let review = Review::new("Refund never arrived", None, ResponseMode::Normal).unwrap();
        let messages = synthesizer
            .build_messages(ReplyPolicy::NegativeWithoutFaq, &review, None)
            .unwrap();
        assert_eq!(messages.len(), 3);
        assert!(messages[2].content.contains("Monday to Friday, 6 AM to 9 PM"));
        assert!(messages
            .iter()
            .all(|m| !m.content.contains("FAQ might help")));
    }

    #[tokio::test]
    async fn test_synthesize_trims_reply() {
        let chat = Arc::new(EchoChat {
            seen: Mutex::new(vec![]),
        });
        let synthesizer = ResponseSynthesizer::new(chat.clone()).unwrap();
        let review = Review::new("Love the vouchers", Some(5), ResponseMode::Normal).unwrap();
        let decision = SentimentDecision {
            is_negative: false,
            source: SentimentSource::RatingHigh,
        };

        let response = synthesizer.synthesize(&review, &decision, None).await.unwrap();
        assert!(response.text.starts_with("We are on it."));
        assert!(response.text.ends_with(SIGN_OFF));

        let seen = chat.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0][0].content.contains("Google Pixel vouchers"));
    }
}
