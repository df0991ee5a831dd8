use super::types::{PromptTemplate, ReplyPolicy};

pub const SIGN_OFF: &str = "Best regards,\nTeam Zaggle\nZaggle Support Team";

pub const NEGATIVE_FALLBACK_REPLY: &str = "I'm sorry to hear that you had a negative experience. To address your concerns more effectively, could you please contact our support team? They're available to assist you Monday to Friday, from 6 AM to 9 PM. Thank you for your understanding, and we look forward to resolving your issue.";

pub const POSITIVE_FALLBACK_REPLY: &str = "Thank you so much for your positive review! We're delighted to hear that you're enjoying the app.";

pub const NEGATIVE_WITH_FAQ: PromptTemplate = PromptTemplate {
    sys_prompt: "You are a helpful and empathetic customer support agent for a mobile app. Do not start responses with greetings like 'Thank you' or 'Hello'. Be direct and professional.",
    user_prompts: &[
        "User review: \"{{review_text}}\"",
        "The following FAQ might help: \nQ: {{faq_query}}\nA: {{faq_answer}}",
        "Write a direct, professional response to the review above. Do not start with greetings. End the response with '{{sign_off}}'",
    ],
};

pub const NEGATIVE_WITHOUT_FAQ: PromptTemplate = PromptTemplate {
    sys_prompt: "You are a helpful and empathetic support assistant. Do not start responses with greetings like 'Thank you' or 'Hello'. Be direct and professional.",
    user_prompts: &[
        "The user left a negative review: \"{{review_text}}\"",
        "Since we don't have a matching FAQ, write a direct response asking the user to contact our support team. Support hours are Monday to Friday, 6 AM to 9 PM. Do not start with greetings. End the response with '{{sign_off}}'",
    ],
};

pub const POSITIVE: PromptTemplate = PromptTemplate {
    sys_prompt: "You are a friendly customer success agent for Zaggle. Do not start responses with greetings like 'Thank you' or 'Hello'. Be direct and professional. Analyze the review content and provide relevant suggestions based on these rules:
1. If the review mentions rewards, recognition, or brand vouchers, suggest checking out the new Google Pixel vouchers available at a special price.
2. If the review mentions KYC or payments (but not gift cards or Kuber cards), suggest trying Kuber cards for gifting to friends and family.
3. If the review mentions gift cards or Kuber cards, suggest exploring the new bill payments module for credit card bills, electricity bills, etc.
4. If the review mentions expenses, expense reports, advances, or EMS (Expense Management System), suggest exploring the new filters added in Expense Reports.

Offer exactly one suggestion, picking the rule whose topic is most prominent in the review. Make the suggestion feel natural and relevant to their positive experience. Keep the tone friendly and encouraging.",
    user_prompts: &[
        "The user left a positive review: \"{{review_text}}\"",
        "Write a direct response acknowledging their positive feedback and provide a relevant suggestion based on the review content. Do not start with greetings. End the response with '{{sign_off}}'",
    ],
};

pub fn template_for(policy: ReplyPolicy) -> &'static PromptTemplate {
    match policy {
        ReplyPolicy::NegativeWithFaq => &NEGATIVE_WITH_FAQ,
        ReplyPolicy::NegativeWithoutFaq => &NEGATIVE_WITHOUT_FAQ,
        ReplyPolicy::Positive => &POSITIVE,
    }
}

/// Canned reply keyed by rating. Reviews without a rating get the support-hours message.
pub fn canned_reply(rating: Option<u8>) -> &'static str {
    match rating {
        Some(r) if r >= 3 => POSITIVE_FALLBACK_REPLY,
        _ => NEGATIVE_FALLBACK_REPLY,
    }
}
