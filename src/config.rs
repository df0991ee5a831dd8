use std::env;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::errors::ResponderError;
use crate::transformers::providers::openai::OPENAI_BASE_URL;

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o";

#[derive(Clone, Debug)]
pub struct Config {
    pub openai_base_url: String,
    pub openai_api_key: Option<String>,
    pub embedding_model: String,
    pub chat_model: String,
    // bound on every outbound model call
    pub request_timeout: Duration,
    pub faq_index_path: PathBuf,
    pub faq_metadata_path: PathBuf,
    pub embed_batch_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Config, ResponderError> {
        let openai_base_url = from_env_default("OPENAI_BASE_URL", OPENAI_BASE_URL);
        Url::parse(&openai_base_url).map_err(|e| {
            ResponderError::InvalidInput(format!("OPENAI_BASE_URL `{openai_base_url}`: {e}"))
        })?;

        let request_timeout_secs: u64 = parse_env("REQUEST_TIMEOUT_SECS", "30")?;
        let embed_batch_size: usize = parse_env("EMBED_BATCH_SIZE", "20")?;
        if embed_batch_size == 0 {
            return Err(ResponderError::InvalidInput(
                "EMBED_BATCH_SIZE must be positive".to_string(),
            ));
        }

        Ok(Config {
            openai_base_url: openai_base_url.trim_end_matches('/').to_string(),
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            embedding_model: from_env_default("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
            chat_model: from_env_default("CHAT_MODEL", DEFAULT_CHAT_MODEL),
            request_timeout: Duration::from_secs(request_timeout_secs),
            faq_index_path: from_env_default("FAQ_INDEX_PATH", "vector_store/faq_index.bin").into(),
            faq_metadata_path: from_env_default(
                "FAQ_METADATA_PATH",
                "vector_store/faq_metadata.json",
            )
            .into(),
            embed_batch_size,
        })
    }
}

/// source a variable from environment - use default if not exists
pub fn from_env_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T>(key: &str, default: &str) -> Result<T, ResponderError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = from_env_default(key, default);
    raw.trim()
        .parse::<T>()
        .map_err(|e| ResponderError::InvalidInput(format!("{key}=`{raw}`: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_default_falls_back() {
        assert_eq!(
            from_env_default("REVIEW_RESPONDER_SURELY_UNSET_VAR", "fallback"),
            "fallback"
        );
    }

    #[test]
    fn test_parse_env_default_value() {
        let n: u64 = parse_env("REVIEW_RESPONDER_SURELY_UNSET_NUM", "42").unwrap();
        assert_eq!(n, 42);
        let bad: Result<u64, _> = parse_env("REVIEW_RESPONDER_SURELY_UNSET_NUM", "forty");
        assert!(matches!(bad, Err(ResponderError::InvalidInput(_))));
    }
}
