//! Language model abstraction for Mentor.
//!
//! Defines the object-safe [`LanguageModel`] trait the orchestrator
//! depends on, plus an OpenAI-compatible HTTP implementation. The trait
//! carries no retry policy; transient-failure handling, if any, belongs to
//! the implementation.

use async_trait::async_trait;
use thiserror::Error;

use mentor_core::Message;

mod openai;

pub use openai::OpenAiClient;

/// Errors from a language model collaborator.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("rate limit exceeded")]
    RateLimited,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
}

/// Language model interface: an ordered message sequence in, one generated
/// assistant message out.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a reply to the given conversation.
    ///
    /// May suspend for the duration of model generation; no internal
    /// timeout is applied here.
    async fn generate(&self, messages: &[Message]) -> Result<Message, LlmError>;

    /// The model identifier reported to callers.
    fn model(&self) -> &str;
}

/// Masks an API key for safe logging: first 7 characters + "***" + last 4.
/// Keys of 11 bytes or fewer become "***" so no part leaks.
pub fn mask_key(key: &str) -> String {
    let len = key.len();
    if len <= 11 {
        "***".to_string()
    } else {
        format!("{}***{}", &key[..7], &key[len - 4..])
    }
}
