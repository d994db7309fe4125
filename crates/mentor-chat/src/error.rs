//! Error types for conversation orchestration.

use mentor_core::MentorError;
use mentor_llm::LlmError;

/// Errors surfaced at the turn boundary.
///
/// Retrieval failures never appear here: the context retriever absorbs
/// them and degrades to an empty context.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The language model collaborator was unavailable at startup; every
    /// turn is refused rather than attempted partially.
    #[error("language model not initialized")]
    NotInitialized,
    #[error("conversation not found: {0}")]
    NotFound(String),
    #[error("message cannot be empty")]
    EmptyMessage,
    /// Defensive check in the prompt augmenter: a rewrite was attempted
    /// on an empty history.
    #[error("conversation history is empty")]
    EmptyHistory,
    /// Model invocation failed; the turn is aborted with no persisted
    /// side effect.
    #[error("generation failed: {0}")]
    Generation(String),
    /// The store write failed; the reply must not be reported as
    /// delivered.
    #[error("persistence failed: {0}")]
    Persistence(String),
}

impl From<MentorError> for ChatError {
    fn from(err: MentorError) -> Self {
        match err {
            MentorError::Generation(msg) => ChatError::Generation(msg),
            other => ChatError::Persistence(other.to_string()),
        }
    }
}

impl From<LlmError> for ChatError {
    fn from(err: LlmError) -> Self {
        ChatError::Generation(err.to_string())
    }
}
