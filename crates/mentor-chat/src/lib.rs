//! Conversation orchestration for Mentor.
//!
//! Implements the per-turn pipeline: load or create the conversation,
//! classify the turn (first structured lesson vs. continuation), retrieve
//! supporting context, augment the model-facing prompt, invoke the
//! language model, and persist the completed turn atomically.

pub mod classifier;
pub mod error;
pub mod orchestrator;
pub mod prompt;

pub use classifier::{classify, TurnDecision};
pub use error::ChatError;
pub use orchestrator::{ChatOrchestrator, TurnOutcome};
pub use prompt::LESSON_MARKER;
