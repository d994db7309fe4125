//! Turn classification: first structured lesson vs. normal continuation.

use mentor_core::{Conversation, LessonState, Role};

use crate::prompt::LESSON_MARKER;

/// How the current turn should be rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnDecision {
    /// No lesson has been generated yet; rewrite the prompt into the
    /// structured lesson template.
    FirstLesson,
    /// A lesson exists somewhere in the history; answer normally.
    Continuation,
}

/// Classify a turn from conversation state.
///
/// The explicit `lesson_state` field decides in the common case. Records
/// persisted before the field existed deserialize as `Pending`, so the
/// full history is scanned for the lesson marker as a fallback; the
/// lesson may have been generated several turns ago, not just in the last
/// message. Pure function; the decision is recomputed every turn and
/// never cached.
pub fn classify(conversation: &Conversation) -> TurnDecision {
    if conversation.lesson_state == LessonState::Generated {
        return TurnDecision::Continuation;
    }

    let lesson_generated = conversation
        .messages
        .iter()
        .any(|m| m.role == Role::Assistant && m.content.contains(LESSON_MARKER));

    if lesson_generated {
        TurnDecision::Continuation
    } else {
        TurnDecision::FirstLesson
    }
}
