//! Prompt augmentation: build the model-facing message sequence.
//!
//! Only the outgoing copy of the just-appended user message is rewritten;
//! the persisted history always keeps the raw user text.

use mentor_core::Message;

use crate::classifier::TurnDecision;
use crate::error::ChatError;

/// Structural tag identifying a generated lesson in assistant output.
pub const LESSON_MARKER: &str = "<lesson>";

/// Build the outgoing message sequence for the language model.
///
/// `messages` is the in-memory history with the new user message already
/// appended. The last message's content is replaced: the lesson
/// instruction template on a `FirstLesson` turn, the context preamble on
/// a `Continuation` turn. Attempting a rewrite on an empty history is an
/// error, never a malformed prompt.
pub fn augment(
    decision: TurnDecision,
    messages: &[Message],
    context: &str,
) -> Result<Vec<Message>, ChatError> {
    let Some((last, rest)) = messages.split_last() else {
        return Err(ChatError::EmptyHistory);
    };

    let content = match decision {
        TurnDecision::FirstLesson => lesson_prompt(context, &last.content),
        TurnDecision::Continuation => continuation_prompt(context, &last.content),
    };

    let mut outgoing = rest.to_vec();
    outgoing.push(Message {
        role: last.role,
        content,
        timestamp: last.timestamp,
    });
    Ok(outgoing)
}

/// Context preamble for continuation turns.
fn continuation_prompt(context: &str, user_text: &str) -> String {
    format!("CONTEXT:\n```md\n{context}\n```\n-------------\nUSER MESSAGE:\n{user_text}")
}

/// Instruction template for the first structured lesson of a conversation.
fn lesson_prompt(context: &str, user_text: &str) -> String {
    format!(
        "Context:\n\
         ```md\n\
         {context}\n\
         ```\n\
         Build a structured lesson for beginners about the following user's topic and the context above.\n\
         User message:\n\
         {user_text}\n\
         \n\
         --------------------------------\n\
         The output must use the following format:\n\
         <h4><topic>Summarized topic from the user message</topic></h4>\n\
         <lesson>The generated lesson as HTML</lesson>\n\
         --------------------------------\n\
         IMPORTANT:\n\
         - do not include <br> tags in the output"
    )
}
