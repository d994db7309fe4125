//! Chat orchestrator: the per-turn state machine.
//!
//! Composes the turn classifier, context retriever, prompt augmenter,
//! language model, and conversation store. Collaborators are injected at
//! construction; there is no module-level state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use mentor_core::{Conversation, ConversationSummary, LessonState, Message};
use mentor_llm::LanguageModel;
use mentor_retrieval::ContextRetriever;
use mentor_storage::ConversationStore;

use crate::classifier::{classify, TurnDecision};
use crate::error::ChatError;
use crate::prompt::augment;

/// The result of a committed chat turn.
#[derive(Clone, Debug, Serialize)]
pub struct TurnOutcome {
    /// The assistant's reply text.
    pub message: String,
    pub conversation_id: String,
    /// Model identifier that produced the reply.
    pub model: String,
    pub timestamp: DateTime<Utc>,
}

/// Central coordinator for conversation turns.
///
/// A turn proceeds load -> classify -> retrieve -> invoke -> persist; the
/// store upsert is the single atomic commit point, so a failed turn
/// leaves no observable mutation. Turns for the same conversation id are
/// serialized by a per-id async mutex; turns for different ids share no
/// mutable state.
pub struct ChatOrchestrator {
    /// `None` when no language model was available at startup. The
    /// orchestrator then refuses every turn with
    /// [`ChatError::NotInitialized`]; conversation CRUD keeps working.
    llm: Option<Arc<dyn LanguageModel>>,
    retriever: ContextRetriever,
    store: Arc<dyn ConversationStore>,
    turn_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl ChatOrchestrator {
    pub fn new(
        llm: Option<Arc<dyn LanguageModel>>,
        retriever: ContextRetriever,
        store: Arc<dyn ConversationStore>,
    ) -> Self {
        Self {
            llm,
            retriever,
            store,
            turn_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Whether a language model is available for chat turns.
    pub fn is_initialized(&self) -> bool {
        self.llm.is_some()
    }

    /// Process one chat turn.
    ///
    /// With no id, or an id the store cannot resolve, the turn runs
    /// against a fresh conversation that is only persisted when the turn
    /// commits, so a failed first turn leaves no record at all.
    pub async fn chat(
        &self,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<TurnOutcome, ChatError> {
        let llm = self.llm.as_ref().ok_or(ChatError::NotInitialized)?;

        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let (mut conversation, brand_new) = self.resolve_conversation(conversation_id).await?;

        let lock = self.turn_lock(&conversation.id)?;
        let _turn = lock.lock().await;

        // Re-read under the lock: a concurrent turn may have committed
        // between resolution and acquisition.
        if !brand_new {
            if let Some(fresh) = self.store.get(&conversation.id).await? {
                conversation = fresh;
            }
        }

        conversation.messages.push(Message::user(message));

        let decision = classify(&conversation);
        let context = self.retriever.retrieve(message).await;
        let outgoing = augment(decision, &conversation.messages, &context)?;

        let reply = match llm.generate(&outgoing).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(
                    conversation_id = %conversation.id,
                    error = %e,
                    "Model invocation failed; turn aborted"
                );
                return Err(ChatError::Generation(e.to_string()));
            }
        };

        let assistant = Message::assistant(reply.content);
        let timestamp = assistant.timestamp;

        if conversation.title.is_none() {
            conversation.title = Some(message.to_string());
        }
        if decision == TurnDecision::FirstLesson {
            conversation.lesson_state = LessonState::Generated;
        }
        conversation.messages.push(assistant.clone());
        conversation.updated_at = timestamp;

        let acked = self.store.upsert(&conversation).await?;
        if !acked {
            return Err(ChatError::Persistence(
                "store did not acknowledge the write".to_string(),
            ));
        }

        info!(
            conversation_id = %conversation.id,
            decision = ?decision,
            messages = conversation.messages.len(),
            "Chat turn committed"
        );

        Ok(TurnOutcome {
            message: assistant.content,
            conversation_id: conversation.id,
            model: llm.model().to_string(),
            timestamp,
        })
    }

    /// Explicitly create (and persist) an empty conversation.
    pub async fn create_conversation(&self, title: Option<String>) -> Result<String, ChatError> {
        let conversation = Conversation::new(title);
        let acked = self.store.upsert(&conversation).await?;
        if !acked {
            return Err(ChatError::Persistence(
                "store did not acknowledge the write".to_string(),
            ));
        }
        info!(conversation_id = %conversation.id, "Conversation created");
        Ok(conversation.id)
    }

    /// Fetch a conversation by id.
    pub async fn conversation(&self, id: &str) -> Result<Conversation, ChatError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ChatError::NotFound(id.to_string()))
    }

    /// Summaries of all conversations, most recently updated first.
    pub async fn list_conversations(&self) -> Result<Vec<ConversationSummary>, ChatError> {
        Ok(self.store.list_summaries().await?)
    }

    /// Delete a conversation. Deleting an unknown id reports
    /// [`ChatError::NotFound`] rather than failing.
    pub async fn delete_conversation(&self, id: &str) -> Result<(), ChatError> {
        let deleted = self.store.delete(id).await?;
        if !deleted {
            return Err(ChatError::NotFound(id.to_string()));
        }
        if let Ok(mut locks) = self.turn_locks.lock() {
            locks.remove(id);
        }
        info!(conversation_id = %id, "Conversation deleted");
        Ok(())
    }

    // -- Private helpers --

    async fn resolve_conversation(
        &self,
        id: Option<&str>,
    ) -> Result<(Conversation, bool), ChatError> {
        if let Some(id) = id {
            if let Some(existing) = self.store.get(id).await? {
                return Ok((existing, false));
            }
        }
        Ok((Conversation::new(None), true))
    }

    fn turn_lock(&self, id: &str) -> Result<Arc<tokio::sync::Mutex<()>>, ChatError> {
        let mut locks = self
            .turn_locks
            .lock()
            .map_err(|e| ChatError::Persistence(format!("turn lock poisoned: {}", e)))?;
        Ok(Arc::clone(locks.entry(id.to_string()).or_default()))
    }
}

// =============================================================================
// Tests
// =============================================================================
