//! In-memory conversation store.
//!
//! Behavioural twin of the SQLite store for tests and store-less
//! development runs.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use mentor_core::{Conversation, ConversationSummary, MentorError};

use crate::repository::{summary_snippet, ConversationStore};

/// Conversation store backed by a process-local map.
#[derive(Default)]
pub struct MemoryConversationStore {
    inner: Mutex<HashMap<String, Conversation>>,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Conversation>>, MentorError> {
        self.inner
            .lock()
            .map_err(|e| MentorError::Persistence(format!("store lock poisoned: {}", e)))
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn upsert(&self, conversation: &Conversation) -> Result<bool, MentorError> {
        self.lock()?
            .insert(conversation.id.clone(), conversation.clone());
        Ok(true)
    }

    async fn get(&self, id: &str) -> Result<Option<Conversation>, MentorError> {
        Ok(self.lock()?.get(id).cloned())
    }

    async fn list_summaries(&self) -> Result<Vec<ConversationSummary>, MentorError> {
        let mut summaries: Vec<ConversationSummary> = self
            .lock()?
            .values()
            .map(|c| ConversationSummary {
                conversation_id: c.id.clone(),
                message_count: c.messages.len(),
                created_at: c.created_at,
                updated_at: c.updated_at,
                last_message: c
                    .last_message()
                    .map(|m| summary_snippet(&m.content))
                    .unwrap_or_default(),
            })
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    async fn delete(&self, id: &str) -> Result<bool, MentorError> {
        Ok(self.lock()?.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use mentor_core::Message;

    #[tokio::test]
    async fn test_round_trip_and_delete() {
        let store = MemoryConversationStore::new();
        let mut conversation = Conversation::new(None);
        conversation.messages.push(Message::user("hello"));

        store.upsert(&conversation).await.unwrap();
        let loaded = store.get(&conversation.id).await.unwrap().unwrap();
        assert_eq!(loaded.messages.len(), 1);

        assert!(store.delete(&conversation.id).await.unwrap());
        assert!(!store.delete(&conversation.id).await.unwrap());
        assert!(store.get(&conversation.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_summaries_ordering() {
        let store = MemoryConversationStore::new();
        let base = Utc::now();

        let mut older = Conversation::new(None);
        older.updated_at = base;
        let mut newer = Conversation::new(None);
        newer.updated_at = base + Duration::seconds(30);

        store.upsert(&older).await.unwrap();
        store.upsert(&newer).await.unwrap();

        let summaries = store.list_summaries().await.unwrap();
        assert_eq!(summaries[0].conversation_id, newer.id);
        assert_eq!(summaries[1].conversation_id, older.id);
    }
}
