//! Conversation store contract and its SQLite implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, OptionalExtension};

use mentor_core::{Conversation, ConversationSummary, LessonState, MentorError, Message, Role};

use crate::db::Database;

/// Maximum characters of the last message shown in a summary.
const SNIPPET_LEN: usize = 50;

/// Key-value persistence for conversations, keyed by conversation id.
///
/// `upsert` is the single atomic commit point for a chat turn: a turn
/// either lands completely (user message + assistant reply + metadata) or
/// not at all.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Create or replace the stored record. Returns `true` when the write
    /// was acknowledged.
    async fn upsert(&self, conversation: &Conversation) -> Result<bool, MentorError>;

    /// Fetch a conversation by id, `None` when absent.
    async fn get(&self, id: &str) -> Result<Option<Conversation>, MentorError>;

    /// Summaries of all conversations, ordered by `updated_at` descending.
    async fn list_summaries(&self) -> Result<Vec<ConversationSummary>, MentorError>;

    /// Delete a conversation. Returns `false` when the id was absent.
    async fn delete(&self, id: &str) -> Result<bool, MentorError>;
}

/// Truncate a message body for summary listings.
pub(crate) fn summary_snippet(content: &str) -> String {
    let mut snippet: String = content.chars().take(SNIPPET_LEN).collect();
    if content.chars().count() > SNIPPET_LEN {
        snippet.push_str("...");
    }
    snippet
}

fn from_epoch(secs: i64) -> Result<DateTime<Utc>, MentorError> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| MentorError::Persistence(format!("invalid timestamp: {}", secs)))
}

/// SQLite-backed conversation store.
pub struct SqliteConversationStore {
    db: Arc<Database>,
}

impl SqliteConversationStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConversationStore for SqliteConversationStore {
    async fn upsert(&self, conversation: &Conversation) -> Result<bool, MentorError> {
        self.db.with_conn(|conn| {
            let tx = conn
                .transaction()
                .map_err(|e| MentorError::Persistence(format!("Failed to begin upsert: {}", e)))?;

            tx.execute(
                "INSERT INTO conversations (id, title, lesson_state, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (id) DO UPDATE SET
                     title = excluded.title,
                     lesson_state = excluded.lesson_state,
                     updated_at = excluded.updated_at",
                params![
                    conversation.id,
                    conversation.title,
                    conversation.lesson_state.as_str(),
                    conversation.created_at.timestamp(),
                    conversation.updated_at.timestamp(),
                ],
            )
            .map_err(|e| MentorError::Persistence(format!("Failed to upsert conversation: {}", e)))?;

            // Messages are replaced wholesale; the record mirrors the
            // in-memory conversation exactly.
            tx.execute(
                "DELETE FROM messages WHERE conversation_id = ?1",
                params![conversation.id],
            )
            .map_err(|e| MentorError::Persistence(format!("Failed to clear messages: {}", e)))?;

            {
                let mut stmt = tx
                    .prepare(
                        "INSERT INTO messages (conversation_id, seq, role, content, timestamp)
                         VALUES (?1, ?2, ?3, ?4, ?5)",
                    )
                    .map_err(|e| MentorError::Persistence(e.to_string()))?;
                for (seq, message) in conversation.messages.iter().enumerate() {
                    stmt.execute(params![
                        conversation.id,
                        seq as i64,
                        message.role.as_str(),
                        message.content,
                        message.timestamp.timestamp(),
                    ])
                    .map_err(|e| {
                        MentorError::Persistence(format!("Failed to insert message: {}", e))
                    })?;
                }
            }

            tx.commit()
                .map_err(|e| MentorError::Persistence(format!("Failed to commit upsert: {}", e)))?;
            Ok(true)
        })
    }

    async fn get(&self, id: &str) -> Result<Option<Conversation>, MentorError> {
        self.db.with_conn(|conn| {
            let header = conn
                .query_row(
                    "SELECT id, title, lesson_state, created_at, updated_at
                     FROM conversations WHERE id = ?1",
                    params![id],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, Option<String>>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, i64>(3)?,
                            row.get::<_, i64>(4)?,
                        ))
                    },
                )
                .optional()
                .map_err(|e| MentorError::Persistence(e.to_string()))?;

            let Some((id, title, state, created_at, updated_at)) = header else {
                return Ok(None);
            };

            let mut stmt = conn
                .prepare(
                    "SELECT role, content, timestamp FROM messages
                     WHERE conversation_id = ?1 ORDER BY seq",
                )
                .map_err(|e| MentorError::Persistence(e.to_string()))?;
            let rows = stmt
                .query_map(params![id], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                })
                .map_err(|e| MentorError::Persistence(e.to_string()))?;

            let mut messages = Vec::new();
            for row in rows {
                let (role, content, timestamp) =
                    row.map_err(|e| MentorError::Persistence(e.to_string()))?;
                messages.push(Message {
                    role: Role::parse(&role).ok_or_else(|| {
                        MentorError::Persistence(format!("unknown role: {}", role))
                    })?,
                    content,
                    timestamp: from_epoch(timestamp)?,
                });
            }

            Ok(Some(Conversation {
                id,
                title,
                messages,
                lesson_state: LessonState::parse(&state).ok_or_else(|| {
                    MentorError::Persistence(format!("unknown lesson state: {}", state))
                })?,
                created_at: from_epoch(created_at)?,
                updated_at: from_epoch(updated_at)?,
            }))
        })
    }

    async fn list_summaries(&self) -> Result<Vec<ConversationSummary>, MentorError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT c.id, c.created_at, c.updated_at,
                            (SELECT COUNT(*) FROM messages m
                              WHERE m.conversation_id = c.id),
                            (SELECT m.content FROM messages m
                              WHERE m.conversation_id = c.id
                              ORDER BY m.seq DESC LIMIT 1)
                     FROM conversations c
                     ORDER BY c.updated_at DESC, c.id",
                )
                .map_err(|e| MentorError::Persistence(e.to_string()))?;

            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, Option<String>>(4)?,
                    ))
                })
                .map_err(|e| MentorError::Persistence(e.to_string()))?;

            let mut summaries = Vec::new();
            for row in rows {
                let (id, created_at, updated_at, message_count, last_message) =
                    row.map_err(|e| MentorError::Persistence(e.to_string()))?;
                summaries.push(ConversationSummary {
                    conversation_id: id,
                    message_count: message_count as usize,
                    created_at: from_epoch(created_at)?,
                    updated_at: from_epoch(updated_at)?,
                    last_message: last_message.as_deref().map(summary_snippet).unwrap_or_default(),
                });
            }
            Ok(summaries)
        })
    }

    async fn delete(&self, id: &str) -> Result<bool, MentorError> {
        self.db.with_conn(|conn| {
            // Messages are removed by the ON DELETE CASCADE constraint.
            let deleted = conn
                .execute("DELETE FROM conversations WHERE id = ?1", params![id])
                .map_err(|e| {
                    MentorError::Persistence(format!("Failed to delete conversation: {}", e))
                })?;
            Ok(deleted > 0)
        })
    }
}
