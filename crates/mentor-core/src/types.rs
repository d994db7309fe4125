use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// The author of a conversation message.
///
/// Tagged at construction; handlers and clients never have to inspect the
/// message shape to recover the role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Wire/database representation of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Parse the wire/database representation back into a `Role`.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the structured lesson response has been generated for a
/// conversation.
///
/// Set exactly once, when the first-lesson turn commits. Defaults to
/// `Pending` when absent so records persisted before the field existed
/// still deserialize.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonState {
    #[default]
    Pending,
    Generated,
}

impl LessonState {
    /// Database representation of the state.
    pub fn as_str(self) -> &'static str {
        match self {
            LessonState::Pending => "pending",
            LessonState::Generated => "generated",
        }
    }

    /// Parse the database representation back into a `LessonState`.
    pub fn parse(s: &str) -> Option<LessonState> {
        match s {
            "pending" => Some(LessonState::Pending),
            "generated" => Some(LessonState::Generated),
            _ => None,
        }
    }
}

// =============================================================================
// Conversation model
// =============================================================================

/// A single message in a conversation.
///
/// Messages are append-only: once pushed onto a conversation they are
/// never edited, and their timestamps are monotonic within a conversation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a user message timestamped now.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create an assistant message timestamped now.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A persisted multi-turn conversation.
///
/// Invariants: `updated_at >= created_at`, refreshed on every successful
/// turn; each successful turn appends exactly one user and one assistant
/// message; every persisted user message is followed by its assistant
/// reply.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: Option<String>,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub lesson_state: LessonState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create an empty conversation with a fresh UUID.
    pub fn new(title: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            messages: Vec::new(),
            lesson_state: LessonState::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// The most recently appended message, if any.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

// =============================================================================
// Retrieval and summaries
// =============================================================================

/// A passage returned by the vector index, ranked by similarity.
///
/// Ephemeral: produced per turn by the context retriever and never
/// persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct RetrievedPassage {
    pub text: String,
    /// Similarity score in `[0, 1]`.
    pub score: f32,
}

/// A one-row view of a conversation for listings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub conversation_id: String,
    pub message_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Last message content, truncated to 50 characters.
    pub last_message: String,
}
