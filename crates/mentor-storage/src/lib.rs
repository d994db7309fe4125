//! Conversation persistence for Mentor.
//!
//! Provides the [`ConversationStore`] contract consumed by the chat
//! orchestrator, a SQLite implementation backed by a WAL-mode database,
//! and an in-memory implementation for tests and store-less development.

pub mod db;
pub mod memory;
pub mod migrations;
pub mod repository;

pub use db::Database;
pub use memory::MemoryConversationStore;
pub use repository::{ConversationStore, SqliteConversationStore};
