//! Application state shared across all route handlers.
//!
//! AppState holds the chat orchestrator and is passed to handlers via
//! axum's State extractor.

use std::sync::Arc;
use std::time::Instant;

use mentor_chat::ChatOrchestrator;

/// Shared application state.
///
/// The orchestrator is `Arc`-shared for cheap cloning across handler
/// tasks. When it was built without a language model it refuses chat
/// turns but keeps serving conversation CRUD.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatOrchestrator>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(chat: Arc<ChatOrchestrator>) -> Self {
        Self {
            chat,
            start_time: Instant::now(),
        }
    }
}
