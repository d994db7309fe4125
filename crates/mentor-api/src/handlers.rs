//! Route handler functions for all API endpoints.
//!
//! Each handler extracts parameters via axum extractors, delegates to the
//! chat orchestrator, and returns JSON responses.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mentor_core::{ConversationSummary, Role};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateConversationRequest {
    pub title: Option<String>,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
    pub conversation_id: String,
    pub model: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateConversationResponse {
    pub conversation_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageView {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub conversation_id: String,
    pub messages: Vec<MessageView>,
    pub title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationsResponse {
    pub conversations: Vec<ConversationSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

// =============================================================================
// Handler functions
// =============================================================================

/// POST /chat - process one chat turn.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let outcome = state
        .chat
        .chat(&request.message, request.conversation_id.as_deref())
        .await?;

    Ok(Json(ChatResponse {
        message: outcome.message,
        conversation_id: outcome.conversation_id,
        model: outcome.model,
        timestamp: outcome.timestamp,
    }))
}

/// POST /conversation - create an empty conversation.
pub async fn create_conversation(
    State(state): State<AppState>,
    Json(request): Json<CreateConversationRequest>,
) -> Result<(StatusCode, Json<CreateConversationResponse>), ApiError> {
    let conversation_id = state.chat.create_conversation(request.title).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateConversationResponse { conversation_id }),
    ))
}

/// GET /conversation/{id}/history - full message history.
pub async fn history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let conversation = state.chat.conversation(&id).await?;

    let messages = conversation
        .messages
        .iter()
        .map(|m| MessageView {
            role: m.role,
            content: m.content.clone(),
            timestamp: m.timestamp,
        })
        .collect();

    Ok(Json(HistoryResponse {
        conversation_id: conversation.id,
        messages,
        title: conversation.title,
    }))
}

/// GET /conversations - summaries, most recently updated first.
pub async fn list_conversations(
    State(state): State<AppState>,
) -> Result<Json<ConversationsResponse>, ApiError> {
    let conversations = state.chat.list_conversations().await?;
    Ok(Json(ConversationsResponse { conversations }))
}

/// DELETE /conversation/{id} - remove a conversation.
pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.chat.delete_conversation(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /health - liveness and readiness.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.chat.is_initialized() {
        "healthy"
    } else {
        "degraded"
    };
    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}
