//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, request tracing, and all
//! endpoint handlers.

use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use mentor_core::config::ServerConfig;
use mentor_core::MentorError;

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS: the chat frontend is served from localhost:3000 in development.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ]))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/chat", post(handlers::chat))
        .route("/conversation", post(handlers::create_conversation))
        .route(
            "/conversation/{id}/history",
            get(handlers::history),
        )
        .route(
            "/conversation/{id}",
            delete(handlers::delete_conversation),
        )
        .route("/conversations", get(handlers::list_conversations))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured address.
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<(), MentorError> {
    let addr = format!("{}:{}", config.host, config.port);

    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MentorError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!(addr = %addr, "API server listening");

    axum::serve(listener, router)
        .await
        .map_err(|e| MentorError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
