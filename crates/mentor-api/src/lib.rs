//! HTTP surface for Mentor.
//!
//! A thin axum adapter over the chat orchestrator: route setup, shared
//! application state, request/response types, and the JSON error mapping.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
