//! Core domain types, configuration, and error definitions for Mentor.
//!
//! Everything here is shared across the workspace: the conversation data
//! model, the TOML configuration, and the top-level error type that
//! subsystem errors convert into.

pub mod config;
pub mod error;
pub mod types;

pub use config::MentorConfig;
pub use error::{MentorError, Result};
pub use types::*;
