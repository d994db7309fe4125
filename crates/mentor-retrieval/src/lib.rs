//! Context retrieval for Mentor.
//!
//! Queries a remote vector index for passages relevant to a chat message,
//! falling back to a web search service when the index yields nothing
//! useful. Retrieval is best-effort enrichment: failures here degrade the
//! context to an empty string, never the turn.

pub mod retriever;
pub mod vector;
pub mod web;

pub use retriever::ContextRetriever;
pub use vector::{HttpVectorIndex, VectorIndex};
pub use web::{HttpWebSearch, WebSearch};
