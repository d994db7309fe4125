//! Mentor application binary - composition root.
//!
//! Ties together all Mentor crates into a single executable:
//! 1. Load configuration from TOML
//! 2. Open the SQLite conversation store
//! 3. Construct the retrieval collaborators (vector index + web search)
//! 4. Construct the language model client (degraded mode without a key)
//! 5. Start the axum REST API server

use std::path::PathBuf;
use std::sync::Arc;

use mentor_api::{routes, AppState};
use mentor_chat::ChatOrchestrator;
use mentor_core::config::{LlmConfig, MentorConfig, RetrievalConfig};
use mentor_llm::{mask_key, LanguageModel, OpenAiClient};
use mentor_retrieval::{ContextRetriever, HttpVectorIndex, HttpWebSearch, WebSearch};
use mentor_storage::{Database, SqliteConversationStore};

/// Expand ~ to the home directory in a path string.
fn resolve_data_dir(data_dir: &str) -> PathBuf {
    if let Some(rest) = data_dir.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(rest)
    } else {
        PathBuf::from(data_dir)
    }
}

/// Resolve the config file path (MENTOR_CONFIG env, or ~/.mentor/config.toml).
fn config_path() -> PathBuf {
    if let Ok(p) = std::env::var("MENTOR_CONFIG") {
        return PathBuf::from(p);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".mentor").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Mentor v{}", env!("CARGO_PKG_VERSION"));

    // Config.
    let config_file = config_path();
    let mut config = MentorConfig::load_or_default(&config_file);
    if let Some(port) = std::env::var("MENTOR_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
    {
        config.server.port = port;
    }

    // Storage.
    let data_dir = resolve_data_dir(&config.general.data_dir);
    let db_path = data_dir.join("mentor.db");
    let db = Arc::new(Database::new(&db_path)?);
    let store = Arc::new(SqliteConversationStore::new(Arc::clone(&db)));
    tracing::info!(path = %db_path.display(), "SQLite conversation store opened");

    // Retrieval collaborators.
    let index = Arc::new(HttpVectorIndex::new(
        &config.retrieval,
        RetrievalConfig::resolve_api_key(),
    ));
    let web: Option<Arc<dyn WebSearch>> = if config.web_search.enabled {
        Some(Arc::new(HttpWebSearch::new(&config.web_search)))
    } else {
        tracing::info!("Web search fallback disabled in config");
        None
    };
    let retriever = ContextRetriever::new(index, web, &config.retrieval);

    // Language model. Without an API key the server starts in a degraded
    // mode that refuses chat turns but still serves conversation CRUD.
    let llm: Option<Arc<dyn LanguageModel>> = match LlmConfig::resolve_api_key() {
        Some(key) => {
            tracing::info!(
                model = %config.llm.model,
                api_key = %mask_key(&key),
                "Language model client initialized"
            );
            Some(Arc::new(OpenAiClient::new(&config.llm, key)))
        }
        None => {
            tracing::warn!(
                "No API key found (MENTOR_OPENAI_API_KEY / OPENAI_API_KEY); chat turns will be refused"
            );
            None
        }
    };

    let orchestrator = ChatOrchestrator::new(llm, retriever, store);
    let state = AppState::new(Arc::new(orchestrator));

    routes::start_server(&config.server, state).await?;

    Ok(())
}
