//! Remote vector index collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use mentor_core::{config::RetrievalConfig, MentorError, RetrievedPassage};

/// A service returning passages ranked by semantic similarity to a query.
///
/// Embedding computation happens behind this boundary; callers deal in
/// query strings and scored text only.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Top-`k` similarity search for `query`, most similar first.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedPassage>, MentorError>;
}

/// HTTP client for a remote vector index exposing a `POST /query` endpoint.
pub struct HttpVectorIndex {
    http: reqwest::Client,
    base_url: String,
    namespace: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    top_k: usize,
    namespace: &'a str,
}

#[derive(Deserialize)]
struct QueryResponse {
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    text: String,
    score: f32,
}

impl HttpVectorIndex {
    /// Build a client from the retrieval config section and an optional
    /// API key.
    pub fn new(config: &RetrievalConfig, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.index_url.trim_end_matches('/').to_string(),
            namespace: config.namespace.clone(),
            api_key,
        }
    }
}

#[async_trait]
impl VectorIndex for HttpVectorIndex {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedPassage>, MentorError> {
        let url = format!("{}/query", self.base_url);

        let mut request = self.http.post(&url).json(&QueryRequest {
            query,
            top_k: k,
            namespace: &self.namespace,
        });
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MentorError::Retrieval(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MentorError::Retrieval(format!(
                "index returned status {}",
                response.status()
            )));
        }

        let data: QueryResponse = response
            .json()
            .await
            .map_err(|e| MentorError::Retrieval(e.to_string()))?;

        Ok(data
            .matches
            .into_iter()
            .map(|m| RetrievedPassage {
                text: m.text,
                score: m.score,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_request_serialization() {
        let request = QueryRequest {
            query: "tcp handshake",
            top_k: 5,
            namespace: "default",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["query"], "tcp handshake");
        assert_eq!(json["top_k"], 5);
        assert_eq!(json["namespace"], "default");
    }

    #[test]
    fn test_query_response_parsing() {
        let body = r#"{"matches":[{"text":"a","score":0.95},{"text":"b","score":0.42}]}"#;
        let parsed: QueryResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.matches.len(), 2);
        assert_eq!(parsed.matches[0].text, "a");
        assert!((parsed.matches[1].score - 0.42).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_search_unreachable_index_errors() {
        let config = RetrievalConfig {
            index_url: "http://127.0.0.1:9".to_string(),
            ..RetrievalConfig::default()
        };
        let index = HttpVectorIndex::new(&config, None);
        let result = index.search("query", 5).await;
        assert!(matches!(result, Err(MentorError::Retrieval(_))));
    }
}
