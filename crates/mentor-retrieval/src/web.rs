//! Web search fallback collaborator.

use async_trait::async_trait;
use serde::Deserialize;

use mentor_core::{config::WebSearchConfig, MentorError};

/// A service returning text snippets for a free-form query.
///
/// Used only when the vector index produces no passage above the score
/// threshold.
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Search the web for `query`, returning snippets in relevance order.
    async fn search(&self, query: &str) -> Result<Vec<String>, MentorError>;
}

/// HTTP client for a search service exposing `GET /search?query=`.
pub struct HttpWebSearch {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<String>,
}

impl HttpWebSearch {
    pub fn new(config: &WebSearchConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl WebSearch for HttpWebSearch {
    async fn search(&self, query: &str) -> Result<Vec<String>, MentorError> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("query", query)])
            .send()
            .await
            .map_err(|e| MentorError::Retrieval(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MentorError::Retrieval(format!(
                "web search returned status {}",
                response.status()
            )));
        }

        let data: SearchResponse = response
            .json()
            .await
            .map_err(|e| MentorError::Retrieval(e.to_string()))?;

        Ok(data.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_parsing() {
        let body = r#"{"results":["snippet one","snippet two"]}"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.results, vec!["snippet one", "snippet two"]);
    }

    #[test]
    fn test_search_response_missing_results_defaults_empty() {
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.results.is_empty());
    }

    #[tokio::test]
    async fn test_search_unreachable_service_errors() {
        let config = WebSearchConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..WebSearchConfig::default()
        };
        let web = HttpWebSearch::new(&config);
        assert!(web.search("query").await.is_err());
    }
}
