//! Context retriever: index query, threshold filter, web fallback.

use std::sync::Arc;

use tracing::{debug, warn};

use mentor_core::config::RetrievalConfig;

use crate::vector::VectorIndex;
use crate::web::WebSearch;

/// Selects supporting context for a chat message.
///
/// Queries the vector index, keeps passages scoring above the threshold,
/// and space-joins their text in returned order. When nothing passes, the
/// web search fallback (if configured) supplies snippets instead. Every
/// failure degrades to an empty context; retrieval never fails a turn.
pub struct ContextRetriever {
    index: Arc<dyn VectorIndex>,
    web: Option<Arc<dyn WebSearch>>,
    top_k: usize,
    threshold: f32,
}

impl ContextRetriever {
    pub fn new(
        index: Arc<dyn VectorIndex>,
        web: Option<Arc<dyn WebSearch>>,
        config: &RetrievalConfig,
    ) -> Self {
        Self {
            index,
            web,
            top_k: config.top_k,
            threshold: config.score_threshold,
        }
    }

    /// Retrieve context for `query`. Infallible by contract.
    pub async fn retrieve(&self, query: &str) -> String {
        let passages = match self.index.search(query, self.top_k).await {
            Ok(passages) => passages,
            Err(e) => {
                warn!(error = %e, "Vector index query failed; continuing without index context");
                Vec::new()
            }
        };

        let relevant: Vec<&str> = passages
            .iter()
            .filter(|p| p.score > self.threshold)
            .map(|p| p.text.as_str())
            .collect();
        debug!(
            candidates = passages.len(),
            relevant = relevant.len(),
            "Vector index query complete"
        );

        if !relevant.is_empty() {
            return relevant.join(" ");
        }

        match self.web {
            Some(ref web) => match web.search(query).await {
                Ok(snippets) => snippets.join(" "),
                Err(e) => {
                    warn!(error = %e, "Web search fallback failed; returning empty context");
                    String::new()
                }
            },
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use mentor_core::{MentorError, RetrievedPassage};

    struct StaticIndex {
        passages: Vec<RetrievedPassage>,
        calls: AtomicUsize,
    }

    impl StaticIndex {
        fn new(scored: &[(&str, f32)]) -> Self {
            Self {
                passages: scored
                    .iter()
                    .map(|(text, score)| RetrievedPassage {
                        text: (*text).to_string(),
                        score: *score,
                    })
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl VectorIndex for StaticIndex {
        async fn search(
            &self,
            _query: &str,
            k: usize,
        ) -> Result<Vec<RetrievedPassage>, MentorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.passages.iter().take(k).cloned().collect())
        }
    }

    struct FailingIndex;

    #[async_trait]
    impl VectorIndex for FailingIndex {
        async fn search(
            &self,
            _query: &str,
            _k: usize,
        ) -> Result<Vec<RetrievedPassage>, MentorError> {
            Err(MentorError::Retrieval("connection refused".to_string()))
        }
    }

    struct StaticWeb {
        results: Vec<String>,
        calls: AtomicUsize,
    }

    impl StaticWeb {
        fn new(results: &[&str]) -> Self {
            Self {
                results: results.iter().map(|s| (*s).to_string()).collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl WebSearch for StaticWeb {
        async fn search(&self, _query: &str) -> Result<Vec<String>, MentorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.results.clone())
        }
    }

    fn config() -> RetrievalConfig {
        RetrievalConfig::default()
    }

    #[tokio::test]
    async fn test_threshold_filter_keeps_order() {
        // Scores [0.95, 0.8, 0.6] with threshold 0.7: exactly the first
        // two survive, in index order.
        let index = Arc::new(StaticIndex::new(&[
            ("first", 0.95),
            ("second", 0.8),
            ("third", 0.6),
        ]));
        let retriever = ContextRetriever::new(index, None, &config());

        assert_eq!(retriever.retrieve("query").await, "first second");
    }

    #[tokio::test]
    async fn test_score_equal_to_threshold_is_excluded() {
        let index = Arc::new(StaticIndex::new(&[("edge", 0.7)]));
        let retriever = ContextRetriever::new(index, None, &config());
        assert_eq!(retriever.retrieve("query").await, "");
    }

    #[tokio::test]
    async fn test_fallback_invoked_exactly_once_when_nothing_passes() {
        let index = Arc::new(StaticIndex::new(&[("weak", 0.2)]));
        let web = Arc::new(StaticWeb::new(&["snippet one", "snippet two"]));
        let retriever = ContextRetriever::new(index, Some(Arc::clone(&web) as _), &config());

        assert_eq!(retriever.retrieve("query").await, "snippet one snippet two");
        assert_eq!(web.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fallback_empty_results_yield_empty_context() {
        let index = Arc::new(StaticIndex::new(&[]));
        let web = Arc::new(StaticWeb::new(&[]));
        let retriever = ContextRetriever::new(index, Some(Arc::clone(&web) as _), &config());

        assert_eq!(retriever.retrieve("query").await, "");
        assert_eq!(web.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fallback_not_invoked_when_passages_pass() {
        let index = Arc::new(StaticIndex::new(&[("strong", 0.99)]));
        let web = Arc::new(StaticWeb::new(&["unused"]));
        let retriever = ContextRetriever::new(index, Some(Arc::clone(&web) as _), &config());

        assert_eq!(retriever.retrieve("query").await, "strong");
        assert_eq!(web.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_index_failure_degrades_to_fallback() {
        let web = Arc::new(StaticWeb::new(&["from the web"]));
        let retriever =
            ContextRetriever::new(Arc::new(FailingIndex), Some(Arc::clone(&web) as _), &config());

        assert_eq!(retriever.retrieve("query").await, "from the web");
    }

    #[tokio::test]
    async fn test_index_failure_without_fallback_is_empty() {
        let retriever = ContextRetriever::new(Arc::new(FailingIndex), None, &config());
        assert_eq!(retriever.retrieve("query").await, "");
    }

    #[tokio::test]
    async fn test_top_k_limits_candidates() {
        let index = Arc::new(StaticIndex::new(&[
            ("a", 0.99),
            ("b", 0.98),
            ("c", 0.97),
            ("d", 0.96),
            ("e", 0.95),
            ("f", 0.94),
        ]));
        let retriever = ContextRetriever::new(Arc::clone(&index) as _, None, &config());

        // Default top_k is 5; the sixth passage is never fetched.
        assert_eq!(retriever.retrieve("query").await, "a b c d e");
        assert_eq!(index.calls.load(Ordering::SeqCst), 1);
    }
}
