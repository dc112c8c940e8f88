use axum::http::{Method, StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::api::models::{SearchResponse, SearchResult};
use crate::config::{AI_SEARCH_NAME, SearchConfig};
use crate::error::SearchError;

use super::provider::{ProviderHit, ProviderQuery, SearchProvider};
use super::request::SearchRequest;

/// The `/api/search` pipeline: validate, check configuration, call the
/// provider once, normalize. Holds no per-request state, so one instance is
/// shared by every request.
pub struct SearchHandler {
    provider: Arc<dyn SearchProvider>,
    config: SearchConfig,
}

impl SearchHandler {
    pub fn new(provider: Arc<dyn SearchProvider>, config: SearchConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Transport-level entry point. Every outcome, including failures, becomes
    /// a status and a JSON body.
    pub async fn handle(&self, method: &Method, body: &[u8]) -> (StatusCode, Value) {
        let outcome = if method == Method::POST {
            self.search(body).await
        } else {
            Err(SearchError::MethodNotAllowed)
        };

        match outcome {
            Ok(response) => (StatusCode::OK, json!(response)),
            Err(err) => {
                if err.is_client_error() {
                    tracing::debug!(method = %method, error = %err, "rejected search request");
                }
                (err.status(), json!(err.to_response()))
            }
        }
    }

    pub async fn search(&self, body: &[u8]) -> Result<SearchResponse, SearchError> {
        let request = SearchRequest::parse(body)?;
        self.run(request).await
    }

    /// Execute an already validated request.
    pub async fn run(&self, request: SearchRequest) -> Result<SearchResponse, SearchError> {
        let Some(index) = self.config.index_name.as_deref() else {
            tracing::error!(
                kind = "config",
                key = AI_SEARCH_NAME,
                "search is not configured, provider not called"
            );
            return Err(SearchError::NotConfigured);
        };

        let provider_query = ProviderQuery {
            index: index.to_string(),
            query: request.query.clone(),
            max_results: request.limit,
            rerank: true,
        };

        let response =
            match tokio::time::timeout(self.config.timeout, self.provider.search(&provider_query))
                .await
            {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => {
                    let message = e.to_string();
                    tracing::error!(
                        kind = "provider",
                        index,
                        limit = request.limit,
                        error = %message,
                        "search provider call failed"
                    );
                    return Err(SearchError::ProviderFailed(message));
                }
                Err(_) => {
                    tracing::error!(
                        kind = "provider",
                        index,
                        timeout_ms = self.config.timeout.as_millis() as u64,
                        error = "timeout",
                        "search provider call timed out"
                    );
                    return Err(SearchError::ProviderFailed("timeout".to_string()));
                }
            };

        let Some(hits) = response.results else {
            tracing::error!(
                kind = "provider",
                index,
                "search provider response has no results collection"
            );
            return Err(SearchError::InvalidResponse);
        };

        let results: Vec<SearchResult> = hits.into_iter().map(normalize).collect();
        let count = results.len();

        Ok(SearchResponse {
            results,
            count,
            query: request.query,
        })
    }
}

/// Keep `content`, `score` and `metadata`; drop everything provider specific.
fn normalize(hit: ProviderHit) -> SearchResult {
    SearchResult {
        content: hit.content,
        score: hit.score,
        metadata: hit.metadata,
    }
}
