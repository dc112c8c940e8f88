use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProviderError;

/// One call to a search provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderQuery {
    pub index: String,
    pub query: String,
    pub max_results: u32,
    pub rerank: bool,
}

/// Raw provider answer. `results` is optional so a malformed answer can be
/// told apart from an empty one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderResponse {
    #[serde(default)]
    pub results: Option<Vec<ProviderHit>>,
}

impl ProviderResponse {
    pub fn with_results(results: Vec<ProviderHit>) -> Self {
        Self {
            results: Some(results),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProviderHit {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Provider-specific fields, never forwarded to callers.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProviderHit {
    pub fn new(content: impl Into<String>, score: f64) -> Self {
        Self {
            content: content.into(),
            score,
            ..Default::default()
        }
    }
}

/// Managed semantic search, consumed as `search(query, limit, rerank) -> ranked hits`.
///
/// Implementations do not retry; the handler issues exactly one call per request.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &ProviderQuery) -> Result<ProviderResponse, ProviderError>;
}
