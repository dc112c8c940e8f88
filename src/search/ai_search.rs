//! HTTP client for the managed AI Search (AutoRAG) REST API.
//!
//! Only the retrieval endpoint is used:
//!
//! ```text
//! POST {base_url}/accounts/{account_id}/autorag/rags/{index}/search
//! Authorization: Bearer {api_token}
//! {"query": "...", "max_num_results": 10, "rewrite_query": false, "reranking": {"enabled": true}}
//! ```
//!
//! Answers come wrapped in the usual `{success, errors, result}` envelope and
//! are mapped onto [`ProviderResponse`]. No retries happen here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::AiSearchConfig;
use crate::error::ProviderError;

use super::provider::{ProviderHit, ProviderQuery, ProviderResponse, SearchProvider};

pub struct AiSearchClient {
    http: reqwest::Client,
    base_url: String,
    account_id: Option<String>,
    api_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchBody<'a> {
    query: &'a str,
    max_num_results: u32,
    rewrite_query: bool,
    reranking: Reranking,
}

#[derive(Debug, Serialize)]
struct Reranking {
    enabled: bool,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    #[serde(default)]
    result: Option<SearchResultPage>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct SearchResultPage {
    #[serde(default)]
    data: Option<Vec<Hit>>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(default)]
    file_id: Option<String>,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    score: f64,
    #[serde(default)]
    attributes: Map<String, Value>,
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: String,
}

impl AiSearchClient {
    pub fn new(config: &AiSearchConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("docsite/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            account_id: config.account_id.clone(),
            api_token: config.api_token.clone(),
        })
    }

    fn endpoint(&self, account_id: &str, index: &str) -> String {
        format!(
            "{}/accounts/{}/autorag/rags/{}/search",
            self.base_url, account_id, index
        )
    }
}

#[async_trait]
impl SearchProvider for AiSearchClient {
    async fn search(&self, query: &ProviderQuery) -> Result<ProviderResponse, ProviderError> {
        let account_id = self
            .account_id
            .as_deref()
            .ok_or_else(|| ProviderError::Other("AI_SEARCH_ACCOUNT_ID is not set".to_string()))?;
        let api_token = self
            .api_token
            .as_deref()
            .ok_or_else(|| ProviderError::Other("AI_SEARCH_API_TOKEN is not set".to_string()))?;

        let body = SearchBody {
            query: &query.query,
            max_num_results: query.max_results,
            rewrite_query: false,
            reranking: Reranking {
                enabled: query.rerank,
            },
        };

        let response = self
            .http
            .post(self.endpoint(account_id, &query.index))
            .bearer_auth(api_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<Envelope>(&text)
                .ok()
                .and_then(|env| join_errors(&env.errors))
                .unwrap_or(text);
            return Err(ProviderError::Api(format!(
                "AI Search API error {status}: {detail}"
            )));
        }

        let envelope: Envelope = serde_json::from_str(&text)
            .map_err(|e| ProviderError::Api(format!("undecodable AI Search response: {e}")))?;
        to_provider_response(envelope)
    }
}

fn join_errors(errors: &[ApiMessage]) -> Option<String> {
    if errors.is_empty() {
        return None;
    }
    Some(
        errors
            .iter()
            .map(|e| match e.code {
                Some(code) => format!("{} ({code})", e.message),
                None => e.message.clone(),
            })
            .collect::<Vec<_>>()
            .join("; "),
    )
}

fn to_provider_response(envelope: Envelope) -> Result<ProviderResponse, ProviderError> {
    if !envelope.success {
        let detail = join_errors(&envelope.errors).unwrap_or_else(|| "request unsuccessful".into());
        return Err(ProviderError::Api(detail));
    }

    let results = envelope
        .result
        .and_then(|page| page.data)
        .map(|hits| hits.into_iter().map(to_hit).collect());

    Ok(ProviderResponse { results })
}

fn to_hit(hit: Hit) -> ProviderHit {
    let content = hit
        .content
        .into_iter()
        .filter(|part| part.kind.is_empty() || part.kind == "text")
        .map(|part| part.text)
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut metadata = hit.attributes;
    if let Some(filename) = hit.filename {
        metadata.insert("filename".to_string(), Value::String(filename));
    }

    let mut extra = Map::new();
    if let Some(file_id) = hit.file_id {
        extra.insert("file_id".to_string(), Value::String(file_id));
    }

    ProviderHit {
        content,
        score: hit.score,
        metadata,
        extra,
    }
}
