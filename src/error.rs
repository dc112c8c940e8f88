use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;

use crate::config::AI_SEARCH_NAME;

pub const MAX_QUERY_CHARS: usize = 500;

/// Every way `/api/search` can fail. Each variant maps to one status code and
/// one machine-oriented `error` string on the wire.
#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    #[error("Invalid request")]
    InvalidRequest,
    #[error("Query parameter is required")]
    MissingQuery,
    #[error("Query too long")]
    QueryTooLong,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("AI Search not configured")]
    NotConfigured,
    #[error("Search failed: {0}")]
    ProviderFailed(String),
    #[error("Invalid search response")]
    InvalidResponse,
}

/// Wire shape of every error body.
#[derive(Debug, Serialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SearchError {
    pub fn status(&self) -> StatusCode {
        match self {
            SearchError::InvalidRequest
            | SearchError::MissingQuery
            | SearchError::QueryTooLong => StatusCode::BAD_REQUEST,
            SearchError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            SearchError::NotConfigured
            | SearchError::ProviderFailed(_)
            | SearchError::InvalidResponse => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Caller mistakes, as opposed to deployment or provider trouble.
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }

    pub fn to_response(&self) -> ErrorResponse {
        let (error, message) = match self {
            SearchError::InvalidRequest => ("Invalid request", None),
            SearchError::MissingQuery => ("Query parameter is required", None),
            SearchError::QueryTooLong => (
                "Query too long",
                Some(format!("Query must be less than {MAX_QUERY_CHARS} characters")),
            ),
            SearchError::MethodNotAllowed => (
                "Method not allowed",
                Some("Use POST method for search".to_string()),
            ),
            SearchError::NotConfigured => (
                "AI Search not configured",
                Some(format!(
                    "{AI_SEARCH_NAME} environment variable is not set. \
                     Set it to the name of the AI Search index and redeploy."
                )),
            ),
            SearchError::ProviderFailed(msg) => {
                let msg = if msg.trim().is_empty() {
                    "Unknown error".to_string()
                } else {
                    msg.clone()
                };
                ("Search failed", Some(msg))
            }
            SearchError::InvalidResponse => (
                "Invalid search response",
                Some(
                    "Search returned no results collection. \
                     Check if the index exists and has data."
                        .to_string(),
                ),
            ),
        };
        ErrorResponse {
            error: error.to_string(),
            message,
        }
    }
}

/// Failure reported by a search provider. Only the message crosses the HTTP boundary.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Api(String),
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invalid content key: {0}")]
    InvalidKey(String),
    #[error("io error reading {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("page not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Content(#[from] ContentError),
}

impl RenderError {
    pub fn status(&self) -> StatusCode {
        match self {
            RenderError::NotFound(_) | RenderError::Content(ContentError::InvalidKey(_)) => {
                StatusCode::NOT_FOUND
            }
            RenderError::Content(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
