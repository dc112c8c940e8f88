use serde_json::Value;

use crate::error::{MAX_QUERY_CHARS, SearchError};

pub const DEFAULT_LIMIT: u32 = 10;
pub const MIN_LIMIT: u32 = 1;
pub const MAX_LIMIT: u32 = 20;

/// A validated search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub limit: u32,
}

impl SearchRequest {
    /// Parse and validate a raw request body.
    ///
    /// Checks run in order and stop at the first failure: JSON syntax, presence
    /// and type of `query`, then its length. `limit` never fails, it is clamped.
    pub fn parse(body: &[u8]) -> Result<SearchRequest, SearchError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| SearchError::InvalidRequest)?;

        let query = match value.get("query") {
            Some(Value::String(q)) => q.clone(),
            _ => return Err(SearchError::MissingQuery),
        };

        if query.chars().count() > MAX_QUERY_CHARS {
            return Err(SearchError::QueryTooLong);
        }

        let limit = match value.get("limit") {
            Some(Value::Number(n)) => {
                if let Some(v) = n.as_i64() {
                    clamp_limit(v)
                } else if let Some(v) = n.as_f64() {
                    // u64 beyond i64 or fractional; saturating cast.
                    clamp_limit(v.floor() as i64)
                } else {
                    DEFAULT_LIMIT
                }
            }
            _ => DEFAULT_LIMIT,
        };

        Ok(SearchRequest { query, limit })
    }
}

pub fn clamp_limit(v: i64) -> u32 {
    v.clamp(MIN_LIMIT as i64, MAX_LIMIT as i64) as u32
}
