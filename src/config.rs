use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Environment key naming the AI Search index queried by `/api/search`.
pub const AI_SEARCH_NAME: &str = "AI_SEARCH_NAME";

pub const DEFAULT_AI_SEARCH_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Settings consumed by the search pipeline.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Index to query. `None` means search is not configured for this deployment.
    pub index_name: Option<String>,
    pub timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index_name: None,
            timeout: Duration::from_secs(5),
        }
    }
}

/// Credentials and endpoint of the managed AI Search service.
#[derive(Debug, Clone)]
pub struct AiSearchConfig {
    pub base_url: String,
    pub account_id: Option<String>,
    pub api_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub search: SearchConfig,
    pub ai_search: AiSearchConfig,
    pub content_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub bind_addr: String,
    pub site_title: String,
    pub asset_version: Option<String>,
}

impl Config {
    /// Build the configuration from the process environment, loading `.env` first if present.
    ///
    /// Missing search credentials are not an error here: the server still starts and
    /// `/api/search` reports the misconfiguration per request.
    pub fn from_env() -> Config {
        dotenv().ok();

        let timeout_secs = get_env_opt("SEARCH_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(5);

        Config {
            search: SearchConfig {
                index_name: get_env_opt(AI_SEARCH_NAME),
                timeout: Duration::from_secs(timeout_secs),
            },
            ai_search: AiSearchConfig {
                base_url: get_env_or_default("AI_SEARCH_BASE_URL", DEFAULT_AI_SEARCH_BASE_URL),
                account_id: get_env_opt("AI_SEARCH_ACCOUNT_ID"),
                api_token: get_env_opt("AI_SEARCH_API_TOKEN"),
            },
            content_dir: get_env_or_default("CONTENT_DIR", "content").into(),
            assets_dir: get_env_or_default("ASSETS_DIR", "static").into(),
            bind_addr: get_env_or_default("BIND_ADDR", "0.0.0.0:8080"),
            site_title: get_env_or_default("SITE_TITLE", "Documentation"),
            asset_version: get_env_opt("ASSET_VERSION"),
        }
    }
}

/// Blank values count as unset.
fn get_env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    get_env_opt(key).unwrap_or_else(|| default.to_string())
}
