pub mod ai_search;
pub mod handler;
pub mod provider;
pub mod request;

pub use ai_search::AiSearchClient;
pub use handler::SearchHandler;
pub use provider::{ProviderHit, ProviderQuery, ProviderResponse, SearchProvider};
pub use request::SearchRequest;
