pub mod api;
pub mod config;
pub mod content;
pub mod error;
pub mod render;
pub mod search;

use std::sync::Arc;

use api::AppState;
use config::Config;
use content::FsContentStore;
use render::Site;
use search::{AiSearchClient, SearchHandler};

/// Wire the production collaborators described by `config` into router state.
pub fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let provider = AiSearchClient::new(&config.ai_search)?;
    let search = SearchHandler::new(Arc::new(provider), config.search.clone());

    let store = FsContentStore::new(&config.content_dir);
    let site = Site::new(
        Arc::new(store),
        config.site_title.clone(),
        config.asset_version.clone(),
    );

    Ok(AppState {
        search: Arc::new(search),
        site: Arc::new(site),
    })
}
