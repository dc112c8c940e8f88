use axum::{
    Router,
    routing::{any, get},
};
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::render::Site;
use crate::search::SearchHandler;

pub mod handlers;
pub mod models;

#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchHandler>,
    pub site: Arc<Site>,
}

pub fn create_router(state: AppState, assets_dir: impl AsRef<Path>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // API routes
        .route("/api/search", any(handlers::search_handler))
        .route("/health", get(handlers::health_handler))
        // Pages
        .route("/", get(handlers::index_handler))
        .route("/docs/*slug", get(handlers::article_handler))
        // Assets bucket for the search widget and styles
        .nest_service("/assets", ServeDir::new(assets_dir.as_ref()))
        .fallback(handlers::not_found_handler)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
