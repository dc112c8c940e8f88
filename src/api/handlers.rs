use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::error::RenderError;
use crate::render::Page;

use super::AppState;
use super::models::HealthResponse;

/// `/api/search` for every verb; the pipeline itself answers non-POST with 405.
pub async fn search_handler(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> (StatusCode, Json<serde_json::Value>) {
    let (status, body) = state.search.handle(&method, &body).await;
    (status, Json(body))
}

pub async fn index_handler(State(state): State<AppState>) -> Response {
    let result = state.site.render_index().await;
    page_response(&state, result).await
}

pub async fn article_handler(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let result = state.site.render_article(&slug).await;
    page_response(&state, result).await
}

pub async fn not_found_handler(State(state): State<AppState>) -> Response {
    let page = state.site.render_not_found().await;
    (StatusCode::NOT_FOUND, Html(page.html)).into_response()
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn page_response(state: &AppState, result: Result<Page, RenderError>) -> Response {
    match result {
        Ok(page) => Html(page.html).into_response(),
        Err(e) => {
            let status = e.status();
            if status == StatusCode::NOT_FOUND {
                log::debug!("{e}");
                let page = state.site.render_not_found().await;
                (status, Html(page.html)).into_response()
            } else {
                log::error!("error rendering page: {:#}", e);
                (status, Html("<h1>Internal error</h1>".to_string())).into_response()
            }
        }
    }
}
