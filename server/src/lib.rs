use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::HeaderValue, routing::get, Json, Router};
use search_core::persist::{load_index, IndexPaths};
use search_core::{DocId, InvertedIndex, QueryEngine};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
    /// Hits beyond the displayed ones.
    pub remaining: usize,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub name: String,
}

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<InvertedIndex>,
}

/// Load the index once and serve it read-only to every request.
pub fn build_app(index_path: &std::path::Path) -> Result<Router> {
    let index = load_index(&IndexPaths::new(index_path))?;
    Ok(router(Arc::new(index)))
}

pub fn router(index: Arc<InvertedIndex>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(AppState { index })
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// Origins from `CORS_ALLOW_ORIGIN` (comma-separated); any origin when unset
/// or when nothing in it parses.
fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = std::env::var("CORS_ALLOW_ORIGIN")
        .map(|val| val.split(',').filter_map(|s| s.trim().parse().ok()).collect())
        .unwrap_or_default();
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let engine = QueryEngine::new(&state.index);
    let hits = engine.search(&params.q);
    let results = hits
        .doc_ids
        .iter()
        .zip(hits.displayed_names(&state.index))
        .map(|(&doc_id, name)| SearchHit { doc_id, name })
        .collect();
    Json(SearchResponse {
        query: params.q,
        took_s: start.elapsed().as_secs_f64(),
        total_hits: hits.len(),
        results,
        remaining: hits.remaining(),
    })
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<DocId>) -> Json<serde_json::Value> {
    match state.index.doc_name(doc_id) {
        Some(name) => Json(serde_json::json!({ "doc_id": doc_id, "name": name })),
        None => Json(serde_json::json!({ "error": "not found" })),
    }
}
