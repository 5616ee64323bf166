use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::AppState;
use crate::types::{CacheClearedResponse, CacheStats};

pub async fn stats(State(state): State<Arc<AppState>>) -> Json<CacheStats> {
    Json(state.cache.stats())
}

pub async fn clear(State(state): State<Arc<AppState>>) -> Json<CacheClearedResponse> {
    let cleared = state.cache.clear();
    tracing::info!("Cleared {} cached analyses", cleared);
    Json(CacheClearedResponse { cleared })
}
