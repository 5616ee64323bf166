pub mod analysis_cache;
pub mod analyze_match;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::analysis::{InMemoryAnalysisCache, MatchAnalyzer};

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<MatchAnalyzer>,
    pub cache: Arc<InMemoryAnalysisCache>,
}

impl AppState {
    /// Wires the shared cache into the analyzer so both see the same entries.
    pub fn new(analyzer: MatchAnalyzer, cache: Arc<InMemoryAnalysisCache>) -> Self {
        let analyzer = analyzer.with_cache(cache.clone());
        Self {
            analyzer: Arc::new(analyzer),
            cache,
        }
    }
}

pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/analyze-match", post(analyze_match::handler))
        .route("/api/analysis-cache/stats", get(analysis_cache::stats))
        .route("/api/analysis-cache", delete(analysis_cache::clear))
        .route("/health", get(health_check))
}

async fn health_check() -> &'static str {
    "OK"
}
