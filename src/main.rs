use sports_analysis_be::analysis::{InMemoryAnalysisCache, MatchAnalyzer};
use sports_analysis_be::api;
use sports_analysis_be::clients::HttpAnalysisClient;
use sports_analysis_be::config::{AnalysisConfig, ServerConfig};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sports_analysis_be=debug,tower_http=info".into()),
        )
        .init();

    let analysis_config = AnalysisConfig::from_env();
    let server_config = ServerConfig::from_env();

    tracing::info!(
        "AI endpoint {} (timeout {:?}, {} attempts, fallback {})",
        analysis_config.api_endpoint,
        analysis_config.timeout,
        analysis_config.max_retries,
        if analysis_config.fallback_enabled { "on" } else { "off" }
    );

    // Initialize clients
    let transport = Arc::new(
        HttpAnalysisClient::new(&analysis_config).map_err(|e| anyhow::anyhow!("{}", e))?,
    );
    let cache = Arc::new(InMemoryAnalysisCache::new(analysis_config.cache_duration));
    let analyzer = MatchAnalyzer::new(analysis_config, transport);

    // Create app state
    let app_state = Arc::new(api::AppState::new(analyzer, cache));

    // Create router with state
    let app = api::create_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let address = server_config.address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Server listening on http://{}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
