use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

use crate::api::AppState;
use crate::types::{AnalysisSource, AnalyzeMatchRequest, AnalyzeMatchResponse, ResponseMetadata};
use crate::Result;

pub async fn handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeMatchRequest>,
) -> Result<Json<AnalyzeMatchResponse>> {
    let start = Instant::now();
    let match_data = request.match_data;

    tracing::info!(
        "Analyzing {} vs {} (cache: {})",
        match_data.home_team,
        match_data.away_team,
        request.use_cache
    );

    let report = state
        .analyzer
        .analyze_with_report(&match_data, request.use_cache)
        .await
        .map_err(|e| {
            tracing::error!("Match analysis failed: {}", e);
            e
        })?;

    let meets_confidence_threshold = state.analyzer.meets_threshold(&report.result);
    if !meets_confidence_threshold {
        tracing::debug!(
            "Confidence {:.1} below threshold {:.1}",
            report.result.confidence,
            state.analyzer.config().min_confidence_threshold
        );
    }

    let model_used = match report.source {
        AnalysisSource::Remote => state.analyzer.provider_name(),
        AnalysisSource::Fallback => "fallback",
        AnalysisSource::Cache => "cache",
    };

    let execution_time = start.elapsed().as_millis() as u64;

    Ok(Json(AnalyzeMatchResponse {
        meets_confidence_threshold,
        source: report.source,
        analysis: report.result,
        metadata: ResponseMetadata {
            timestamp: Utc::now().to_rfc3339(),
            execution_time_ms: execution_time,
            model_used: Some(model_used.to_string()),
            retries: report.attempts.saturating_sub(1),
        },
    }))
}
