use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

use crate::types::{AnalysisResult, Prediction, RiskLevel};
use crate::{AppError, Result};

/// Result object as returned by the prediction endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteAnalysis {
    prediction: Prediction,
    confidence: f64,
    reasoning: String,
    strategy: String,
    risk_level: RiskLevel,
    alternative_bets: Vec<String>,
    #[serde(default)]
    expected_score: Option<String>,
    #[serde(default)]
    key_factors: Vec<String>,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    analysis_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatEnvelope {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

fn code_fence() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(\{.*\})\s*```").expect("fence pattern compiles")
    })
}

/// Parse a response body into an [`AnalysisResult`].
///
/// Accepts either the result object itself or a chat-completion envelope
/// whose first message carries the result as JSON text, optionally inside a
/// markdown code fence. Any shape or range problem is an `ExternalApi` error.
pub fn parse_analysis_payload(body: &str) -> Result<AnalysisResult> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| AppError::ExternalApi(format!("Failed to parse AI response: {}", e)))?;

    let remote: RemoteAnalysis = if value.get("choices").is_some() {
        let envelope: ChatEnvelope = serde_json::from_value(value)
            .map_err(|e| AppError::ExternalApi(format!("Failed to parse AI envelope: {}", e)))?;
        let content = envelope
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AppError::ExternalApi("No content in AI response".to_string()))?;
        let json = code_fence()
            .captures(&content)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .unwrap_or(content.trim());
        serde_json::from_str(json).map_err(|e| {
            AppError::ExternalApi(format!("Failed to parse AI analysis JSON: {}", e))
        })?
    } else {
        serde_json::from_value(value).map_err(|e| {
            AppError::ExternalApi(format!("Invalid API response format: {}", e))
        })?
    };

    if !remote.confidence.is_finite() || !(0.0..=100.0).contains(&remote.confidence) {
        return Err(AppError::ExternalApi(format!(
            "Confidence {} outside 0-100",
            remote.confidence
        )));
    }

    let now = Utc::now();
    Ok(AnalysisResult {
        prediction: remote.prediction,
        confidence: remote.confidence,
        reasoning: remote.reasoning,
        strategy: remote.strategy,
        risk_level: remote.risk_level,
        expected_score: remote.expected_score,
        key_factors: remote.key_factors,
        alternative_bets: remote.alternative_bets,
        timestamp: remote.timestamp.unwrap_or(now),
        analysis_id: remote
            .analysis_id
            .unwrap_or_else(|| format!("ai_{}", now.timestamp_millis())),
    })
}
