use crate::clients::ai::payload::parse_analysis_payload;
use crate::clients::ai::AnalysisTransport;
use crate::config::AnalysisConfig;
use crate::types::{AnalysisResult, MatchInput};
use crate::{AppError, Result};
use reqwest::Client;
use serde::Serialize;
use url::Url;

const STRATEGY_HINT: &str = "5ones";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisRequest<'a> {
    match_data: &'a MatchInput,
    strategy: &'static str,
    options: RequestOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestOptions {
    include_expected_score: bool,
    include_alternatives: bool,
    risk_assessment: bool,
}

/// Client for the remote AI prediction endpoint.
///
/// Performs exactly one request per call; retries and the per-attempt
/// deadline belong to the caller.
pub struct HttpAnalysisClient {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl HttpAnalysisClient {
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.api_endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl AnalysisTransport for HttpAnalysisClient {
    async fn request_analysis(&self, input: &MatchInput) -> Result<AnalysisResult> {
        let request = AnalysisRequest {
            match_data: input,
            strategy: STRATEGY_HINT,
            options: RequestOptions {
                include_expected_score: true,
                include_alternatives: true,
                risk_assessment: true,
            },
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("X-API-Key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout(format!("AI API request timed out: {}", e))
                } else {
                    AppError::ExternalApi(format!("AI API request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApi(format!(
                "AI API responded with status {}: {}",
                status, error_text
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Failed to read AI response: {}", e)))?;

        parse_analysis_payload(&body)
    }

    fn provider_name(&self) -> &'static str {
        "ai-endpoint"
    }
}
