pub mod cache;
pub mod fallback;

pub use cache::{fingerprint, AnalysisCache, InMemoryAnalysisCache};
pub use fallback::{fallback_analysis, FALLBACK_STRATEGY};

use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::AnalysisTransport;
use crate::config::AnalysisConfig;
use crate::types::{AnalysisReport, AnalysisResult, AnalysisSource, MatchInput};
use crate::{AppError, Result};

/// Per-call retry bookkeeping. Never shared between calls.
#[derive(Debug)]
enum RetryState {
    Retrying {
        attempt: u32,
        last_error: Option<AppError>,
    },
    Fallback {
        attempts: u32,
        last_error: Option<AppError>,
    },
}

/// Produces an [`AnalysisResult`] for a fixture, preferring the remote AI
/// service and degrading to the local strategy once retries run out.
pub struct MatchAnalyzer {
    config: AnalysisConfig,
    transport: Arc<dyn AnalysisTransport>,
    cache: Option<Arc<dyn AnalysisCache>>,
}

impl MatchAnalyzer {
    pub fn new(config: AnalysisConfig, transport: Arc<dyn AnalysisTransport>) -> Self {
        Self {
            config,
            transport,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn AnalysisCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn provider_name(&self) -> &'static str {
        self.transport.provider_name()
    }

    pub async fn analyze(&self, input: &MatchInput, use_cache: bool) -> Result<AnalysisResult> {
        self.analyze_with_report(input, use_cache)
            .await
            .map(|report| report.result)
    }

    pub async fn analyze_with_report(
        &self,
        input: &MatchInput,
        use_cache: bool,
    ) -> Result<AnalysisReport> {
        input.validate()?;

        let key = fingerprint(input);
        if use_cache {
            if let Some(result) = self.cache.as_ref().and_then(|c| c.get(&key)) {
                info!("Returning cached analysis for {} vs {}", input.home_team, input.away_team);
                return Ok(AnalysisReport {
                    result,
                    source: AnalysisSource::Cache,
                    attempts: 0,
                });
            }
        }

        let max_retries = self.config.max_retries;
        let mut state = RetryState::Retrying {
            attempt: 0,
            last_error: None,
        };

        loop {
            state = match state {
                RetryState::Retrying {
                    attempt,
                    last_error,
                } if attempt >= max_retries => RetryState::Fallback {
                    attempts: attempt,
                    last_error,
                },
                RetryState::Retrying { attempt, .. } => {
                    let attempt = attempt + 1;
                    info!("AI analysis attempt {}/{}", attempt, max_retries);

                    match self.attempt(input).await {
                        Ok(result) => {
                            if attempt > 1 {
                                info!("AI analysis succeeded on attempt {}", attempt);
                            }
                            self.store(&key, &result);
                            return Ok(AnalysisReport {
                                result,
                                source: AnalysisSource::Remote,
                                attempts: attempt,
                            });
                        }
                        Err(e) => {
                            warn!("Attempt {} failed: {}", attempt, e);
                            if attempt < max_retries {
                                let delay = self.config.retry_backoff * attempt;
                                if !delay.is_zero() {
                                    tokio::time::sleep(delay).await;
                                }
                            }
                            RetryState::Retrying {
                                attempt,
                                last_error: Some(e),
                            }
                        }
                    }
                }
                RetryState::Fallback {
                    attempts,
                    last_error,
                } => {
                    if !self.config.fallback_enabled {
                        return Err(last_error.unwrap_or_else(|| {
                            AppError::ExternalApi(
                                "AI analysis failed after all retries".to_string(),
                            )
                        }));
                    }

                    info!("Falling back to local analysis strategy");
                    let result = fallback_analysis(input);
                    self.store(&key, &result);
                    return Ok(AnalysisReport {
                        result,
                        source: AnalysisSource::Fallback,
                        attempts,
                    });
                }
            };
        }
    }

    async fn attempt(&self, input: &MatchInput) -> Result<AnalysisResult> {
        let timeout = self.config.timeout;
        match tokio::time::timeout(timeout, self.transport.request_analysis(input)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(AppError::Timeout(format!(
                "AI API did not respond within {}ms",
                timeout.as_millis()
            ))),
        }
    }

    fn store(&self, key: &str, result: &AnalysisResult) {
        if let Some(cache) = &self.cache {
            cache.set(key, result.clone());
        }
    }

    /// Whether a result clears the configured confidence bar.
    pub fn meets_threshold(&self, result: &AnalysisResult) -> bool {
        result.confidence >= self.config.min_confidence_threshold
    }
}
