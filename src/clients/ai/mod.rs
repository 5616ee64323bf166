pub mod endpoint;
pub mod payload;

pub use endpoint::HttpAnalysisClient;
pub use payload::parse_analysis_payload;

use crate::types::{AnalysisResult, MatchInput};
use crate::Result;
use async_trait::async_trait;

/// One request/response cycle against an AI prediction service.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    async fn request_analysis(&self, input: &MatchInput) -> Result<AnalysisResult>;
    fn provider_name(&self) -> &'static str;
}
