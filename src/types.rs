use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AppError, Result};

pub const MISSING_TEAMS_MESSAGE: &str = "Invalid match data: missing team information";

// Match Input Types

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInput {
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub home_form: Vec<FormResult>,
    #[serde(default)]
    pub away_form: Vec<FormResult>,
    #[serde(default)]
    pub head_to_head: Vec<HeadToHead>,
    #[serde(default)]
    pub home_stats: TeamStats,
    #[serde(default)]
    pub away_stats: TeamStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odds: Option<MarketOdds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<Venue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<Importance>,
}

impl MatchInput {
    /// Both team names must be present; whitespace-only names count as missing.
    pub fn validate(&self) -> Result<()> {
        if self.home_team.trim().is_empty() || self.away_team.trim().is_empty() {
            return Err(AppError::Validation(MISSING_TEAMS_MESSAGE.to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormResult {
    W,
    D,
    L,
}

impl FormResult {
    pub fn symbol(self) -> &'static str {
        match self {
            FormResult::W => "W",
            FormResult::D => "D",
            FormResult::L => "L",
        }
    }
}

/// Head-to-head outcome from the home side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadToHead {
    #[serde(rename = "H")]
    Home,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "A")]
    Away,
}

impl HeadToHead {
    pub fn symbol(self) -> &'static str {
        match self {
            HeadToHead::Home => "H",
            HeadToHead::Draw => "D",
            HeadToHead::Away => "A",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    #[serde(default)]
    pub goals_scored: u32,
    #[serde(default)]
    pub goals_conceded: u32,
    #[serde(default)]
    pub clean_sheets: u32,
    #[serde(default)]
    pub yellow_cards: u32,
    #[serde(default)]
    pub red_cards: u32,
    #[serde(default)]
    pub avg_possession: f64,
    #[serde(default)]
    pub shots_per_game: f64,
}

impl TeamStats {
    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_scored) - i64::from(self.goals_conceded)
    }
}

/// Decimal bookmaker prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOdds {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    Home,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    Medium,
    High,
}

// Analysis Result Types

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prediction {
    Home,
    Draw,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Confidence is on a 0-100 scale for both remote and fallback results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub prediction: Prediction,
    pub confidence: f64,
    pub reasoning: String,
    pub strategy: String,
    pub risk_level: RiskLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_score: Option<String>,
    pub key_factors: Vec<String>,
    pub alternative_bets: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub analysis_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    Remote,
    Fallback,
    Cache,
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub result: AnalysisResult,
    pub source: AnalysisSource,
    pub attempts: u32,
}

// API Request/Response Types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeMatchRequest {
    pub match_data: MatchInput,
    #[serde(default = "default_use_cache")]
    pub use_cache: bool,
}

fn default_use_cache() -> bool {
    true
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeMatchResponse {
    pub analysis: AnalysisResult,
    pub source: AnalysisSource,
    pub meets_confidence_threshold: bool,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Serialize)]
pub struct CacheClearedResponse {
    pub cleared: usize,
}

// Common Types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub timestamp: String,
    pub execution_time_ms: u64,
    pub model_used: Option<String>,
    pub retries: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "homeTeam": "Team A",
            "awayTeam": "Team B",
            "homeForm": ["W", "D", "L", "W", "W"],
            "awayForm": ["L", "L", "D", "W", "L"],
            "headToHead": ["H", "A", "H", "D", "H"],
            "homeStats": { "goalsScored": 10, "goalsConceded": 5, "cleanSheets": 3, "yellowCards": 5, "redCards": 0 },
            "awayStats": { "goalsScored": 7, "goalsConceded": 8, "cleanSheets": 2, "yellowCards": 6, "redCards": 1 },
            "odds": { "home": 1.8, "draw": 3.2, "away": 4.5 }
        })
    }

    #[test]
    fn parses_camel_case_match_input() {
        let input: MatchInput = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(input.home_team, "Team A");
        assert_eq!(input.home_form.len(), 5);
        assert_eq!(input.head_to_head[1], HeadToHead::Away);
        assert_eq!(input.away_stats.red_cards, 1);
        assert_eq!(input.home_stats.avg_possession, 0.0);
        assert_eq!(input.odds.as_ref().map(|o| o.draw), Some(3.2));
        assert!(input.venue.is_none());
    }

    #[test]
    fn rejects_unknown_form_symbols() {
        let mut value = sample_json();
        value["homeForm"] = serde_json::json!(["X"]);
        assert!(serde_json::from_value::<MatchInput>(value).is_err());
    }

    #[test]
    fn validate_requires_both_team_names() {
        let mut input: MatchInput = serde_json::from_value(sample_json()).unwrap();
        assert!(input.validate().is_ok());

        input.home_team = String::new();
        match input.validate() {
            Err(AppError::Validation(msg)) => assert_eq!(msg, MISSING_TEAMS_MESSAGE),
            other => panic!("expected validation error, got {:?}", other),
        }

        input.home_team = "Team A".to_string();
        input.away_team = "   ".to_string();
        assert!(matches!(input.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn goal_difference_can_be_negative() {
        let stats = TeamStats {
            goals_scored: 7,
            goals_conceded: 8,
            ..Default::default()
        };
        assert_eq!(stats.goal_difference(), -1);
    }

    #[test]
    fn analysis_result_uses_camel_case_wire_names() {
        let result = AnalysisResult {
            prediction: Prediction::Home,
            confidence: 72.0,
            reasoning: "Home team has better recent form".to_string(),
            strategy: "AI".to_string(),
            risk_level: RiskLevel::Medium,
            expected_score: None,
            key_factors: vec![],
            alternative_bets: vec!["Over 2.5 goals".to_string()],
            timestamp: Utc::now(),
            analysis_id: "ai_1".to_string(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["prediction"], "home");
        assert_eq!(value["riskLevel"], "medium");
        assert_eq!(value["alternativeBets"][0], "Over 2.5 goals");
        assert!(value.get("expectedScore").is_none());
    }
}
