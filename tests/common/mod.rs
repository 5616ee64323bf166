#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use sports_analysis_be::clients::AnalysisTransport;
use sports_analysis_be::config::AnalysisConfig;
use sports_analysis_be::types::{
    AnalysisResult, FormResult, HeadToHead, MarketOdds, MatchInput, Prediction, RiskLevel,
    TeamStats,
};
use sports_analysis_be::{AppError, Result};

pub enum Step {
    Fail,
    Hang,
    Succeed(AnalysisResult),
}

/// Transport that replays a fixed script and counts every call.
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    calls: AtomicU32,
}

impl ScriptedTransport {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            calls: AtomicU32::new(0),
        }
    }

    pub fn always_failing() -> Self {
        Self::new(Vec::new())
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisTransport for ScriptedTransport {
    async fn request_analysis(&self, _input: &MatchInput) -> Result<AnalysisResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().unwrap().pop_front().unwrap_or(Step::Fail);
        match step {
            Step::Fail => Err(AppError::ExternalApi("Network error".to_string())),
            Step::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Err(AppError::ExternalApi("unreachable".to_string()))
            }
            Step::Succeed(result) => Ok(result),
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

pub fn fast_config() -> AnalysisConfig {
    AnalysisConfig {
        timeout: Duration::from_millis(50),
        retry_backoff: Duration::ZERO,
        ..AnalysisConfig::default()
    }
}

pub fn sample_match() -> MatchInput {
    use FormResult::*;
    MatchInput {
        home_team: "Team A".to_string(),
        away_team: "Team B".to_string(),
        home_form: vec![W, D, L, W, W],
        away_form: vec![L, L, D, W, L],
        head_to_head: vec![
            HeadToHead::Home,
            HeadToHead::Away,
            HeadToHead::Home,
            HeadToHead::Draw,
            HeadToHead::Home,
        ],
        home_stats: TeamStats {
            goals_scored: 10,
            goals_conceded: 5,
            clean_sheets: 3,
            yellow_cards: 5,
            red_cards: 0,
            avg_possession: 55.0,
            shots_per_game: 15.0,
        },
        away_stats: TeamStats {
            goals_scored: 7,
            goals_conceded: 8,
            clean_sheets: 2,
            yellow_cards: 6,
            red_cards: 1,
            avg_possession: 45.0,
            shots_per_game: 10.0,
        },
        odds: Some(MarketOdds {
            home: 1.8,
            draw: 3.2,
            away: 4.5,
        }),
        venue: None,
        importance: None,
    }
}

pub fn remote_result(prediction: Prediction, confidence: f64) -> AnalysisResult {
    AnalysisResult {
        prediction,
        confidence,
        reasoning: "Test reasoning".to_string(),
        strategy: "Bet on home win".to_string(),
        risk_level: RiskLevel::Low,
        expected_score: None,
        key_factors: vec!["Home advantage".to_string()],
        alternative_bets: vec!["both teams to score".to_string()],
        timestamp: Utc::now(),
        analysis_id: "analysis-123".to_string(),
    }
}
