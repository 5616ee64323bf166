//! Local "5(1's) Strategy" used when the AI service cannot be reached.
//!
//! Confidence is expressed on the home side's scale: 50 is balanced, higher
//! favours the home team, lower favours the away team.

use chrono::Utc;

use crate::types::{
    AnalysisResult, FormResult, HeadToHead, Importance, MatchInput, MarketOdds, Prediction,
    RiskLevel, Venue,
};

pub const FALLBACK_STRATEGY: &str = "Enhanced 5(1's) Strategy - Multi-factor statistical analysis";
pub const OVER_TWO_AND_A_HALF: &str = "Over 2.5 goals";

const BASE_CONFIDENCE: f64 = 50.0;
const MIN_CONFIDENCE: f64 = 10.0;
const MAX_CONFIDENCE: f64 = 90.0;
const RECENT_WINDOW: usize = 5;

struct StrategyScore {
    confidence: f64,
    reasoning: String,
    key_factors: Vec<String>,
}

pub fn fallback_analysis(input: &MatchInput) -> AnalysisResult {
    let score = apply_five_ones_strategy(input);

    let (prediction, risk_level) = if score.confidence > 65.0 {
        let risk = if score.confidence > 75.0 {
            RiskLevel::Low
        } else {
            RiskLevel::Medium
        };
        (Prediction::Home, risk)
    } else if score.confidence < 45.0 {
        let risk = if score.confidence < 35.0 {
            RiskLevel::Low
        } else {
            RiskLevel::Medium
        };
        (Prediction::Away, risk)
    } else {
        (Prediction::Draw, RiskLevel::High)
    };

    let now = Utc::now();
    AnalysisResult {
        prediction,
        confidence: score.confidence,
        reasoning: score.reasoning,
        strategy: FALLBACK_STRATEGY.to_string(),
        risk_level,
        expected_score: Some(expected_score(input)),
        key_factors: score.key_factors,
        alternative_bets: alternative_bets(input, prediction),
        timestamp: now,
        analysis_id: format!("fallback_{}", now.timestamp_millis()),
    }
}

fn apply_five_ones_strategy(input: &MatchInput) -> StrategyScore {
    let mut confidence = BASE_CONFIDENCE;
    let mut key_factors = Vec::new();

    // Recent form
    let home_form = recent_wins(&input.home_form) * 20.0;
    let away_form = recent_wins(&input.away_form) * 20.0;
    confidence += home_form - away_form;
    if home_form > away_form {
        key_factors.push("Home team has better recent form".to_string());
    } else if away_form > home_form {
        key_factors.push("Away team has better recent form".to_string());
    }

    // Goal difference
    let home_gd = input.home_stats.goal_difference();
    let away_gd = input.away_stats.goal_difference();
    if home_gd > away_gd + 5 {
        confidence += 12.0;
        key_factors.push("Home team has significantly better goal difference".to_string());
    } else if home_gd > away_gd {
        confidence += 6.0;
        key_factors.push("Home team has better goal difference".to_string());
    } else if away_gd > home_gd + 5 {
        confidence -= 12.0;
        key_factors.push("Away team has significantly better goal difference".to_string());
    } else if away_gd > home_gd {
        confidence -= 6.0;
        key_factors.push("Away team has better goal difference".to_string());
    }

    // Defence
    let home_defense = per_game(input.home_stats.clean_sheets, input.home_form.len());
    let away_defense = per_game(input.away_stats.clean_sheets, input.away_form.len());
    if home_defense > away_defense + 0.2 {
        confidence += 8.0;
        key_factors.push("Home team has stronger defense".to_string());
    } else if away_defense > home_defense + 0.2 {
        confidence -= 8.0;
        key_factors.push("Away team has stronger defense".to_string());
    }

    // Head to head
    let recent_h2h = &input.head_to_head[..input.head_to_head.len().min(RECENT_WINDOW)];
    let home_h2h = recent_h2h.iter().filter(|r| **r == HeadToHead::Home).count();
    let away_h2h = recent_h2h.iter().filter(|r| **r == HeadToHead::Away).count();
    if home_h2h > away_h2h {
        confidence += 5.0;
        key_factors.push("Home team has better head-to-head record".to_string());
    } else if away_h2h > home_h2h {
        confidence -= 5.0;
        key_factors.push("Away team has better head-to-head record".to_string());
    }

    if input.venue == Some(Venue::Home) {
        confidence += 5.0;
        key_factors.push("Home venue advantage".to_string());
    }

    if input.importance == Some(Importance::High) {
        confidence = confidence * 0.9 + 5.0;
        key_factors.push("High importance match - expect cautious play".to_string());
    }

    if let Some(factor) = input.odds.as_ref().and_then(market_factor) {
        key_factors.push(factor);
    }

    let reasoning = if key_factors.is_empty() {
        "Balanced match with no clear advantage".to_string()
    } else {
        key_factors.join(". ")
    };

    StrategyScore {
        confidence: confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE),
        reasoning,
        key_factors,
    }
}

fn recent_wins(form: &[FormResult]) -> f64 {
    form.iter()
        .take(RECENT_WINDOW)
        .filter(|r| **r == FormResult::W)
        .count() as f64
}

fn per_game(total: u32, games: usize) -> f64 {
    f64::from(total) / games.max(1) as f64
}

/// Names the bookmakers' favourite; odds never move the confidence score.
fn market_factor(odds: &MarketOdds) -> Option<String> {
    let prices = [("home side", odds.home), ("draw", odds.draw), ("away side", odds.away)];
    if prices.iter().any(|(_, p)| !p.is_finite() || *p <= 1.0) {
        return None;
    }
    let (label, price) = prices
        .iter()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .copied()?;
    Some(format!(
        "Market favours the {} ({:.0}% implied)",
        label,
        100.0 / price
    ))
}

fn expected_score(input: &MatchInput) -> String {
    let home_games = input.home_form.len();
    let away_games = input.away_form.len();

    let home_scored = per_game(input.home_stats.goals_scored, home_games);
    let home_conceded = per_game(input.home_stats.goals_conceded, home_games);
    let away_scored = per_game(input.away_stats.goals_scored, away_games);
    let away_conceded = per_game(input.away_stats.goals_conceded, away_games);

    let home = round_half((home_scored + away_conceded) / 2.0);
    let away = round_half((away_scored + home_conceded) / 2.0);
    format!("{:.1} - {:.1}", home, away)
}

fn round_half(value: f64) -> f64 {
    (value * 2.0).round() / 2.0
}

fn alternative_bets(input: &MatchInput, prediction: Prediction) -> Vec<String> {
    let games = (input.home_form.len() + input.away_form.len()).max(2);
    let total_goals_expected =
        (f64::from(input.home_stats.goals_scored) + f64::from(input.away_stats.goals_scored))
            / games as f64;

    let mut bets = vec![OVER_TWO_AND_A_HALF.to_string()];

    if input.home_stats.goals_scored > 0 && input.away_stats.goals_scored > 0 {
        bets.push("Both teams to score".to_string());
    }

    bets.push(
        match prediction {
            Prediction::Home => "Double chance: Home/Draw",
            Prediction::Away => "Double chance: Away/Draw",
            Prediction::Draw => "Double chance: Home/Away",
        }
        .to_string(),
    );

    if total_goals_expected > 3.0 {
        bets.push("Correct score: 2-1, 3-1".to_string());
    } else {
        bets.push("Correct score: 1-0, 1-1, 0-1".to_string());
    }

    bets
}
