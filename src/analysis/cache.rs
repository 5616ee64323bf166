use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::types::{AnalysisResult, CacheStats, MatchInput};

/// Storage for finished analyses, keyed by [`fingerprint`].
pub trait AnalysisCache: Send + Sync {
    fn get(&self, key: &str) -> Option<AnalysisResult>;
    fn set(&self, key: &str, result: AnalysisResult);
}

/// Cache key built from the teams, both form strings and the head-to-head run.
pub fn fingerprint(input: &MatchInput) -> String {
    json!({
        "home": input.home_team,
        "away": input.away_team,
        "home_form": join_symbols(input.home_form.iter().map(|r| r.symbol())),
        "away_form": join_symbols(input.away_form.iter().map(|r| r.symbol())),
        "h2h": join_symbols(input.head_to_head.iter().map(|r| r.symbol())),
    })
    .to_string()
}

fn join_symbols<'a>(symbols: impl Iterator<Item = &'a str>) -> String {
    symbols.collect::<Vec<_>>().join(",")
}

struct CacheEntry {
    result: AnalysisResult,
    expires_at: Instant,
}

pub struct InMemoryAnalysisCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl InMemoryAnalysisCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Drops every entry and returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut entries = self.lock();
        let removed = entries.len();
        entries.clear();
        removed
    }

    /// Purges expired entries before reporting.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let mut entries = self.lock();
        entries.retain(|_, entry| entry.expires_at > now);
        CacheStats {
            size: entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry>> {
        // Entries are replaced whole, so a poisoned map is still consistent.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AnalysisCache for InMemoryAnalysisCache {
    fn get(&self, key: &str) -> Option<AnalysisResult> {
        let now = Instant::now();
        let mut entries = self.lock();
        let hit = match entries.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.result.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        };
        drop(entries);

        let counter = if hit.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        hit
    }

    fn set(&self, key: &str, result: AnalysisResult) {
        let entry = CacheEntry {
            result,
            expires_at: Instant::now() + self.ttl,
        };
        self.lock().insert(key.to_string(), entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fallback::fallback_analysis;
    use crate::types::{FormResult, HeadToHead, TeamStats};

    fn input(home: &str) -> MatchInput {
        MatchInput {
            home_team: home.to_string(),
            away_team: "Team B".to_string(),
            home_form: vec![FormResult::W, FormResult::D],
            away_form: vec![FormResult::L],
            head_to_head: vec![HeadToHead::Home, HeadToHead::Away],
            home_stats: TeamStats::default(),
            away_stats: TeamStats::default(),
            odds: None,
            venue: None,
            importance: None,
        }
    }

    #[test]
    fn fingerprint_covers_teams_form_and_h2h() {
        let key = fingerprint(&input("Team A"));
        assert!(key.contains("\"home\":\"Team A\""));
        assert!(key.contains("\"home_form\":\"W,D\""));
        assert!(key.contains("\"h2h\":\"H,A\""));
        assert_ne!(key, fingerprint(&input("Team C")));
    }

    #[test]
    fn fingerprint_ignores_stats() {
        let mut other = input("Team A");
        other.home_stats.goals_scored = 40;
        assert_eq!(fingerprint(&input("Team A")), fingerprint(&other));
    }

    #[test]
    fn returns_stored_result_until_expiry() {
        let cache = InMemoryAnalysisCache::new(Duration::from_secs(60));
        let result = fallback_analysis(&input("Team A"));
        cache.set("k", result.clone());

        assert_eq!(cache.get("k"), Some(result));
        assert_eq!(cache.get("missing"), None);

        let stats = cache.stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn expired_entries_are_dropped() {
        let cache = InMemoryAnalysisCache::new(Duration::ZERO);
        cache.set("k", fallback_analysis(&input("Team A")));
        assert_eq!(cache.stats().size, 0);
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn clear_reports_removed_entries() {
        let cache = InMemoryAnalysisCache::new(Duration::from_secs(60));
        cache.set("a", fallback_analysis(&input("Team A")));
        cache.set("b", fallback_analysis(&input("Team C")));
        assert_eq!(cache.clear(), 2);
        assert_eq!(cache.stats().size, 0);
    }
}
