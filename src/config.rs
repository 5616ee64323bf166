use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};
use url::Url;

const DEFAULT_API_ENDPOINT: &str = "http://localhost:3000/api/ai-analysis";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 1_000;
const DEFAULT_CACHE_DURATION_MS: u64 = 30 * 60 * 1000;
const DEFAULT_MIN_CONFIDENCE: f64 = 60.0;

/// Settings for the remote analysis call and its fallback.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub api_endpoint: Url,
    pub api_key: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
    pub fallback_enabled: bool,
    pub cache_duration: Duration,
    pub min_confidence_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_endpoint: default_endpoint(),
            api_key: String::new(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
            fallback_enabled: true,
            cache_duration: Duration::from_millis(DEFAULT_CACHE_DURATION_MS),
            min_confidence_threshold: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

impl AnalysisConfig {
    pub fn from_env() -> Self {
        let api_endpoint = match env::var("AI_API_ENDPOINT") {
            Ok(raw) => Url::parse(raw.trim()).unwrap_or_else(|e| {
                warn!("Invalid AI_API_ENDPOINT {raw:?}: {e}, using default");
                default_endpoint()
            }),
            Err(_) => {
                info!("AI_API_ENDPOINT not set, using default: {DEFAULT_API_ENDPOINT}");
                default_endpoint()
            }
        };

        let api_key = env::var("AI_API_KEY")
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        if api_key.is_empty() {
            warn!("AI_API_KEY not set, remote analysis requests will be unauthenticated");
        }

        Self {
            api_endpoint,
            api_key,
            timeout: Duration::from_millis(try_load("AI_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)),
            max_retries: try_load("AI_MAX_RETRIES", DEFAULT_MAX_RETRIES).clamp(1, 10),
            retry_backoff: Duration::from_millis(try_load(
                "AI_RETRY_BACKOFF_MS",
                DEFAULT_RETRY_BACKOFF_MS,
            )),
            fallback_enabled: env_bool("AI_FALLBACK_ENABLED", true),
            cache_duration: Duration::from_millis(try_load(
                "AI_CACHE_DURATION_MS",
                DEFAULT_CACHE_DURATION_MS,
            )),
            min_confidence_threshold: load_percentage(
                "AI_MIN_CONFIDENCE_THRESHOLD",
                DEFAULT_MIN_CONFIDENCE,
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: try_load("PORT", 3000),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn default_endpoint() -> Url {
    Url::parse(DEFAULT_API_ENDPOINT).expect("default endpoint is a valid URL")
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}

/// Finite value in 0..=100; NaN and infinities fall back to the default.
fn load_percentage(key: &str, default: f64) -> f64 {
    let value: f64 = try_load(key, default);
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        warn!("Non-finite {key} value {value}, using default: {default}");
        default
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => parse_bool(&raw).unwrap_or_else(|| {
            warn!("Invalid {key} value {raw:?}, using default: {default}");
            default
        }),
        Err(_) => default,
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
