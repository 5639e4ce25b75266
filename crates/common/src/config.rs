//! Application configuration

use std::env;

use tracing::warn;

/// Default GitHub REST endpoint
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Metrics store connection string. AI metrics are disabled when unset.
    pub database_url: Option<String>,
    pub github_api_url: String,
    pub host: String,
    pub port: u16,
    /// Max in-flight review fetches during a dashboard load
    pub review_concurrency: usize,
    /// Window used when a dashboard request names no dates
    pub default_range_days: i64,
    /// Dashboard sessions kept in memory; the least recently loaded is evicted
    pub max_sessions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            review_concurrency: 8,
            default_range_days: 30,
            max_sessions: 1000,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            github_api_url: env::var("GITHUB_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.github_api_url),
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT").unwrap_or(defaults.port),
            review_concurrency: parse_var("REVIEW_CONCURRENCY")
                .map(|n: usize| n.max(1))
                .unwrap_or(defaults.review_concurrency),
            default_range_days: parse_var("DEFAULT_RANGE_DAYS")
                .filter(|d: &i64| *d > 0)
                .unwrap_or(defaults.default_range_days),
            max_sessions: parse_var("MAX_SESSIONS")
                .map(|n: usize| n.max(1))
                .unwrap_or(defaults.max_sessions),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring unparseable {}={:?}", name, raw);
            None
        }
    }
}
