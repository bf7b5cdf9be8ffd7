//! Runtime configuration for the scoring collaborator and local storage.
//!
//! Values come from environment variables; anything missing or out of range
//! falls back to the defaults below.

use std::env;

pub const DEFAULT_SCORING_URL: &str = "http://localhost:8080";
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;
const DB_FILE_NAME: &str = "edutrack.sqlite3";

const ENV_SCORING_URL: &str = "EDUTRACK_SCORING_URL";
const ENV_CONNECT_TIMEOUT_MS: &str = "EDUTRACK_SCORING_CONNECT_TIMEOUT_MS";
const ENV_REQUEST_TIMEOUT_MS: &str = "EDUTRACK_SCORING_TIMEOUT_MS";

/// Connection settings for the HTTP scoring service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringConfig {
    /// Scheme, host and port; endpoint paths are appended to it.
    pub base_url: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SCORING_URL.to_string(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl ScoringConfig {
    /// Reads `EDUTRACK_SCORING_URL`, `EDUTRACK_SCORING_CONNECT_TIMEOUT_MS`
    /// and `EDUTRACK_SCORING_TIMEOUT_MS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            base_url: lookup(ENV_SCORING_URL)
                .map(|value| normalize_base_url(&value))
                .filter(|value| value.starts_with("http://") || value.starts_with("https://"))
                .unwrap_or(defaults.base_url),
            connect_timeout_ms: parse_timeout_ms(lookup(ENV_CONNECT_TIMEOUT_MS))
                .unwrap_or(defaults.connect_timeout_ms),
            request_timeout_ms: parse_timeout_ms(lookup(ENV_REQUEST_TIMEOUT_MS))
                .unwrap_or(defaults.request_timeout_ms),
        }
    }
}

/// File name used for the SQLite store inside an app data directory.
pub fn default_db_file_name() -> &'static str {
    DB_FILE_NAME
}

fn normalize_base_url(value: &str) -> String {
    value.trim().trim_end_matches('/').to_string()
}

fn parse_timeout_ms(value: Option<String>) -> Option<u64> {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| (100..=60_000).contains(v))
}
