//! Service-level settings read from the environment (`.env` supported via dotenvy).

use std::path::PathBuf;
use std::time::Duration;

pub const ENV_ANALYZE_DELAY_MS: &str = "ANALYZE_DELAY_MS";
pub const ENV_HISTORY_DIR: &str = "HISTORY_DIR";
pub const ENV_METRICS_ENABLED: &str = "METRICS_ENABLED";

/// Simulated processing time the UI has always shown.
pub const DEFAULT_ANALYZE_DELAY_MS: u64 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Pause between accepting an analysis and running it. Pure UX; zero in tests.
    pub analyze_delay: Duration,
    /// Directory for the file-backed history store; `None` keeps history in memory.
    pub history_dir: Option<PathBuf>,
    pub metrics_enabled: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            analyze_delay: Duration::from_millis(DEFAULT_ANALYZE_DELAY_MS),
            history_dir: None,
            metrics_enabled: false,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        let delay_ms = parse_delay_env(std::env::var(ENV_ANALYZE_DELAY_MS).ok())
            .unwrap_or(DEFAULT_ANALYZE_DELAY_MS);
        let history_dir = std::env::var(ENV_HISTORY_DIR)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        let metrics_enabled = std::env::var(ENV_METRICS_ENABLED)
            .ok()
            .is_some_and(|v| matches!(v.trim(), "1" | "true" | "yes"));

        Self {
            analyze_delay: Duration::from_millis(delay_ms),
            history_dir,
            metrics_enabled,
        }
    }
}

// Capped at 10s.
fn parse_delay_env(raw: Option<String>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .map(|v| v.min(10_000))
}
