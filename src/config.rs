//! Engine and server configuration. Defaults can be overridden from the environment.

use crate::models::{GroupMethod, RoundOneMethod};
use std::str::FromStr;
use std::time::Duration;

/// Default cap on candidate tries in the Swiss perfect-matching search.
pub const DEFAULT_SWISS_ATTEMPT_CAP: usize = 100_000;

/// Knobs for the pairing engine; copied into each new tournament's settings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EngineConfig {
    pub swiss_attempt_cap: usize,
    pub table_count: u32,
    pub group_count: usize,
    pub group_method: GroupMethod,
    pub round_one_method: RoundOneMethod,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            swiss_attempt_cap: DEFAULT_SWISS_ATTEMPT_CAP,
            table_count: 8,
            group_count: 2,
            group_method: GroupMethod::Snake,
            round_one_method: RoundOneMethod::TopVsBottom,
        }
    }
}

impl EngineConfig {
    /// Read overrides from `SRR_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            swiss_attempt_cap: env_or("SRR_SWISS_ATTEMPT_CAP", defaults.swiss_attempt_cap),
            table_count: env_or("SRR_TABLE_COUNT", defaults.table_count),
            group_count: env_or("SRR_GROUP_COUNT", defaults.group_count),
            group_method: env_or("SRR_GROUP_METHOD", defaults.group_method),
            round_one_method: env_or("SRR_ROUND_ONE_METHOD", defaults.round_one_method),
        }
    }
}

/// Where the web binary listens and how long idle tournaments are kept.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub inactivity_timeout: Duration,
    pub cleanup_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            inactivity_timeout: Duration::from_secs(12 * 3600),
            cleanup_interval: Duration::from_secs(30 * 60),
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT` and `SRR_INACTIVITY_HOURS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let hours: u64 = env_or("SRR_INACTIVITY_HOURS", defaults.inactivity_timeout.as_secs() / 3600);
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: env_or("PORT", defaults.port),
            inactivity_timeout: Duration::from_secs(hours * 3600),
            cleanup_interval: defaults.cleanup_interval,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Ignoring unparsable {}={:?}; using default", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}
