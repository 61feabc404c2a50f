//! Process settings, read from the environment exactly once at startup.
//!
//! Unparseable values fall back to their defaults rather than aborting;
//! the demo should come up with an empty environment.

use std::env;
use std::time::Duration;

use nkv_client::ConnectionConfig;

/// Minutes of expiry applied when `REDIS_EXPIRY` is unset.
const DEFAULT_EXPIRY_MINUTES: u64 = 30;

/// Everything the process needs to construct its KV client.
#[derive(Debug, Clone)]
pub struct Settings {
    pub connection: ConnectionConfig,
    /// Key-prefix for this service instance.
    pub namespace: String,
    /// Default entry expiry, in seconds.
    pub default_ttl_seconds: u64,
}

impl Settings {
    /// Snapshots the environment into an explicit settings value.
    ///
    /// Recognized variables: `REDIS_HOST`, `REDIS_PORT`, `REDIS_PASS`,
    /// `REDIS_DB`, `REDIS_MAX_RETRIES`, `REDIS_RETRY_TIMEOUT` (ms),
    /// `REDIS_EXPIRY` (minutes), `KV_NAMESPACE`.
    pub fn from_env() -> Self {
        let defaults = ConnectionConfig::default();
        let connection = ConnectionConfig {
            host: env::var("REDIS_HOST").unwrap_or(defaults.host),
            port: parse_var("REDIS_PORT").unwrap_or(defaults.port),
            password: env::var("REDIS_PASS").ok(),
            database: parse_var("REDIS_DB"),
            max_retries: parse_var("REDIS_MAX_RETRIES").unwrap_or(defaults.max_retries),
            retry_timeout: parse_var("REDIS_RETRY_TIMEOUT")
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_timeout),
        };

        Settings {
            connection,
            namespace: env::var("KV_NAMESPACE").unwrap_or_else(|_| "graphql_api".to_string()),
            default_ttl_seconds: expiry_seconds(parse_var("REDIS_EXPIRY")),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.parse().ok())
}

/// Expiry is configured in minutes and applied in seconds.
fn expiry_seconds(minutes: Option<u64>) -> u64 {
    minutes.unwrap_or(DEFAULT_EXPIRY_MINUTES) * 60
}
