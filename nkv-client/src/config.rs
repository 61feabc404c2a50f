//! # Connection Configuration
//!
//! Purpose: Describe one remote KV endpoint and the retry policy applied
//! when connecting to it. Built once per client and immutable afterwards.

use std::time::Duration;

/// Base delay multiplied by the attempt count to produce the backoff.
const RETRY_STEP: Duration = Duration::from_millis(50);

/// Outcome of reviewing a failed connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait this long, then attempt to connect again.
    Delay(Duration),
    /// The retry ceiling is reached; stop retrying and fail permanently.
    Abort,
}

/// Configuration for a single connection to the remote store.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Remote store network address.
    pub host: String,
    /// Remote store network port.
    pub port: u16,
    /// Credential for authenticating the connection, if required.
    pub password: Option<String>,
    /// Logical database selector. Skipped by transports that do not
    /// support selection (e.g. test doubles).
    pub database: Option<u32>,
    /// Retry ceiling before the connection fails permanently.
    pub max_retries: u32,
    /// Upper bound on the computed backoff delay.
    pub retry_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig {
            host: "redis".to_string(),
            port: 6379,
            password: None,
            database: None,
            max_retries: 5,
            retry_timeout: Duration::from_millis(2000),
        }
    }
}

impl ConnectionConfig {
    /// Address string in `host:port` form.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reviews a failed connection attempt.
    ///
    /// Pure function of the attempt count: returns `Abort` once `attempt`
    /// reaches the retry ceiling, otherwise a delay of `attempt * 50ms`
    /// capped at `retry_timeout`. The schedule is monotonically
    /// non-decreasing. Attempts count up one at a time, so the first
    /// abort happens exactly at `attempt == max_retries`.
    pub fn retry_delay(&self, attempt: u32) -> RetryDecision {
        if attempt >= self.max_retries {
            return RetryDecision::Abort;
        }
        let delay = RETRY_STEP.saturating_mul(attempt);
        RetryDecision::Delay(delay.min(self.retry_timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ConnectionConfig::default();
        assert_eq!(config.host, "redis");
        assert_eq!(config.port, 6379);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_timeout, Duration::from_millis(2000));
        assert!(config.password.is_none());
        assert!(config.database.is_none());
    }

    #[test]
    fn delay_schedule_is_monotone_and_capped() {
        let config = ConnectionConfig {
            max_retries: 100,
            retry_timeout: Duration::from_millis(200),
            ..ConnectionConfig::default()
        };

        let mut previous = Duration::ZERO;
        for attempt in 1..100 {
            match config.retry_delay(attempt) {
                RetryDecision::Delay(delay) => {
                    assert!(delay >= previous);
                    assert!(delay <= config.retry_timeout);
                    previous = delay;
                }
                RetryDecision::Abort => panic!("aborted below the ceiling"),
            }
        }
    }

    #[test]
    fn aborts_exactly_at_the_ceiling() {
        let config = ConnectionConfig {
            max_retries: 5,
            ..ConnectionConfig::default()
        };

        assert_eq!(
            config.retry_delay(1),
            RetryDecision::Delay(Duration::from_millis(50))
        );
        assert_eq!(
            config.retry_delay(4),
            RetryDecision::Delay(Duration::from_millis(200))
        );
        assert_eq!(config.retry_delay(5), RetryDecision::Abort);
    }

    #[test]
    fn zero_ceiling_aborts_immediately() {
        let config = ConnectionConfig {
            max_retries: 0,
            ..ConnectionConfig::default()
        };
        assert_eq!(config.retry_delay(0), RetryDecision::Abort);
    }
}
