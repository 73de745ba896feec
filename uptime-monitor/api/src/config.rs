//! Configuration management for the uptime monitor

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::services::status::StatusPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to
    pub host: String,

    /// Port the HTTP server listens on
    pub port: u16,

    /// Time between scheduled probes of every monitor
    pub ping_interval: Duration,

    /// Upper bound on a single probe
    pub probe_timeout: Duration,

    /// Consecutive failures tolerated before a monitor is DOWN
    pub max_retries: u32,

    /// Latency samples kept per monitor
    pub latency_history_limit: usize,

    /// Successful probes slower than this are DEGRADED
    pub degraded_threshold_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            ping_interval: Duration::from_secs(120),
            probe_timeout: Duration::from_millis(5000),
            max_retries: 2,
            latency_history_limit: 20,
            degraded_threshold_ms: 1000,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }

        if let Ok(port) = env::var("PORT") {
            if let Ok(port) = port.parse() {
                config.port = port;
            }
        }

        if let Ok(interval) = env::var("PING_INTERVAL_SECONDS") {
            if let Ok(seconds) = interval.parse::<u64>() {
                config.ping_interval = Duration::from_secs(seconds);
            }
        }

        if let Ok(timeout) = env::var("PROBE_TIMEOUT_MS") {
            if let Ok(ms) = timeout.parse::<u64>() {
                config.probe_timeout = Duration::from_millis(ms);
            }
        }

        if let Ok(max_retries) = env::var("MAX_RETRIES") {
            if let Ok(retries) = max_retries.parse() {
                config.max_retries = retries;
            }
        }

        if let Ok(limit) = env::var("LATENCY_HISTORY_LIMIT") {
            if let Ok(limit) = limit.parse() {
                config.latency_history_limit = limit;
            }
        }

        if let Ok(threshold) = env::var("DEGRADED_THRESHOLD_MS") {
            if let Ok(ms) = threshold.parse() {
                config.degraded_threshold_ms = ms;
            }
        }

        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("host cannot be empty".to_string());
        }

        if self.ping_interval.is_zero() {
            return Err("ping_interval must be greater than 0".to_string());
        }

        if self.probe_timeout.is_zero() {
            return Err("probe_timeout must be greater than 0".to_string());
        }

        if self.latency_history_limit == 0 {
            return Err("latency_history_limit must be greater than 0".to_string());
        }

        Ok(())
    }

    pub fn status_policy(&self) -> StatusPolicy {
        StatusPolicy {
            max_retries: self.max_retries,
            degraded_threshold_ms: self.degraded_threshold_ms,
        }
    }

    /// Human-readable ping interval, e.g. "2 minutes" or "30 seconds"
    pub fn ping_interval_label(&self) -> String {
        let seconds = self.ping_interval.as_secs();

        match seconds {
            60 => "1 minute".to_string(),
            s if s > 0 && s % 60 == 0 => format!("{} minutes", s / 60),
            1 => "1 second".to_string(),
            s => format!("{} seconds", s),
        }
    }
}
