//! Status engine: folds probe outcomes into a monitor's counters and classification

use chrono::{DateTime, Utc};

use crate::models::monitor::MonitorStatus;
use crate::services::history::LatencyHistory;
use crate::services::monitoring::ProbeOutcome;

/// Thresholds the engine classifies against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPolicy {
    /// Consecutive failures tolerated before a monitor is DOWN.
    /// DOWN requires `retry_count > max_retries`.
    pub max_retries: u32,

    /// Successful probes slower than this are DEGRADED
    pub degraded_threshold_ms: u64,
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            degraded_threshold_ms: 1000,
        }
    }
}

/// Mutable probe-derived state of one monitor
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorState {
    pub status: MonitorStatus,
    pub last_ping_at: Option<DateTime<Utc>>,
    pub total_pings: u64,
    pub failed_pings: u64,
    pub retry_count: u32,
    pub latency_history: LatencyHistory,
}

impl MonitorState {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            status: MonitorStatus::Pending,
            last_ping_at: None,
            total_pings: 0,
            failed_pings: 0,
            retry_count: 0,
            latency_history: LatencyHistory::new(history_capacity),
        }
    }

    /// Share of successful probes, as a percentage with two decimals
    pub fn uptime(&self) -> String {
        format_uptime(self.total_pings, self.failed_pings)
    }
}

/// `(total - failed) / total * 100` rendered with two decimals; "100.00" before any probe
pub fn format_uptime(total_pings: u64, failed_pings: u64) -> String {
    if total_pings == 0 {
        return "100.00".to_string();
    }

    let succeeded = total_pings.saturating_sub(failed_pings);
    let percentage = (succeeded as f64 / total_pings as f64) * 100.0;
    format!("{:.2}", percentage)
}

/// Applies outcomes to monitor state under a fixed policy
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusEngine {
    policy: StatusPolicy,
}

impl StatusEngine {
    pub fn new(policy: StatusPolicy) -> Self {
        Self { policy }
    }

    /// Fold one probe outcome into `state`, stamping it with `at`.
    ///
    /// Returns the status held before the outcome was applied.
    pub fn apply(
        &self,
        state: &mut MonitorState,
        outcome: ProbeOutcome,
        at: DateTime<Utc>,
    ) -> MonitorStatus {
        let previous = state.status;

        state.total_pings += 1;

        if outcome.success {
            state.retry_count = 0;
            state.status = if outcome.latency_ms > self.policy.degraded_threshold_ms {
                MonitorStatus::Degraded
            } else {
                MonitorStatus::Operational
            };
            state.latency_history.record(outcome.latency_ms);
        } else {
            state.failed_pings += 1;
            state.retry_count = state.retry_count.saturating_add(1);

            // Below the threshold the previous status stands
            if state.retry_count > self.policy.max_retries {
                state.status = MonitorStatus::Down;
            }
            state.latency_history.record(0);
        }

        state.last_ping_at = Some(at);

        previous
    }
}
