use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Health classification of a monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MonitorStatus {
    /// Registered, first probe not yet applied
    #[serde(alias = "INIT")]
    Pending,
    Operational,
    /// Reachable but slower than the degraded threshold
    Degraded,
    Down,
}

impl fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorStatus::Pending => write!(f, "PENDING"),
            MonitorStatus::Operational => write!(f, "OPERATIONAL"),
            MonitorStatus::Degraded => write!(f, "DEGRADED"),
            MonitorStatus::Down => write!(f, "DOWN"),
        }
    }
}

// Point-in-time copy of a monitor, safe to hand to readers
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    pub name: String,
    pub url: String,
    pub status: MonitorStatus,
    #[serde(rename = "lastPing")]
    pub last_ping_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub total_pings: u64,
    pub failed_pings: u64,
    pub retry_count: u32,
    pub uptime: String,
    pub latency_history: Vec<u64>,
}

// Registration body; both fields optional so missing ones map to 400, not a parse error
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterMonitor {
    pub name: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonitorStats {
    pub total: usize,
    pub operational: usize,
    pub degraded: usize,
    pub down: usize,
    pub pending: usize,
}

impl MonitorStats {
    /// Tally monitors by status
    pub fn from_monitors(monitors: &[Monitor]) -> Self {
        let mut stats = MonitorStats {
            total: monitors.len(),
            ..Default::default()
        };

        for monitor in monitors {
            match monitor.status {
                MonitorStatus::Operational => stats.operational += 1,
                MonitorStatus::Degraded => stats.degraded += 1,
                MonitorStatus::Down => stats.down += 1,
                MonitorStatus::Pending => stats.pending += 1,
            }
        }

        stats
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonitorList {
    pub stats: MonitorStats,
    pub monitors: Vec<Monitor>,
}

impl From<Vec<Monitor>> for MonitorList {
    fn from(monitors: Vec<Monitor>) -> Self {
        Self {
            stats: MonitorStats::from_monitors(&monitors),
            monitors,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
