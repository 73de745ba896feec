//! In-memory registry of monitors

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::info;

use crate::errors::MonitorError;
use crate::models::monitor::{Monitor, MonitorStatus};
use crate::services::monitoring::ProbeOutcome;
use crate::services::status::{MonitorState, StatusEngine};

/// A registered monitor. Identity fields are immutable; probe state sits behind a lock.
#[derive(Debug)]
pub struct MonitorEntry {
    name: String,
    url: String,
    created_at: DateTime<Utc>,
    seq: u64,
    state: RwLock<MonitorState>,
    probe_gate: Mutex<()>,
}

impl MonitorEntry {
    fn new(name: String, url: String, seq: u64, history_capacity: usize) -> Self {
        Self {
            name,
            url,
            created_at: Utc::now(),
            seq,
            state: RwLock::new(MonitorState::new(history_capacity)),
            probe_gate: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Claim the right to probe this monitor.
    ///
    /// Returns `None` while another probe cycle holds it.
    pub fn try_begin_probe(&self) -> Option<MutexGuard<'_, ()>> {
        self.probe_gate.try_lock().ok()
    }

    /// Apply an outcome; returns the status before and after
    pub async fn apply(
        &self,
        engine: &StatusEngine,
        outcome: ProbeOutcome,
    ) -> (MonitorStatus, MonitorStatus) {
        let mut state = self.state.write().await;
        let previous = engine.apply(&mut state, outcome, Utc::now());
        (previous, state.status)
    }

    /// Copy of the monitor as readers see it
    pub async fn snapshot(&self) -> Monitor {
        let state = self.state.read().await;

        Monitor {
            name: self.name.clone(),
            url: self.url.clone(),
            status: state.status,
            last_ping_at: state.last_ping_at,
            created_at: self.created_at,
            total_pings: state.total_pings,
            failed_pings: state.failed_pings,
            retry_count: state.retry_count,
            uptime: state.uptime(),
            latency_history: state.latency_history.to_vec(),
        }
    }
}

/// Reject empty names, empty URLs and URLs without an http(s) scheme
pub fn validate_registration(name: &str, url: &str) -> Result<(), MonitorError> {
    if name.trim().is_empty() || url.is_empty() || !url.starts_with("http") {
        return Err(MonitorError::InvalidInput(
            "Name and valid URL are required.".to_string(),
        ));
    }

    Ok(())
}

/// Owns every monitor for the lifetime of the process. Monitors are never removed.
#[derive(Debug)]
pub struct MonitorRegistry {
    monitors: RwLock<HashMap<String, Arc<MonitorEntry>>>,
    next_seq: AtomicU64,
    history_capacity: usize,
}

impl MonitorRegistry {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            monitors: RwLock::new(HashMap::new()),
            next_seq: AtomicU64::new(0),
            history_capacity,
        }
    }

    /// Register a monitor. Duplicate names and invalid input leave the registry untouched.
    pub async fn register(&self, name: &str, url: &str) -> Result<Arc<MonitorEntry>, MonitorError> {
        validate_registration(name, url)?;

        let mut monitors = self.monitors.write().await;

        if monitors.contains_key(name) {
            info!(monitor = name, "Rejected duplicate monitor registration");
            return Err(MonitorError::NameConflict(name.to_string()));
        }

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let entry = Arc::new(MonitorEntry::new(
            name.to_string(),
            url.to_string(),
            seq,
            self.history_capacity,
        ));
        monitors.insert(name.to_string(), Arc::clone(&entry));

        info!(monitor = name, url, "Registered monitor");
        Ok(entry)
    }

    pub async fn entry(&self, name: &str) -> Option<Arc<MonitorEntry>> {
        self.monitors.read().await.get(name).cloned()
    }

    pub async fn get(&self, name: &str) -> Option<Monitor> {
        match self.entry(name).await {
            Some(entry) => Some(entry.snapshot().await),
            None => None,
        }
    }

    /// Every entry, in registration order
    pub async fn entries(&self) -> Vec<Arc<MonitorEntry>> {
        let mut entries: Vec<Arc<MonitorEntry>> =
            self.monitors.read().await.values().cloned().collect();
        entries.sort_by_key(|entry| entry.seq);
        entries
    }

    /// Snapshots of every monitor, in registration order
    pub async fn list_all(&self) -> Vec<Monitor> {
        let entries = self.entries().await;
        let mut monitors = Vec::with_capacity(entries.len());

        for entry in entries {
            monitors.push(entry.snapshot().await);
        }

        monitors
    }

    pub async fn len(&self) -> usize {
        self.monitors.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.monitors.read().await.is_empty()
    }
}
