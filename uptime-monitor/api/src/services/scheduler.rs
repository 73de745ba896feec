//! Periodic and on-demand probe scheduling

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::{debug, error, info, instrument, warn};

use crate::models::monitor::MonitorStatus;
use crate::services::monitoring::{ProbeOutcome, Prober};
use crate::services::registry::{MonitorEntry, MonitorRegistry};
use crate::services::status::StatusEngine;

/// What happened to one monitor in one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleResult {
    Probed(ProbeOutcome),
    /// Another probe for the same monitor was still running
    Skipped,
}

/// Drives probe-and-classify cycles for every registered monitor
#[derive(Clone)]
pub struct Scheduler {
    registry: Arc<MonitorRegistry>,
    prober: Arc<dyn Prober>,
    engine: StatusEngine,
    ping_interval: Duration,
}

/// Cloneable handle used to request immediate probes
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    probe_tx: mpsc::UnboundedSender<Arc<MonitorEntry>>,
}

impl SchedulerHandle {
    /// Queue an out-of-band probe cycle. Returns `false` once the scheduler has stopped.
    pub fn probe_now(&self, entry: Arc<MonitorEntry>) -> bool {
        self.probe_tx.send(entry).is_ok()
    }
}

/// Owner of the running scheduler loop
#[derive(Debug)]
pub struct SchedulerTask {
    shutdown_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

impl SchedulerTask {
    /// Stop ticking and wait for every in-flight probe to be applied
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());

        if let Err(e) = self.join.await {
            error!("Scheduler task ended abnormally: {}", e);
        }
    }

    /// Await `server`, then shut the scheduler down whatever the server returned
    pub async fn run_until<F, T>(self, server: F) -> T
    where
        F: Future<Output = T>,
    {
        let result = server.await;
        self.shutdown().await;
        result
    }
}

impl Scheduler {
    pub fn new(
        registry: Arc<MonitorRegistry>,
        prober: Arc<dyn Prober>,
        engine: StatusEngine,
        ping_interval: Duration,
    ) -> Self {
        Self {
            registry,
            prober,
            engine,
            ping_interval,
        }
    }

    /// Spawn the scheduler loop on the current runtime
    pub fn start(self) -> (SchedulerHandle, SchedulerTask) {
        let (probe_tx, probe_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let join = tokio::spawn(self.run(probe_rx, shutdown_rx));

        (
            SchedulerHandle { probe_tx },
            SchedulerTask { shutdown_tx, join },
        )
    }

    async fn run(
        self,
        mut probe_rx: mpsc::UnboundedReceiver<Arc<MonitorEntry>>,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) {
        info!(
            "Starting monitor scheduler, ping interval {}s",
            self.ping_interval.as_secs()
        );

        let mut ticker = interval(self.ping_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; new monitors are probed on registration instead
        ticker.tick().await;

        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => break,

                _ = ticker.tick() => {
                    let entries = self.registry.entries().await;
                    let scheduler = self.clone();
                    in_flight.spawn(async move {
                        scheduler.run_tick(entries).await;
                    });
                }

                Some(entry) = probe_rx.recv() => {
                    let scheduler = self.clone();
                    in_flight.spawn(async move {
                        scheduler.run_cycle(entry).await;
                    });
                }

                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = joined {
                        error!("Probe task failed: {}", e);
                    }
                }
            }
        }

        info!("Stopping monitor scheduler, waiting for {} tasks", in_flight.len());
        probe_rx.close();

        // Requests accepted before close still run
        while let Some(entry) = probe_rx.recv().await {
            let scheduler = self.clone();
            in_flight.spawn(async move {
                scheduler.run_cycle(entry).await;
            });
        }

        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                error!("Probe task failed during shutdown: {}", e);
            }
        }

        info!("Monitor scheduler stopped");
    }

    /// Probe every monitor in `entries` concurrently and wait for all of them
    async fn run_tick(&self, entries: Vec<Arc<MonitorEntry>>) {
        let started = Instant::now();
        let mut cycles = JoinSet::new();

        for entry in entries {
            let scheduler = self.clone();
            cycles.spawn(async move { scheduler.run_cycle(entry).await });
        }

        let mut probed = 0;
        let mut failed = 0;
        let mut skipped = 0;

        while let Some(joined) = cycles.join_next().await {
            match joined {
                Ok(CycleResult::Probed(outcome)) => {
                    probed += 1;
                    if !outcome.success {
                        failed += 1;
                    }
                }
                Ok(CycleResult::Skipped) => skipped += 1,
                Err(e) => error!("Probe task failed: {}", e),
            }
        }

        debug!(
            probed,
            failed,
            skipped,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Tick complete"
        );
    }

    /// Probe one monitor and fold the outcome into its state
    #[instrument(skip(self, entry), fields(monitor = entry.name()))]
    pub async fn run_cycle(&self, entry: Arc<MonitorEntry>) -> CycleResult {
        let Some(_gate) = entry.try_begin_probe() else {
            debug!("Probe already in flight, skipping");
            return CycleResult::Skipped;
        };

        let outcome = self.prober.probe(entry.name(), entry.url()).await;
        let (previous, current) = entry.apply(&self.engine, outcome).await;

        if outcome.success {
            info!(
                latency_ms = outcome.latency_ms,
                http_status = outcome.http_status,
                status = %current,
                "Monitor is up"
            );
        } else {
            debug!(status = %current, "Monitor probe failed");
        }

        if previous != current {
            if current == MonitorStatus::Down {
                warn!(from = %previous, "Monitor is DOWN");
            } else {
                info!(from = %previous, to = %current, "Monitor status changed");
            }
        }

        CycleResult::Probed(outcome)
    }
}
