//! Uptime monitor service
//!
//! Registers HTTP(S) endpoints by name, probes them on a fixed cadence and
//! classifies each as operational, degraded or down.

pub mod config;
pub mod controllers;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use errors::{AppError, MonitorError, Result};
pub use models::{Monitor, MonitorStatus};
pub use services::monitoring::{HttpProber, ProbeOutcome, Prober};
pub use services::registry::MonitorRegistry;
pub use services::scheduler::{Scheduler, SchedulerHandle, SchedulerTask};
pub use services::status::{StatusEngine, StatusPolicy};
pub use state::AppState;
