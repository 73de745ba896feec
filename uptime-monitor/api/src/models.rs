pub mod monitor;

pub use monitor::{MessageResponse, Monitor, MonitorList, MonitorStats, MonitorStatus, RegisterMonitor};
