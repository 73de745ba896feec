use std::sync::Arc;

use crate::config::Config;
use crate::services::registry::MonitorRegistry;
use crate::services::scheduler::SchedulerHandle;

// App state
pub struct AppState {
    pub registry: Arc<MonitorRegistry>,
    pub scheduler: SchedulerHandle,
    pub config: Config,
}
