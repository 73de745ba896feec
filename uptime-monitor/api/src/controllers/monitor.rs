use actix_web::{HttpResponse, web};
use tracing::{info, warn};

use crate::errors::MonitorError;
use crate::models::monitor::{MessageResponse, MonitorList, RegisterMonitor};
use crate::state::AppState;

// Register a new monitor and probe it right away
pub async fn register_monitor(
    data: web::Data<AppState>,
    body: web::Json<RegisterMonitor>,
) -> Result<HttpResponse, MonitorError> {
    let RegisterMonitor { name, url } = body.into_inner();
    let name = name.unwrap_or_default();
    let url = url.unwrap_or_default();
    info!("Request to register monitor: {}", name);

    let entry = data.registry.register(&name, &url).await?;

    if !data.scheduler.probe_now(entry) {
        warn!("Scheduler is not running, {} will not be probed", name);
    }

    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "\"{}\" is now being monitored (ping every {}).",
        name,
        data.config.ping_interval_label()
    ))))
}

// List all monitors with aggregate counts
pub async fn list_monitors(data: web::Data<AppState>) -> HttpResponse {
    let monitors = data.registry.list_all().await;
    info!("Returning {} monitors", monitors.len());

    HttpResponse::Ok().json(MonitorList::from(monitors))
}

// Get a single monitor by name
pub async fn get_monitor(
    data: web::Data<AppState>,
    name: web::Path<String>,
) -> Result<HttpResponse, MonitorError> {
    let name = name.into_inner();

    match data.registry.get(&name).await {
        Some(monitor) => Ok(HttpResponse::Ok().json(monitor)),
        None => Err(MonitorError::NotFound(name)),
    }
}
