//! Uptime monitor service binary

use actix_web::{App, HttpServer, web};
use clap::{Parser, ValueEnum};
use dotenv::dotenv;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use uptime_monitor::controllers::{cors_headers, routes};
use uptime_monitor::{
    AppError, AppState, Config, HttpProber, MonitorRegistry, Result, Scheduler, StatusEngine,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Parser)]
#[command(version, about = "Probe registered HTTP endpoints and report their health")]
struct Args {
    /// Address to bind, overrides HOST
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overrides PORT
    #[arg(long)]
    port: Option<u16>,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    log_format: LogFormat,
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    initialize_tracing(args.log_format);

    info!("Starting uptime monitor v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::from_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    config.validate().map_err(AppError::Config)?;

    info!(
        "Monitor configuration - Interval: {}s, Timeout: {}ms, Max retries: {}, History: {} samples",
        config.ping_interval.as_secs(),
        config.probe_timeout.as_millis(),
        config.max_retries,
        config.latency_history_limit
    );

    let registry = Arc::new(MonitorRegistry::new(config.latency_history_limit));
    let prober = Arc::new(HttpProber::new(config.probe_timeout)?);
    let (scheduler, scheduler_task) = Scheduler::new(
        Arc::clone(&registry),
        prober,
        StatusEngine::new(config.status_policy()),
        config.ping_interval,
    )
    .start();

    let state = web::Data::new(AppState {
        registry,
        scheduler,
        config: config.clone(),
    });

    info!("Uptime monitor listening on {}:{}", config.host, config.port);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(cors_headers())
            .configure(routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    // Probes are drained even when the server exits with an error
    scheduler_task.run_until(server).await?;

    Ok(())
}

/// Initialize structured logging
fn initialize_tracing(format: LogFormat) {
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter_layer);

    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .json(),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init(),
    }
}
