//! HTTP probing of monitored endpoints

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Result of a single probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub success: bool,
    /// Wall-clock latency; 0 for failed probes
    pub latency_ms: u64,
    pub http_status: Option<u16>,
}

impl ProbeOutcome {
    /// Successful probe. A 0 ms reading is clamped to 1 ms.
    pub fn success(latency_ms: u64) -> Self {
        Self {
            success: true,
            latency_ms: latency_ms.max(1),
            http_status: None,
        }
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn failure() -> Self {
        Self {
            success: false,
            latency_ms: 0,
            http_status: None,
        }
    }
}

/// Why a probe failed. Only ever logged.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),
}

/// Performs one health check against a URL
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, name: &str, url: &str) -> ProbeOutcome;
}

/// Prober issuing a GET and requiring a 2xx response
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: HttpClient,
    timeout: Duration,
}

impl HttpProber {
    pub fn new(probe_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = HttpClient::builder()
            .timeout(probe_timeout)
            .user_agent(format!("uptime-monitor/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            timeout: probe_timeout,
        })
    }

    // Returns elapsed milliseconds and the response status
    async fn check_endpoint(&self, url: &str) -> Result<(u64, u16), ProbeError> {
        let start_time = Instant::now();

        let response = timeout(self.timeout, self.client.get(url).send())
            .await
            .map_err(|_| ProbeError::Timeout(self.timeout))??;

        let latency_ms = start_time.elapsed().as_millis() as u64;
        let status = response.status();

        if !status.is_success() {
            return Err(ProbeError::Status(status.as_u16()));
        }

        Ok((latency_ms, status.as_u16()))
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, name: &str, url: &str) -> ProbeOutcome {
        match self.check_endpoint(url).await {
            Ok((latency_ms, status)) => {
                debug!(monitor = name, status, latency_ms, "Probe succeeded");
                ProbeOutcome::success(latency_ms).with_http_status(status)
            }
            Err(e) => {
                warn!(monitor = name, url, "Probe failed: {}", e);
                ProbeOutcome::failure()
            }
        }
    }
}
