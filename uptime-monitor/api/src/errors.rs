//! Error types for the uptime monitor

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::monitor::MessageResponse;

pub type Result<T> = std::result::Result<T, AppError>;

/// Errors visible to API callers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    /// Registration body failed validation
    #[error("{0}")]
    InvalidInput(String),

    /// A monitor with this name already exists
    #[error("Monitor name '{0}' already exists. Choose a unique name.")]
    NameConflict(String),

    #[error("Monitor '{0}' not found")]
    NotFound(String),
}

impl ResponseError for MonitorError {
    fn status_code(&self) -> StatusCode {
        match self {
            MonitorError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            MonitorError::NameConflict(_) => StatusCode::CONFLICT,
            MonitorError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(MessageResponse::new(self.to_string()))
    }
}

/// Startup and runtime failures of the service process
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            MonitorError::InvalidInput("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            MonitorError::NameConflict("svc1".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            MonitorError::NotFound("svc1".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_conflict_message_names_monitor() {
        let err = MonitorError::NameConflict("svc1".into());
        assert!(err.to_string().contains("'svc1'"));
    }

    #[test]
    fn test_config_error_display() {
        let err = AppError::Config("ping_interval must be greater than 0".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: ping_interval must be greater than 0"
        );
    }
}
