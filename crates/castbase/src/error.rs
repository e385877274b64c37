use crate::analytics::engagement::EngagementServiceError;
use crate::analytics::interactions::InteractionImportError;
use crate::analytics::ScoringError;
use crate::config::ConfigError;
use crate::polling::PollError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Scoring(ScoringError),
    Import(InteractionImportError),
    Engagement(EngagementServiceError),
    Poll(PollError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Scoring(err) => write!(f, "scoring error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Engagement(err) => write!(f, "engagement error: {}", err),
            AppError::Poll(err) => write!(f, "polling error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Scoring(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Engagement(err) => Some(err),
            AppError::Poll(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Scoring(_)
            | AppError::Import(_)
            | AppError::Engagement(EngagementServiceError::Scoring(_)) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Engagement(_)
            | AppError::Poll(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ScoringError> for AppError {
    fn from(value: ScoringError) -> Self {
        Self::Scoring(value)
    }
}

impl From<InteractionImportError> for AppError {
    fn from(value: InteractionImportError) -> Self {
        Self::Import(value)
    }
}

impl From<EngagementServiceError> for AppError {
    fn from(value: EngagementServiceError) -> Self {
        Self::Engagement(value)
    }
}

impl From<PollError> for AppError {
    fn from(value: PollError) -> Self {
        Self::Poll(value)
    }
}
