//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use college_path_core::{FlowError, PortError, SessionError, ValidationError};
use tracing::error;

use crate::adapters::CatalogError;
use crate::config::ConfigError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The static catalog could not be loaded at startup.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Represents an error from the session store, including its backing store.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Input the student supplied was rejected.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// A query parameter named an unknown state, district, or college type.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<FlowError> for ApiError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::Validation(e) => ApiError::Validation(e),
            FlowError::Session(e) => ApiError::Session(e),
            FlowError::Port(e) => ApiError::Port(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(ValidationError::NotRegistered) => StatusCode::FORBIDDEN,
            ApiError::Validation(
                ValidationError::AlreadyRegistered | ValidationError::AlreadyOnboarded,
            ) => StatusCode::CONFLICT,
            ApiError::Validation(_) | ApiError::InvalidFilter(_) => StatusCode::BAD_REQUEST,
            ApiError::Session(SessionError::InvalidStep(_)) => StatusCode::BAD_REQUEST,
            ApiError::Session(SessionError::Storage(PortError::QuotaExceeded { .. }))
            | ApiError::Port(PortError::QuotaExceeded { .. }) => StatusCode::INSUFFICIENT_STORAGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}
