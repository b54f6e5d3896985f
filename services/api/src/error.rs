//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service.

use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gita_core::ports::PortError;
use tracing::error;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A resource the service itself knows does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Port(PortError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            ApiError::Port(PortError::NotFound(_)) | ApiError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Port(PortError::InvalidRequest(message))
            | ApiError::Port(PortError::NotFound(message))
            | ApiError::NotFound(message) => message.clone(),
            other => {
                // Internal details stay in the log.
                error!("Request failed: {:?}", other);
                "Failed to retrieve content".to_string()
            }
        };
        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_errors_map_to_client_or_server_status() {
        let invalid = ApiError::from(PortError::InvalidRequest("chapter 0".to_string()));
        let missing = ApiError::from(PortError::NotFound("verse 9".to_string()));
        let failed = ApiError::from(PortError::ProviderCallFailed("503".to_string()));

        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_details_are_not_sent_to_the_client() {
        let response =
            ApiError::from(PortError::Unexpected("cache entry chapter:3".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
