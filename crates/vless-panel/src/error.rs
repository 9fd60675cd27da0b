//! Error types for the panel.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use systemctl_client::SystemctlError;
use thiserror::Error;
use uuid::Uuid;

/// Panel error types.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("Remark must not be empty")]
    EmptyRemark,

    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Failed to write xray config: {0}")]
    ConfigWrite(String),

    #[error("Failed to restart xray: {stderr}")]
    ServiceRestart {
        code: Option<i32>,
        stderr: String,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for PanelError {
    fn into_response(self) -> Response {
        // CONFIG_WRITE_FAILED and SERVICE_RESTART_FAILED are deliberately
        // distinct: after a restart failure the on-disk config is already
        // committed and the running daemon lags behind it, which the operator
        // must be able to tell apart from a write that never happened.
        let (status, code) = match &self {
            PanelError::EmptyRemark => (StatusCode::BAD_REQUEST, "EMPTY_REMARK"),
            PanelError::UserNotFound(_) => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
            PanelError::ConfigWrite(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_WRITE_FAILED")
            }
            PanelError::ServiceRestart { .. } => {
                (StatusCode::BAD_GATEWAY, "SERVICE_RESTART_FAILED")
            }
            PanelError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            PanelError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<std::io::Error> for PanelError {
    fn from(e: std::io::Error) -> Self {
        PanelError::ConfigWrite(e.to_string())
    }
}

impl From<serde_json::Error> for PanelError {
    fn from(e: serde_json::Error) -> Self {
        PanelError::Internal(format!("JSON serialization error: {}", e))
    }
}

impl From<serde_yaml::Error> for PanelError {
    fn from(e: serde_yaml::Error) -> Self {
        PanelError::Internal(format!("YAML serialization error: {}", e))
    }
}

impl From<SystemctlError> for PanelError {
    fn from(e: SystemctlError) -> Self {
        let code = e.exit_code();
        let stderr = e.stderr().map(str::to_string).unwrap_or_else(|| e.to_string());
        PanelError::ServiceRestart { code, stderr }
    }
}
