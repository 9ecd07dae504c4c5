//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::CommandError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Reply sent to chat when a command fails for reasons the user cannot fix
pub const INTERNAL_FAILURE_REPLY: &str = "Something went wrong while running that command.";

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Rejections reported back to the chatter
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Infrastructure
    #[error(transparent)]
    Ledger(#[from] crate::ledger::LedgerError),

    #[error(transparent)]
    Store(#[from] crate::store::StoreError),

    #[error(transparent)]
    Directory(#[from] crate::identity::DirectoryError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl AppError {
    /// Text to post back to chat for this error
    pub fn reply_text(&self) -> String {
        match self {
            AppError::Command(e) => e.to_string(),
            _ => INTERNAL_FAILURE_REPLY.to_string(),
        }
    }

    /// Whether the user caused this (as opposed to the bot's own plumbing)
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::Command(_) | AppError::InvalidRequest(_))
    }
}

impl From<crate::domain::BalanceError> for AppError {
    fn from(e: crate::domain::BalanceError) -> Self {
        match e {
            crate::domain::BalanceError::Overflow => AppError::Command(CommandError::Overflow),
            crate::domain::BalanceError::Insufficient { .. } => AppError::Internal(e.to_string()),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            AppError::Command(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.kind(), None),
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", Some(msg.clone()))
            }
            AppError::Ledger(e) => {
                tracing::error!("Ledger error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "ledger_error", None)
            }
            AppError::Store(e) => {
                tracing::error!("Store error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "store_error", None)
            }
            AppError::Directory(e) => {
                tracing::error!("Directory error: {:?}", e);
                (StatusCode::BAD_GATEWAY, "directory_error", None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
            AppError::Config(e) => {
                tracing::error!("Config error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "config_error", None)
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
