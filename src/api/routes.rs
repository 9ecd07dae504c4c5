//! API Routes
//!
//! `POST /commands` takes one chat message and returns the reply the chat
//! adapter should post, if any.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dispatch::{Dispatcher, Outcome};
use crate::error::AppError;

/// Shared state for API handlers
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct CommandRequest {
    #[serde(default)]
    pub channel: String,
    pub user: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub correlation_id: Uuid,
    pub command: String,
    pub outcome: Outcome,
    pub reply: String,
    pub processed_at: DateTime<Utc>,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new().route("/commands", post(handle_command))
}

// =========================================================================
// POST /commands
// =========================================================================

/// Dispatch one chat message. 204 when the message is not a known command.
async fn handle_command(
    State(state): State<AppState>,
    Json(request): Json<CommandRequest>,
) -> Result<Response, AppError> {
    if request.user.trim().is_empty() {
        return Err(AppError::InvalidRequest("user must not be empty".to_string()));
    }

    let dispatched = state
        .dispatcher
        .handle_message(&request.channel, request.user.trim(), &request.message)
        .await;

    let Some(dispatched) = dispatched else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    Ok(Json(CommandResponse {
        correlation_id: dispatched.correlation_id,
        command: dispatched.command,
        outcome: dispatched.outcome,
        reply: dispatched.reply,
        processed_at: Utc::now(),
    })
    .into_response())
}
