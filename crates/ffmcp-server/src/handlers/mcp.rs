//! MCP over HTTP: one JSON-RPC message per POST.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::state::AppState;

/// Dispatch a JSON-RPC message. Notifications are acknowledged with 202.
pub async fn mcp_endpoint(State(state): State<AppState>, body: String) -> Response {
    match state.mcp.handle_message(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
