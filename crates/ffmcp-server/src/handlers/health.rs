//! Health check handler.

use axum::Json;
use chrono::Utc;
use serde::Serialize;

use ffmcp_media::{check_ffmpeg, check_ffprobe};

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
    pub engine: EngineStatus,
}

/// Whether each engine executable is on the search path.
#[derive(Debug, Serialize)]
pub struct EngineStatus {
    pub ffmpeg: bool,
    pub ffprobe: bool,
}

impl EngineStatus {
    pub fn detect() -> Self {
        Self {
            ffmpeg: check_ffmpeg().is_ok(),
            ffprobe: check_ffprobe().is_ok(),
        }
    }
}

/// Liveness plus engine availability. A missing engine does not fail the
/// check; tools report it on use.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
        engine: EngineStatus::detect(),
    })
}
