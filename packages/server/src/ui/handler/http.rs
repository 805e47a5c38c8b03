//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{infrastructure::dto::http::StatusDto, ui::state::AppState};

/// Liveness endpoint
pub async fn root() -> &'static str {
    "Safety Chat Server is running"
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Connection, user and message counts
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusDto> {
    let status = state.get_relay_status_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(StatusDto::from(status))
}
