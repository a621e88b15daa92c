//! Health check and service status handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Availability of the remote dependencies, decided once at startup
#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub database: bool,
    pub ai_assistant: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Which features are live and which are running in offline mode
pub async fn service_status(State(state): State<AppState>) -> Json<ServiceStatus> {
    Json(ServiceStatus {
        database: state.db.is_some(),
        ai_assistant: state.chat.is_available(),
        model: state.config.ai.resolve().map(|provider| provider.model),
    })
}
