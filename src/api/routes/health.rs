//! Health Routes
//!
//! - GET / - Banner
//! - GET /health - Liveness with uptime

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::api::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct BannerResponse {
    pub message: String,
}

/// GET /
pub async fn home() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: format!("GearGuard API v{} is running", env!("CARGO_PKG_VERSION")),
    })
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
