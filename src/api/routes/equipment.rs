//! Equipment Routes
//!
//! - GET /equipment/ - List equipment
//! - POST /equipment/ - Register equipment

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::service;
use crate::api::state::AppState;
use crate::model::{Equipment, NewEquipment};

/// GET /equipment/
pub async fn list_equipment(State(state): State<Arc<AppState>>) -> Json<Vec<Equipment>> {
    Json(state.db.read().await.equipment.clone())
}

/// POST /equipment/
pub async fn create_equipment(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewEquipment>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Equipment>)> {
    let Json(req) = payload?;
    let equipment = service::create_equipment(&mut *state.db.write().await, req)?;
    Ok((StatusCode::CREATED, Json(equipment)))
}
