//! Maintenance Request Routes
//!
//! - GET /requests/ - List requests
//! - POST /requests/ - Create a request
//! - PUT /requests/:id/state?state=<status> - Change status

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::service;
use crate::api::state::AppState;
use crate::model::{MaintenanceRequest, NewMaintenanceRequest, RecordId, RequestStatus};

/// Query string of the state-change endpoint
#[derive(Debug, Deserialize)]
pub struct StateQuery {
    pub state: String,
}

/// GET /requests/
pub async fn list_requests(State(state): State<Arc<AppState>>) -> Json<Vec<MaintenanceRequest>> {
    Json(state.db.read().await.requests.clone())
}

/// POST /requests/
pub async fn create_request(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewMaintenanceRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MaintenanceRequest>)> {
    let Json(req) = payload?;
    let request = service::create_request(&mut *state.db.write().await, req)?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// PUT /requests/:id/state
///
/// Unlike record ingestion, an unknown status here is rejected.
pub async fn update_state(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    query: Result<Query<StateQuery>, QueryRejection>,
) -> ApiResult<Json<MaintenanceRequest>> {
    let Query(query) = query?;
    let status: RequestStatus = query
        .state
        .parse()
        .map_err(|e: crate::model::InvalidStatus| ApiError::Validation(e.to_string()))?;

    let updated = service::change_state(&mut *state.db.write().await, &RecordId::new(id), status)?;
    tracing::info!(request_id = %updated.id, status = %status, "Request state changed");
    Ok(Json(updated))
}
