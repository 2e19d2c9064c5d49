//! Team Routes
//!
//! - GET /teams/ - List teams
//! - POST /teams/ - Create a team

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::service;
use crate::api::state::AppState;
use crate::model::{NewTeam, Team};

/// GET /teams/
pub async fn list_teams(State(state): State<Arc<AppState>>) -> Json<Vec<Team>> {
    Json(state.db.read().await.teams.clone())
}

/// POST /teams/
pub async fn create_team(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewTeam>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Team>)> {
    let Json(req) = payload?;
    let team = service::create_team(&mut *state.db.write().await, req)?;
    Ok((StatusCode::CREATED, Json(team)))
}
