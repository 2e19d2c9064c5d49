//! GearGuard REST API
//!
//! HTTP API the board client talks to, built with Axum.
//!
//! # Endpoints
//!
//! ## Teams
//! - `GET /teams/` - List teams
//! - `POST /teams/` - Create a team
//!
//! ## Equipment
//! - `GET /equipment/` - List equipment
//! - `POST /equipment/` - Register equipment
//!
//! ## Requests
//! - `GET /requests/` - List maintenance requests
//! - `POST /requests/` - Create a request (auto-fill and validation)
//! - `PUT /requests/:id/state?state=<status>` - Change status
//!
//! ## Health
//! - `GET /health` - Liveness
//! - `GET /` - Banner
//!
//! # Example
//!
//! ```rust,ignore
//! use gearguard::api::{serve, AppState, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     serve(AppState::new(config.clone()), &config).await?;
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod routes;
pub mod seed;
pub mod service;
pub mod state;

pub use db::Database;
pub use error::{ApiError, ApiResult};
pub use seed::seed_demo_data;
pub use state::{AppState, ServerConfig};

use axum::{
    http::HeaderValue,
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/", get(routes::health::home))
        .route("/health", get(routes::health::health))
        .route(
            "/teams/",
            get(routes::teams::list_teams).post(routes::teams::create_team),
        )
        .route(
            "/equipment/",
            get(routes::equipment::list_equipment).post(routes::equipment::create_equipment),
        )
        .route(
            "/requests/",
            get(routes::requests::list_requests).post(routes::requests::create_request),
        )
        .route("/requests/:id/state", put(routes::requests::update_state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ServerConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("GearGuard API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("GearGuard API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::util::ServiceExt;

    fn create_test_app() -> (Router, AppState) {
        let mut db = Database::default();
        seed_demo_data(&mut db).unwrap();
        let state = AppState::with_database(db, ServerConfig::default());
        (build_router(state.clone()), state)
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn first_request_id(state: &AppState) -> String {
        state.db.read().await.requests[0].id.to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_requests() {
        let (app, _) = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/requests/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["state"], "new");
        assert_eq!(body[0]["subject"], "Oil Leak Detected");
    }

    #[tokio::test]
    async fn test_update_state() {
        let (app, state) = create_test_app();
        let id = first_request_id(&state).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/requests/{}/state?state=in_progress", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["state"], "in_progress");
        assert_eq!(
            state.db.read().await.requests[0].status,
            crate::model::RequestStatus::InProgress
        );
    }

    #[tokio::test]
    async fn test_update_state_rejects_unknown_status() {
        let (app, state) = create_test_app();
        let id = first_request_id(&state).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/requests/{}/state?state=on_hold", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["detail"], "Invalid request status: on_hold");
    }

    #[tokio::test]
    async fn test_update_state_unknown_request() {
        let (app, _) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/requests/nope/state?state=repaired")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["detail"], "Request not found");
    }

    #[tokio::test]
    async fn test_create_team_and_list() {
        let (app, _) = create_test_app();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/teams/")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"name": "Electricians", "members": ["Dana Volt"]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(Request::builder().uri("/teams/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 3);
        assert_eq!(body[2]["members"][0], "Dana Volt");
    }

    #[tokio::test]
    async fn test_create_request_validation_error() {
        let (app, state) = create_test_app();
        let equipment_id = state.db.read().await.equipment[0].id.to_string();

        let body = serde_json::json!({
            "subject": "Quarterly service",
            "equipment_id": equipment_id,
            "request_type": "preventive"
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/requests/")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["detail"],
            "Preventive requests must have a Scheduled Date"
        );
    }

    #[tokio::test]
    async fn test_create_equipment() {
        let (app, _) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/equipment/")
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        r#"{"name": "Forklift", "serial_number": "FL-7", "department": "Ops"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["is_scrapped"], false);
        assert_eq!(body["department"], "Ops");
    }

    #[tokio::test]
    async fn test_missing_state_query_is_json_error() {
        let (app, state) = create_test_app();
        let id = first_request_id(&state).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/requests/{}/state", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["detail"].as_str().unwrap().contains("missing field `state`"));
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let (app, _) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/teams/")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"name": "#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(!body["detail"].as_str().unwrap().is_empty());
    }
}
