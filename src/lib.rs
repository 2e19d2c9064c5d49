//! # GearGuard
//!
//! Equipment maintenance tracking: a Kanban status board client over a
//! small REST API for teams, equipment and maintenance requests.
//!
//! ## Modules
//!
//! - [`model`]: Request, equipment and team records
//! - [`client`]: HTTP client for the maintenance API
//! - [`board`]: Status board with optimistic moves and reload on failure
//! - [`session`]: Locally persisted user session
//! - [`api`]: REST API server with Axum
//! - [`config`]: File and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gearguard::board::{CardMoved, StatusBoard};
//! use gearguard::client::{ApiClient, ApiClientConfig};
//! use gearguard::model::RequestStatus;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = ApiClient::new(ApiClientConfig::default())?;
//!     let board = StatusBoard::new(Arc::new(api));
//!
//!     board.load().await?;
//!
//!     let outcome = board
//!         .card_moved(CardMoved::new("1", RequestStatus::New, RequestStatus::InProgress))
//!         .await;
//!     println!("{:?}", outcome);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod board;
pub mod client;
pub mod config;
pub mod model;
pub mod session;

// Re-export top-level types for convenience
pub use model::{
    Equipment, MaintenanceRequest, NewEquipment, NewMaintenanceRequest, NewTeam, RecordId,
    RequestStatus, Team,
};

pub use client::{ApiClient, ApiClientConfig, ClientError, ClientResult, MaintenanceApi};

pub use board::{BoardEvent, CardMoved, MoveOutcome, StatusBoard};

pub use session::{SessionContext, SessionError, User};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::Config;
