//! GearGuard API Client
//!
//! - **ApiClient**: reqwest-based client for every endpoint the UI uses
//! - **MaintenanceApi**: the slice of the API the status board depends on
//! - **ClientError**: transport / status / decode failures

mod error;
mod http;

pub use error::{ClientError, ClientResult};
pub use http::{ApiClient, ApiClientConfig, MaintenanceApi};
