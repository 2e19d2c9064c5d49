//! Maintenance REST API Client
//!
//! HTTP client for the GearGuard API: equipment, teams and maintenance
//! requests. Every call returns the parsed JSON body or a [`ClientError`].

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::{ClientError, ClientResult};
use crate::model::{
    Equipment, MaintenanceRequest, NewEquipment, NewMaintenanceRequest, NewTeam, RecordId,
    RequestStatus, Team,
};

/// Operations the status board needs from the API
#[async_trait]
pub trait MaintenanceApi: Send + Sync {
    /// `GET /requests/`
    async fn fetch_requests(&self) -> ClientResult<Vec<MaintenanceRequest>>;

    /// `POST /requests/`
    async fn create_request(&self, request: &NewMaintenanceRequest)
        -> ClientResult<MaintenanceRequest>;

    /// `PUT /requests/{id}/state?state={status}`
    async fn update_request_state(
        &self,
        id: &RecordId,
        status: RequestStatus,
    ) -> ClientResult<MaintenanceRequest>;
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL of the API (e.g., "http://localhost:8000")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

impl ApiClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// GearGuard REST API client
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client with the given configuration
    pub fn new(config: ApiClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| ClientError::Setup(e.to_string()))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// Absolute URL for an API path
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check that the API answers
    pub async fn health_check(&self) -> ClientResult<()> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(ClientError::from_transport)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(status_error(response).await)
        }
    }

    // ============ Equipment ============

    /// `GET /equipment/`
    pub async fn fetch_equipment(&self) -> ClientResult<Vec<Equipment>> {
        self.get_json("/equipment/").await
    }

    /// `POST /equipment/`
    pub async fn create_equipment(&self, equipment: &NewEquipment) -> ClientResult<Equipment> {
        self.post_json("/equipment/", equipment).await
    }

    // ============ Teams ============

    /// `GET /teams/`
    pub async fn fetch_teams(&self) -> ClientResult<Vec<Team>> {
        self.get_json("/teams/").await
    }

    /// `POST /teams/`
    pub async fn create_team(&self, team: &NewTeam) -> ClientResult<Team> {
        self.post_json("/teams/", team).await
    }

    // ============ Plumbing ============

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        tracing::debug!(path, "GET");
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(ClientError::from_transport)?;

        read_json(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        tracing::debug!(path, "POST");
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(ClientError::from_transport)?;

        read_json(response).await
    }
}

#[async_trait]
impl MaintenanceApi for ApiClient {
    async fn fetch_requests(&self) -> ClientResult<Vec<MaintenanceRequest>> {
        self.get_json("/requests/").await
    }

    async fn create_request(
        &self,
        request: &NewMaintenanceRequest,
    ) -> ClientResult<MaintenanceRequest> {
        self.post_json("/requests/", request).await
    }

    async fn update_request_state(
        &self,
        id: &RecordId,
        status: RequestStatus,
    ) -> ClientResult<MaintenanceRequest> {
        let path = state_path(id, status);
        tracing::debug!(path = %path, "PUT");

        let response = self
            .client
            .put(self.url(&path))
            .send()
            .await
            .map_err(ClientError::from_transport)?;

        read_json(response).await
    }
}

/// Path of the state-update endpoint for one request
fn state_path(id: &RecordId, status: RequestStatus) -> String {
    format!(
        "/requests/{}/state?state={}",
        urlencoding::encode(id.as_str()),
        status.as_str()
    )
}

/// Decode a success body, or turn a failure status into an error
async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    if !response.status().is_success() {
        return Err(status_error(response).await);
    }

    let body = response.text().await.map_err(ClientError::from_transport)?;
    Ok(serde_json::from_str(&body)?)
}

async fn status_error(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ClientError::Status {
        status,
        message: error_message(&body),
    }
}

/// Pull a human-readable message out of an error body
///
/// The API answers `{"detail": ...}`; anything else is passed through as text.
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorDetail {
        detail: serde_json::Value,
    }

    match serde_json::from_str::<ErrorDetail>(body) {
        Ok(ErrorDetail {
            detail: serde_json::Value::String(message),
        }) => message,
        Ok(ErrorDetail { detail }) => detail.to_string(),
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout_ms, 10_000);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new(ApiClientConfig::new("http://api.local:8000/")).unwrap();
        assert_eq!(client.url("/requests/"), "http://api.local:8000/requests/");
    }

    #[test]
    fn test_state_path() {
        let id = RecordId::from("r1");
        assert_eq!(
            state_path(&id, RequestStatus::InProgress),
            "/requests/r1/state?state=in_progress"
        );

        let id = RecordId::from("a b/c");
        assert_eq!(
            state_path(&id, RequestStatus::Scrap),
            "/requests/a%20b%2Fc/state?state=scrap"
        );
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"detail": "Request not found"}"#),
            "Request not found"
        );
        assert_eq!(
            error_message(r#"{"detail": [{"loc": ["query", "state"]}]}"#),
            r#"[{"loc":["query","state"]}]"#
        );
        assert_eq!(error_message("Internal Server Error"), "Internal Server Error");
        assert_eq!(error_message(""), "empty response body");
    }
}
