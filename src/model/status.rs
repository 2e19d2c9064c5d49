//! Maintenance request status
//!
//! The board knows exactly four statuses. Incoming values outside that set
//! are folded into [`RequestStatus::New`] once, while deserializing, so the
//! rest of the crate only ever sees the closed enumeration.

use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle status of a maintenance request
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Freshly reported, not yet picked up
    #[default]
    New,
    /// A technician is working on it
    InProgress,
    /// Work finished, equipment back in service
    Repaired,
    /// Equipment cannot be repaired; terminal by convention
    Scrap,
}

impl RequestStatus {
    /// Board column order
    pub fn all() -> &'static [RequestStatus] {
        &[
            RequestStatus::New,
            RequestStatus::InProgress,
            RequestStatus::Repaired,
            RequestStatus::Scrap,
        ]
    }

    /// Wire value (`new`, `in_progress`, `repaired`, `scrap`)
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::New => "new",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Repaired => "repaired",
            RequestStatus::Scrap => "scrap",
        }
    }

    /// Column heading
    pub fn title(&self) -> &'static str {
        match self {
            RequestStatus::New => "New",
            RequestStatus::InProgress => "In Progress",
            RequestStatus::Repaired => "Repaired",
            RequestStatus::Scrap => "Scrap",
        }
    }

    /// Moving into this status needs an explicit user confirmation
    pub fn requires_confirmation(&self) -> bool {
        matches!(self, RequestStatus::Scrap)
    }

    /// Work on the request is over (no longer counts as overdue)
    pub fn is_closed(&self) -> bool {
        matches!(self, RequestStatus::Repaired | RequestStatus::Scrap)
    }

    /// Lenient ingestion: anything unrecognized, or nothing at all, is `New`
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw {
            None => RequestStatus::New,
            Some(value) => value.parse().unwrap_or_else(|_| {
                tracing::debug!(status = %value, "Unknown request status, treating as new");
                RequestStatus::New
            }),
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse error, used where an unknown status must be rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid request status: {0}")]
pub struct InvalidStatus(pub String);

impl FromStr for RequestStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(RequestStatus::New),
            "in_progress" => Ok(RequestStatus::InProgress),
            "repaired" => Ok(RequestStatus::Repaired),
            "scrap" => Ok(RequestStatus::Scrap),
            _ => Err(InvalidStatus(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for RequestStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(serde_json::Value::String(value)) => RequestStatus::normalize(Some(&value)),
            Some(other) => RequestStatus::normalize(Some(&other.to_string())),
            None => RequestStatus::New,
        })
    }
}
