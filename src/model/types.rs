//! Wire records shared by the client, the board and the API server
//!
//! - `RecordId`: opaque identifier (string or number on the wire)
//! - `MaintenanceRequest`, `Equipment`, `Team`: records owned by the API
//! - `NewMaintenanceRequest`, `NewEquipment`, `NewTeam`: creation payloads

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use super::status::RequestStatus;

/// Opaque record identifier
///
/// The API has handed out both integer and uuid identifiers over time, so
/// either form is accepted and kept as a string.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random identifier for server-side records
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Int(i64),
            Uint(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => RecordId(s),
            RawId::Int(n) => RecordId(n.to_string()),
            RawId::Uint(n) => RecordId(n.to_string()),
        })
    }
}

/// A maintenance request as held by the API and cached by the board
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaintenanceRequest {
    pub id: RecordId,
    pub subject: String,
    pub equipment_id: RecordId,
    /// Board column driver; absent or unknown values arrive as `New`
    #[serde(rename = "state", alias = "status", default)]
    pub status: RequestStatus,
    /// Free-form category tag (`corrective`, `preventive`, ...)
    #[serde(alias = "req_type", default)]
    pub request_type: String,
    #[serde(default, with = "flexible_datetime")]
    pub scheduled_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub technician: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_team_id: Option<RecordId>,
    /// Planned duration in hours
    #[serde(default)]
    pub duration: f64,
    #[serde(default, with = "flexible_datetime", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

impl MaintenanceRequest {
    /// Scheduled in the past and still open
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        match self.scheduled_date {
            Some(when) => when < now && !self.status.is_closed(),
            None => false,
        }
    }
}

/// Payload for `POST /requests/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMaintenanceRequest {
    pub subject: String,
    pub equipment_id: RecordId,
    #[serde(alias = "req_type")]
    pub request_type: String,
    #[serde(default, with = "flexible_datetime", skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_team_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technician: Option<String>,
    #[serde(default)]
    pub duration: f64,
}

impl NewMaintenanceRequest {
    pub fn new(
        subject: impl Into<String>,
        equipment_id: impl Into<RecordId>,
        request_type: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            equipment_id: equipment_id.into(),
            request_type: request_type.into(),
            scheduled_date: None,
            maintenance_team_id: None,
            technician: None,
            duration: 0.0,
        }
    }

    /// Builder method: set scheduled date
    pub fn scheduled(mut self, when: NaiveDateTime) -> Self {
        self.scheduled_date = Some(when);
        self
    }

    /// Builder method: assign a technician
    pub fn technician(mut self, name: impl Into<String>) -> Self {
        self.technician = Some(name.into());
        self
    }

    /// Builder method: assign a team
    pub fn team(mut self, team_id: impl Into<RecordId>) -> Self {
        self.maintenance_team_id = Some(team_id.into());
        self
    }
}

/// A piece of tracked equipment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Equipment {
    pub id: RecordId,
    pub name: String,
    pub serial_number: String,
    #[serde(default)]
    pub department: String,
    /// Custodian
    #[serde(default)]
    pub employee: Option<String>,
    #[serde(default)]
    pub maintenance_team_id: Option<RecordId>,
    #[serde(default)]
    pub default_technician: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub warranty_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_scrapped: bool,
}

/// Payload for `POST /equipment/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewEquipment {
    pub name: String,
    pub serial_number: String,
    #[serde(default)]
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_team_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_technician: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_end_date: Option<NaiveDate>,
}

impl NewEquipment {
    pub fn new(name: impl Into<String>, serial_number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            serial_number: serial_number.into(),
            department: String::new(),
            employee: None,
            maintenance_team_id: None,
            default_technician: None,
            location: None,
            warranty_end_date: None,
        }
    }

    /// Builder method: set department
    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    /// Builder method: set owning team
    pub fn team(mut self, team_id: impl Into<RecordId>) -> Self {
        self.maintenance_team_id = Some(team_id.into());
        self
    }

    /// Builder method: set default technician
    pub fn default_technician(mut self, name: impl Into<String>) -> Self {
        self.default_technician = Some(name.into());
        self
    }

    /// Builder method: set location
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Attach an identifier, producing the stored record
    pub fn into_equipment(self, id: RecordId) -> Equipment {
        Equipment {
            id,
            name: self.name,
            serial_number: self.serial_number,
            department: self.department,
            employee: self.employee,
            maintenance_team_id: self.maintenance_team_id,
            default_technician: self.default_technician,
            location: self.location,
            warranty_end_date: self.warranty_end_date,
            is_scrapped: false,
        }
    }
}

/// A maintenance team and its technicians
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub id: RecordId,
    pub name: String,
    /// Technician display names
    #[serde(default)]
    pub members: Vec<String>,
}

impl Team {
    pub fn has_member(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }
}

/// Payload for `POST /teams/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTeam {
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

impl NewTeam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Builder method: add a technician
    pub fn member(mut self, name: impl Into<String>) -> Self {
        self.members.push(name.into());
        self
    }
}

/// Date-times as the API writes them
///
/// Accepts RFC 3339, naive ISO date-times and plain dates; writes naive
/// ISO date-times. Unparseable values are dropped rather than failing the
/// whole record.
pub mod flexible_datetime {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn parse(value: &str) -> Option<NaiveDateTime> {
        let value = value.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.naive_utc());
        }
        for format in [
            FORMAT,
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%dT%H:%M",
        ] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
                return Some(dt);
            }
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().filter(|s| !s.is_empty()).and_then(|s| {
            let parsed = parse(s);
            if parsed.is_none() {
                tracing::warn!(value = %s, "Ignoring unparseable date");
            }
            parsed
        }))
    }
}
