//! Domain model
//!
//! Records exchanged with the maintenance API. Statuses are normalized to the
//! closed [`RequestStatus`] set as records are deserialized.

mod status;
mod types;

pub use status::{InvalidStatus, RequestStatus};
pub use types::{
    flexible_datetime, Equipment, MaintenanceRequest, NewEquipment, NewMaintenanceRequest,
    NewTeam, RecordId, Team,
};
