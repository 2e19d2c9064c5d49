//! In-memory database
//!
//! Records are kept in insertion order so listings come back in the order
//! they were created.

use crate::model::{Equipment, MaintenanceRequest, RecordId, Team};

#[derive(Debug, Default)]
pub struct Database {
    pub teams: Vec<Team>,
    pub equipment: Vec<Equipment>,
    pub requests: Vec<MaintenanceRequest>,
}

impl Database {
    pub fn team(&self, id: &RecordId) -> Option<&Team> {
        self.teams.iter().find(|t| &t.id == id)
    }

    pub fn equipment(&self, id: &RecordId) -> Option<&Equipment> {
        self.equipment.iter().find(|e| &e.id == id)
    }

    pub fn equipment_mut(&mut self, id: &RecordId) -> Option<&mut Equipment> {
        self.equipment.iter_mut().find(|e| &e.id == id)
    }

    pub fn request_mut(&mut self, id: &RecordId) -> Option<&mut MaintenanceRequest> {
        self.requests.iter_mut().find(|r| &r.id == id)
    }
}
