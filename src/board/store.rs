//! Request Store
//!
//! In-memory copy of the maintenance requests shown on the board. Column
//! membership is never stored here; it is derived from each record's status.

use crate::model::{MaintenanceRequest, RecordId, RequestStatus};

/// Cached maintenance requests for the active view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestStore {
    requests: Vec<MaintenanceRequest>,
}

impl RequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole cache with a fresh server listing
    pub fn replace_all(&mut self, requests: Vec<MaintenanceRequest>) {
        self.requests = requests;
    }

    /// Set the status of one request, leaving every other field alone
    ///
    /// Returns the previous status, or `None` if the id is not cached.
    pub fn apply_status(&mut self, id: &RecordId, status: RequestStatus) -> Option<RequestStatus> {
        self.requests
            .iter_mut()
            .find(|r| &r.id == id)
            .map(|r| std::mem::replace(&mut r.status, status))
    }

    /// Add a newly created request to the end of the list
    pub fn append(&mut self, request: MaintenanceRequest) {
        self.requests.push(request);
    }

    pub fn get(&self, id: &RecordId) -> Option<&MaintenanceRequest> {
        self.requests.iter().find(|r| &r.id == id)
    }

    pub fn requests(&self) -> &[MaintenanceRequest] {
        &self.requests
    }

    /// Requests currently in one status column, in list order
    pub fn in_status(&self, status: RequestStatus) -> impl Iterator<Item = &MaintenanceRequest> {
        self.requests.iter().filter(move |r| r.status == status)
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(id: &str, state: &str) -> MaintenanceRequest {
        serde_json::from_value(json!({
            "id": id,
            "subject": format!("Subject {}", id),
            "equipment_id": "eq-1",
            "request_type": "corrective",
            "technician": "Bob Fixit",
            "state": state,
        }))
        .unwrap()
    }

    #[test]
    fn test_apply_status_touches_only_status() {
        let mut store = RequestStore::new();
        store.replace_all(vec![request("r1", "new"), request("r2", "repaired")]);
        let before = store.get(&"r1".into()).cloned().unwrap();

        let previous = store.apply_status(&"r1".into(), RequestStatus::InProgress);
        assert_eq!(previous, Some(RequestStatus::New));

        let after = store.get(&"r1".into()).unwrap();
        assert_eq!(after.status, RequestStatus::InProgress);
        assert_eq!(after.subject, before.subject);
        assert_eq!(after.technician, before.technician);
        assert_eq!(after.equipment_id, before.equipment_id);
        assert_eq!(store.get(&"r2".into()).unwrap().status, RequestStatus::Repaired);
    }

    #[test]
    fn test_apply_status_unknown_id() {
        let mut store = RequestStore::new();
        store.replace_all(vec![request("r1", "new")]);
        let snapshot = store.clone();

        assert_eq!(store.apply_status(&"nope".into(), RequestStatus::Scrap), None);
        assert_eq!(store, snapshot);
    }

    #[test]
    fn test_each_request_in_exactly_one_status() {
        let mut store = RequestStore::new();
        store.replace_all(vec![
            request("r1", "new"),
            request("r2", "in_progress"),
            request("r3", "weird"),
            request("r4", "scrap"),
        ]);

        let total: usize = RequestStatus::all()
            .iter()
            .map(|s| store.in_status(*s).count())
            .sum();
        assert_eq!(total, store.len());

        let new_ids: Vec<_> = store
            .in_status(RequestStatus::New)
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(new_ids, vec!["r1", "r3"]);
    }

    #[test]
    fn test_append_and_replace() {
        let mut store = RequestStore::new();
        assert!(store.is_empty());

        store.append(request("r1", "new"));
        assert_eq!(store.len(), 1);

        store.replace_all(vec![request("r2", "new"), request("r3", "new")]);
        assert_eq!(store.len(), 2);
        assert!(store.get(&"r1".into()).is_none());
    }
}
