//! Request rules
//!
//! Creation of maintenance requests:
//! 1. Equipment must exist and not be scrapped
//! 2. Team and technician are filled in from the equipment when missing
//! 3. The team must exist and the technician must belong to it
//! 4. Preventive requests need a scheduled date
//!
//! Moving a request to `scrap` also marks its equipment as scrapped.

use chrono::Local;

use super::db::Database;
use super::error::{ApiError, ApiResult};
use crate::model::{
    Equipment, MaintenanceRequest, NewEquipment, NewMaintenanceRequest, NewTeam, RecordId,
    RequestStatus, Team,
};

const REQUEST_TYPES: &[&str] = &["corrective", "preventive"];

pub fn create_team(db: &mut Database, data: NewTeam) -> ApiResult<Team> {
    if data.name.trim().is_empty() {
        return Err(ApiError::Validation("Team name cannot be empty".to_string()));
    }

    let team = Team {
        id: RecordId::generate(),
        name: data.name,
        members: data.members,
    };
    db.teams.push(team.clone());
    Ok(team)
}

pub fn create_equipment(db: &mut Database, data: NewEquipment) -> ApiResult<Equipment> {
    if data.name.trim().is_empty() {
        return Err(ApiError::Validation("Equipment name cannot be empty".to_string()));
    }

    let equipment = data.into_equipment(RecordId::generate());
    db.equipment.push(equipment.clone());
    Ok(equipment)
}

pub fn create_request(
    db: &mut Database,
    mut data: NewMaintenanceRequest,
) -> ApiResult<MaintenanceRequest> {
    let equipment = db
        .equipment(&data.equipment_id)
        .ok_or_else(|| ApiError::NotFound("Equipment not found".to_string()))?;

    if equipment.is_scrapped {
        return Err(ApiError::Validation(
            "Cannot create request for scrapped equipment".to_string(),
        ));
    }

    if data.maintenance_team_id.is_none() {
        data.maintenance_team_id = equipment.maintenance_team_id.clone();
    }
    if data.technician.is_none() {
        data.technician = equipment.default_technician.clone();
    }

    let team = data
        .maintenance_team_id
        .as_ref()
        .and_then(|id| db.team(id))
        .ok_or_else(|| ApiError::NotFound("Maintenance Team not found".to_string()))?;

    if let Some(technician) = &data.technician {
        if !team.has_member(technician) {
            return Err(ApiError::Validation(format!(
                "Technician '{}' is not in team '{}'",
                technician, team.name
            )));
        }
    }

    let request_type = data.request_type.trim().to_ascii_lowercase();
    if !REQUEST_TYPES.contains(&request_type.as_str()) {
        return Err(ApiError::Validation(format!(
            "Unknown request type '{}'",
            data.request_type
        )));
    }

    if request_type == "preventive" && data.scheduled_date.is_none() {
        return Err(ApiError::Validation(
            "Preventive requests must have a Scheduled Date".to_string(),
        ));
    }

    let request = MaintenanceRequest {
        id: RecordId::generate(),
        subject: data.subject,
        equipment_id: data.equipment_id,
        status: RequestStatus::New,
        request_type,
        scheduled_date: data.scheduled_date,
        technician: data.technician,
        maintenance_team_id: data.maintenance_team_id,
        duration: data.duration,
        created_at: Some(Local::now().naive_local()),
    };

    db.requests.push(request.clone());
    tracing::info!(request_id = %request.id, "Created maintenance request");
    Ok(request)
}

pub fn change_state(
    db: &mut Database,
    id: &RecordId,
    status: RequestStatus,
) -> ApiResult<MaintenanceRequest> {
    let request = db
        .request_mut(id)
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;

    request.status = status;
    let updated = request.clone();

    if status == RequestStatus::Scrap {
        if let Some(equipment) = db.equipment_mut(&updated.equipment_id) {
            equipment.is_scrapped = true;
            tracing::info!(equipment_id = %equipment.id, "Equipment scrapped");
        }
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn seeded() -> (Database, RecordId, RecordId) {
        let mut db = Database::default();
        let team = create_team(
            &mut db,
            NewTeam::new("Heavy Mechanics").member("Bob Fixit"),
        )
        .unwrap();
        let equipment = create_equipment(
            &mut db,
            NewEquipment::new("Generator X500", "GEN-2024-001")
                .team(team.id.clone())
                .default_technician("Bob Fixit"),
        )
        .unwrap();
        (db, team.id, equipment.id)
    }

    #[test]
    fn test_auto_fill_from_equipment() {
        let (mut db, team_id, equipment_id) = seeded();

        let req = create_request(
            &mut db,
            NewMaintenanceRequest::new("Oil leak", equipment_id, "Corrective"),
        )
        .unwrap();

        assert_eq!(req.maintenance_team_id, Some(team_id));
        assert_eq!(req.technician.as_deref(), Some("Bob Fixit"));
        assert_eq!(req.status, RequestStatus::New);
        assert_eq!(req.request_type, "corrective");
        assert_eq!(db.requests.len(), 1);
    }

    #[test]
    fn test_unknown_equipment() {
        let (mut db, _, _) = seeded();
        let err = create_request(
            &mut db,
            NewMaintenanceRequest::new("Leak", "missing", "corrective"),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_technician_must_be_in_team() {
        let (mut db, _, equipment_id) = seeded();
        let err = create_request(
            &mut db,
            NewMaintenanceRequest::new("Leak", equipment_id, "corrective").technician("Eve"),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Technician 'Eve' is not in team 'Heavy Mechanics'");
    }

    #[test]
    fn test_preventive_needs_date() {
        let (mut db, _, equipment_id) = seeded();
        let err = create_request(
            &mut db,
            NewMaintenanceRequest::new("Service", equipment_id.clone(), "preventive"),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let when = NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let req = create_request(
            &mut db,
            NewMaintenanceRequest::new("Service", equipment_id, "preventive").scheduled(when),
        )
        .unwrap();
        assert_eq!(req.scheduled_date, Some(when));
    }

    #[test]
    fn test_unknown_request_type() {
        let (mut db, _, equipment_id) = seeded();
        let err = create_request(
            &mut db,
            NewMaintenanceRequest::new("Leak", equipment_id, "cosmetic"),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_equipment_without_team() {
        let mut db = Database::default();
        let equipment =
            create_equipment(&mut db, NewEquipment::new("Drill", "DR-1")).unwrap();
        let err = create_request(
            &mut db,
            NewMaintenanceRequest::new("Dull bit", equipment.id, "corrective"),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Maintenance Team not found");
    }

    #[test]
    fn test_scrap_marks_equipment_and_blocks_new_requests() {
        let (mut db, _, equipment_id) = seeded();
        let req = create_request(
            &mut db,
            NewMaintenanceRequest::new("Seized", equipment_id.clone(), "corrective"),
        )
        .unwrap();

        let updated = change_state(&mut db, &req.id, RequestStatus::Scrap).unwrap();
        assert_eq!(updated.status, RequestStatus::Scrap);
        assert!(db.equipment(&equipment_id).unwrap().is_scrapped);

        let err = create_request(
            &mut db,
            NewMaintenanceRequest::new("Again", equipment_id, "corrective"),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Cannot create request for scrapped equipment");
    }

    #[test]
    fn test_change_state_unknown_request() {
        let (mut db, _, _) = seeded();
        let err = change_state(&mut db, &"nope".into(), RequestStatus::Repaired).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
