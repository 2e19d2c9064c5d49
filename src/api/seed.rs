//! Demo data for local development

use chrono::Local;

use super::db::Database;
use super::error::ApiResult;
use super::service;
use crate::model::{NewEquipment, NewMaintenanceRequest, NewTeam};

/// Load two teams, two machines and one open request
///
/// Skipped when the database already holds teams.
pub fn seed_demo_data(db: &mut Database) -> ApiResult<()> {
    if !db.teams.is_empty() {
        tracing::info!("Data already exists, skipping seed");
        return Ok(());
    }

    let mechanics = service::create_team(db, NewTeam::new("Heavy Mechanics").member("Bob Fixit"))?;
    let it_support = service::create_team(db, NewTeam::new("IT Support").member("Charlie Spark"))?;

    let generator = service::create_equipment(
        db,
        NewEquipment::new("Generator X500", "GEN-2024-001")
            .department("Heavy Machinery")
            .location("Warehouse A")
            .team(mechanics.id.clone())
            .default_technician("Bob Fixit"),
    )?;

    service::create_equipment(
        db,
        NewEquipment::new("Dell Server Rack", "SRV-2024-999")
            .department("Computers")
            .location("Server Room")
            .team(it_support.id.clone())
            .default_technician("Charlie Spark"),
    )?;

    service::create_request(
        db,
        NewMaintenanceRequest::new("Oil Leak Detected", generator.id, "corrective")
            .scheduled(Local::now().naive_local()),
    )?;

    tracing::info!(
        teams = db.teams.len(),
        equipment = db.equipment.len(),
        requests = db.requests.len(),
        "Seeded demo data"
    );
    Ok(())
}
