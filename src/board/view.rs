//! Board views
//!
//! What a renderer gets: one [`Column`] per status in board order, each
//! holding [`CardView`]s. Built fresh from the store on every read.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt::Write as _;

use super::event::PendingMove;
use super::store::RequestStore;
use crate::model::{MaintenanceRequest, RecordId, RequestStatus};

/// Placeholder shown in an empty column
pub const EMPTY_COLUMN: &str = "No items";

/// Label for cards without a scheduled date
pub const NO_DATE: &str = "No Date";

/// One status column
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Column {
    pub status: RequestStatus,
    pub title: &'static str,
    pub cards: Vec<CardView>,
}

impl Column {
    pub fn count(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// One draggable card
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CardView {
    pub id: RecordId,
    /// Current status, carried along when the card is dragged
    pub status: RequestStatus,
    pub subject: String,
    pub request_type: String,
    pub equipment_label: String,
    pub scheduled_label: String,
    pub overdue: bool,
    pub technician: Option<String>,
    /// First letter of the technician's name, for the avatar
    pub technician_initial: Option<char>,
}

impl CardView {
    pub fn from_request(request: &MaintenanceRequest, now: NaiveDateTime) -> Self {
        let technician = request.technician.clone().filter(|t| !t.is_empty());
        Self {
            id: request.id.clone(),
            status: request.status,
            subject: request.subject.clone(),
            request_type: request.request_type.clone(),
            equipment_label: format!("Equip ID: {}", request.equipment_id),
            scheduled_label: request
                .scheduled_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| NO_DATE.to_string()),
            overdue: request.is_overdue(now),
            technician_initial: technician.as_ref().and_then(|t| t.chars().next()),
            technician,
        }
    }
}

/// Partition the store into board columns
pub fn columns(store: &RequestStore, now: NaiveDateTime) -> Vec<Column> {
    RequestStatus::all()
        .iter()
        .map(|status| Column {
            status: *status,
            title: status.title(),
            cards: store
                .in_status(*status)
                .map(|r| CardView::from_request(r, now))
                .collect(),
        })
        .collect()
}

/// Content of the scrap confirmation dialog
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConfirmationPrompt {
    pub title: &'static str,
    pub description: &'static str,
    pub confirm_label: &'static str,
    pub cancel_label: &'static str,
    pub pending: PendingMove,
}

impl ConfirmationPrompt {
    pub fn for_move(pending: PendingMove) -> Self {
        Self {
            title: "Confirm Scrap Status",
            description: "Are you sure you want to mark this equipment as scrap? \
                          This action indicates the equipment cannot be repaired \
                          and should be disposed of.",
            confirm_label: "Mark as Scrap",
            cancel_label: "Cancel",
            pending,
        }
    }
}

/// Plain text rendering, one block per column
pub fn render_text(columns: &[Column]) -> String {
    let mut out = String::new();

    for column in columns {
        let _ = writeln!(out, "{} ({})", column.title, column.count());
        let _ = writeln!(out, "{}", "-".repeat(40));

        if column.is_empty() {
            let _ = writeln!(out, "  {}", EMPTY_COLUMN);
        }

        for card in &column.cards {
            let _ = writeln!(out, "  [{}] {}  <{}>", card.id, card.subject, card.request_type);
            let overdue = if card.overdue { "  OVERDUE" } else { "" };
            let _ = writeln!(
                out,
                "      {}  |  {}{}",
                card.equipment_label, card.scheduled_label, overdue
            );
            if let (Some(tech), Some(initial)) = (&card.technician, card.technician_initial) {
                let _ = writeln!(out, "      ({}) {}", initial, tech);
            }
        }

        out.push('\n');
    }

    out
}
