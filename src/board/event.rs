//! Board events and move decisions
//!
//! Drag-and-drop arrives as a [`CardMoved`] message. [`decide`] is the single
//! place that chooses between ignoring it, asking for confirmation, or
//! committing straight away.

use serde::Serialize;

use super::view::ConfirmationPrompt;
use crate::model::{RecordId, RequestStatus};

/// A card was dropped on a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardMoved {
    pub id: RecordId,
    /// Status the card carried when it was picked up
    pub from: RequestStatus,
    /// Status of the column it was dropped on
    pub to: RequestStatus,
}

impl CardMoved {
    pub fn new(id: impl Into<RecordId>, from: RequestStatus, to: RequestStatus) -> Self {
        Self {
            id: id.into(),
            from,
            to,
        }
    }
}

/// Input to [`StatusBoard::dispatch`](super::StatusBoard::dispatch)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    CardMoved(CardMoved),
    /// User accepted the confirmation prompt
    ConfirmPending,
    /// User dismissed the confirmation prompt
    CancelPending,
}

/// A move waiting on user confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingMove {
    pub id: RecordId,
    pub to: RequestStatus,
}

/// What to do with a drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Same column; nothing happens
    Ignore,
    /// Hold the move until the user confirms
    Confirm(PendingMove),
    /// Apply optimistically and send to the API
    Commit(PendingMove),
}

/// Decide how a drop is handled
pub fn decide(moved: &CardMoved) -> Decision {
    if moved.from == moved.to {
        return Decision::Ignore;
    }

    let pending = PendingMove {
        id: moved.id.clone(),
        to: moved.to,
    };

    if moved.to.requires_confirmation() {
        Decision::Confirm(pending)
    } else {
        Decision::Commit(pending)
    }
}

/// Result of handling one board event
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// Dropped on its own column
    Unchanged,
    /// Waiting for the user; nothing changed yet
    AwaitingConfirmation(ConfirmationPrompt),
    /// Confirmation dismissed; nothing changed
    Cancelled(PendingMove),
    /// Confirm/cancel arrived with no move waiting
    NothingPending,
    /// Optimistic update confirmed by the API
    Committed { id: RecordId, status: RequestStatus },
    /// API rejected the move; the list was reloaded from the server
    Reverted {
        id: RecordId,
        status: RequestStatus,
        error: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_column_is_ignored() {
        for status in RequestStatus::all() {
            let moved = CardMoved::new("r1", *status, *status);
            assert_eq!(decide(&moved), Decision::Ignore);
        }
    }

    #[test]
    fn test_scrap_needs_confirmation() {
        let moved = CardMoved::new("r2", RequestStatus::InProgress, RequestStatus::Scrap);
        assert_eq!(
            decide(&moved),
            Decision::Confirm(PendingMove {
                id: "r2".into(),
                to: RequestStatus::Scrap
            })
        );
    }

    #[test]
    fn test_other_moves_commit() {
        let moved = CardMoved::new("r1", RequestStatus::New, RequestStatus::InProgress);
        assert!(matches!(decide(&moved), Decision::Commit(_)));

        // Leaving scrap is not special-cased
        let moved = CardMoved::new("r1", RequestStatus::Scrap, RequestStatus::New);
        assert!(matches!(decide(&moved), Decision::Commit(_)));
    }
}
