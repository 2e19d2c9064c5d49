//! Status Board
//!
//! Owns the request cache for the board view and mediates status moves:
//!
//! 1. A drop becomes a [`CardMoved`] event
//! 2. [`decide`] picks ignore / confirm / commit
//! 3. Commits update the cache first, then ask the API
//! 4. A rejected commit reloads the whole list from the API
//!
//! The cache is shared behind `Arc<RwLock<_>>`, so a board handle can be
//! cloned into spawned tasks and several moves may be in flight at once.

use chrono::{Local, NaiveDateTime};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use super::event::{decide, BoardEvent, CardMoved, Decision, MoveOutcome, PendingMove};
use super::store::RequestStore;
use super::view::{self, Column, ConfirmationPrompt};
use crate::client::{ClientResult, MaintenanceApi};
use crate::model::{MaintenanceRequest, NewMaintenanceRequest, RecordId, RequestStatus};

/// Kanban view over the maintenance requests
pub struct StatusBoard<A: ?Sized> {
    api: Arc<A>,
    store: Arc<RwLock<RequestStore>>,
    pending: Arc<Mutex<Option<PendingMove>>>,
}

impl<A: ?Sized> Clone for StatusBoard<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            store: Arc::clone(&self.store),
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<A: MaintenanceApi + ?Sized> StatusBoard<A> {
    /// Create a board with an empty cache
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            store: Arc::new(RwLock::new(RequestStore::new())),
            pending: Arc::new(Mutex::new(None)),
        }
    }

    /// Fetch every request and replace the cache
    ///
    /// On failure the error is logged and the previous cache stays as it was.
    pub async fn load(&self) -> ClientResult<usize> {
        match self.api.fetch_requests().await {
            Ok(requests) => {
                let count = requests.len();
                self.store.write().await.replace_all(requests);
                tracing::debug!(count, "Loaded maintenance requests");
                Ok(count)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load maintenance requests");
                Err(e)
            }
        }
    }

    /// Columns as of now
    pub async fn columns(&self) -> Vec<Column> {
        self.columns_at(Local::now().naive_local()).await
    }

    /// Columns with overdue flags computed against `now`
    pub async fn columns_at(&self, now: NaiveDateTime) -> Vec<Column> {
        view::columns(&*self.store.read().await, now)
    }

    /// Copy of the cached requests
    pub async fn snapshot(&self) -> Vec<MaintenanceRequest> {
        self.store.read().await.requests().to_vec()
    }

    pub async fn get(&self, id: &RecordId) -> Option<MaintenanceRequest> {
        self.store.read().await.get(id).cloned()
    }

    /// Move currently waiting on confirmation, if any
    pub async fn pending(&self) -> Option<PendingMove> {
        self.pending.lock().await.clone()
    }

    /// Feed one event into the board
    pub async fn dispatch(&self, event: BoardEvent) -> MoveOutcome {
        match event {
            BoardEvent::CardMoved(moved) => self.card_moved(moved).await,
            BoardEvent::ConfirmPending => self.confirm_pending().await,
            BoardEvent::CancelPending => self.cancel_pending().await,
        }
    }

    /// Begin a move after a drop
    pub async fn card_moved(&self, moved: CardMoved) -> MoveOutcome {
        match decide(&moved) {
            Decision::Ignore => MoveOutcome::Unchanged,
            Decision::Confirm(pending) => {
                tracing::debug!(
                    request_id = %pending.id,
                    to = %pending.to,
                    "Move awaiting confirmation"
                );
                *self.pending.lock().await = Some(pending.clone());
                MoveOutcome::AwaitingConfirmation(ConfirmationPrompt::for_move(pending))
            }
            Decision::Commit(pending) => self.commit_move(pending.id, pending.to).await,
        }
    }

    /// User accepted the prompt: commit the held move
    pub async fn confirm_pending(&self) -> MoveOutcome {
        let pending = self.pending.lock().await.take();
        match pending {
            Some(pending) => self.commit_move(pending.id, pending.to).await,
            None => MoveOutcome::NothingPending,
        }
    }

    /// User dismissed the prompt: forget the held move
    pub async fn cancel_pending(&self) -> MoveOutcome {
        match self.pending.lock().await.take() {
            Some(pending) => {
                tracing::debug!(request_id = %pending.id, "Move cancelled");
                MoveOutcome::Cancelled(pending)
            }
            None => MoveOutcome::NothingPending,
        }
    }

    /// Apply a move locally, then confirm it with the API
    ///
    /// The cache is updated before the request goes out. If the API rejects
    /// the change the full list is reloaded.
    pub async fn commit_move(&self, id: RecordId, status: RequestStatus) -> MoveOutcome {
        let previous = self.store.write().await.apply_status(&id, status);
        if previous.is_none() {
            tracing::warn!(request_id = %id, "Moving a request that is not in the cache");
        }

        match self.api.update_request_state(&id, status).await {
            Ok(_) => {
                tracing::info!(request_id = %id, status = %status, "Request status updated");
                MoveOutcome::Committed { id, status }
            }
            Err(e) => {
                tracing::warn!(
                    request_id = %id,
                    status = %status,
                    error = %e,
                    "Failed to update status, reloading requests"
                );
                // Load logs its own failure; the cache is left as-is then.
                let _ = self.load().await;
                MoveOutcome::Reverted {
                    id,
                    status,
                    error: e.to_string(),
                }
            }
        }
    }

    /// Create a request and add the server's record to the cache
    pub async fn create_request(
        &self,
        request: &NewMaintenanceRequest,
    ) -> ClientResult<MaintenanceRequest> {
        let created = self.api.create_request(request).await?;
        self.store.write().await.append(created.clone());
        tracing::info!(request_id = %created.id, "Maintenance request created");
        Ok(created)
    }
}
