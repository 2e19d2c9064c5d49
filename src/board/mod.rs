//! Maintenance Request Board
//!
//! Kanban-style status board over the maintenance requests.
//!
//! ## Architecture
//!
//! - **RequestStore**: cached request list for the view
//! - **StatusBoard**: load, move, confirm, reload-on-failure
//! - **Events**: `CardMoved` messages and the `decide` reducer
//! - **Views**: columns and cards derived from the store
//!
//! ## Move flow
//!
//! 1. A card dropped on another column produces `CardMoved`
//! 2. `scrap` drops are held until the user confirms
//! 3. Everything else is applied to the cache, then sent to the API
//! 4. A failed API call reloads the list from the server

#[allow(clippy::module_inception)]
mod board;
mod event;
mod store;
mod view;

pub use board::StatusBoard;
pub use event::{decide, BoardEvent, CardMoved, Decision, MoveOutcome, PendingMove};
pub use store::RequestStore;
pub use view::{columns, render_text, CardView, Column, ConfirmationPrompt, EMPTY_COLUMN, NO_DATE};
