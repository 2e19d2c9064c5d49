//! API Routes
//!
//! Route handlers organized by resource.

pub mod equipment;
pub mod health;
pub mod requests;
pub mod teams;
