//! Service layer
//!
//! The monitor's behavior, split by concern. Each module extends
//! [`JobMonitor`](crate::JobMonitor) with the operations it owns:
//! - `access`: which instances the user may query
//! - `reconcile`: one pass of the polling loop
//! - `authorization`: cancel permission resolution
//! - `commands`: user-initiated cancel or clear

mod access;
mod authorization;
mod commands;
mod reconcile;

pub use authorization::CancelAuthorizer;
pub use reconcile::PassOutcome;
