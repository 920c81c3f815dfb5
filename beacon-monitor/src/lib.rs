//! Beacon Monitor
//!
//! Keeps a client-side view of long-running jobs across every server
//! instance the current user can reach, and works out per job whether the
//! user may cancel it.
//!
//! Architecture:
//! - Configuration: polling cadences and server connection
//! - Repository: server access behind a trait
//! - Scheduler: loop tokens, cadence and the pass driver
//! - Services: accessibility, reconciliation, authorization, commands
//!
//! The monitor runs a self-scheduling reconciliation loop. Restarting the
//! loop mints a new token; passes carrying an older token drop their
//! results at their next resumption.

pub mod config;
pub mod error;
pub mod monitor;
pub mod repository;
pub mod scheduler;
pub mod service;
pub mod table;

#[cfg(test)]
mod testing;

pub use config::MonitorConfig;
pub use error::{ErrorKind, LoggedError, MonitorError};
pub use monitor::{JobMonitor, MonitorEvent};
pub use repository::{HttpServerRepository, ServerRepository};
