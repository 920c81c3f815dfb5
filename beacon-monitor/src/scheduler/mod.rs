//! Scheduler layer
//!
//! Owns the identity of the authoritative reconciliation loop and decides
//! how long to wait between passes. Passes are driven by the poller, which
//! re-validates its loop token after every suspension point.

mod cadence;
mod poller;
mod token;

pub use cadence::Cadence;
pub use token::{LoopToken, TokenSource};
