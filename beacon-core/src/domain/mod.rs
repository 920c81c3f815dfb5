//! Domain types
//!
//! Structures returned by the game-server management API. Shared between
//! the client (deserializes) and the monitor (reconciles).

pub mod instance;
pub mod job;
pub mod rights;
pub mod user;
