//! Data transfer objects
//!
//! Shapes used only on the wire between the server and the client.

pub mod error;
