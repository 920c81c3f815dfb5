//! Beacon Core
//!
//! Core types shared by the Beacon job monitor and its HTTP client.
//!
//! This crate contains:
//! - Domain types: Jobs, instances, users and their right scopes
//! - DTOs: Wire shapes that only exist on the transport boundary

pub mod domain;
pub mod dto;
