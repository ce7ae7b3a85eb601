//! Integration test utilities for the chat client core
//!
//! This crate wires the services to the in-memory collaborators so that
//! several participants can share one store, the way separate devices
//! share one realtime backend.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
