//! kalinga-storage
//!
//! The record store behind the REST endpoints: clients, program
//! enrollments and visit records held in memory, with JSON snapshot
//! persistence and the read-only statistics projections.

pub mod error;
pub mod state;
pub mod stats;
pub mod store;
