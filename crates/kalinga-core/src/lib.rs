//! kalinga-core
//!
//! Pure domain types and REST path conventions.
//! No HTTP or storage dependency: this is the shared vocabulary of the Kalinga system.

pub mod endpoints;
pub mod error;
pub mod models;
