//! kalinga-field library root.
//!
//! The field worker's terminal client: configuration, per-session state and
//! the command language, exposed so integration tests can drive them without
//! a terminal.

pub mod commands;
pub mod config;
pub mod state;
