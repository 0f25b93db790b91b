//! kalinga-outreach
//!
//! The field worker's side of program enrollment: deciding whether a visit
//! creates a new record or resumes an existing one, editing a clinical form,
//! working the client lists and loading the program dashboard. Every
//! operation takes the signed-in [`Session`] and a [`RecordGateway`]
//! explicitly.
//!
//! [`Session`]: kalinga_core::models::session::Session
//! [`RecordGateway`]: kalinga_gateway::RecordGateway

pub mod aggregation;
pub mod directory;
pub mod error;
pub mod form;
pub mod reconcile;

pub use error::OutreachError;
