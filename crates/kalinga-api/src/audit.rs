use serde::Serialize;
use tracing::info;

use kalinga_core::models::session::Session;

/// A structured audit event for a write to the record store.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    /// `None` for public intake submissions.
    pub worker_id: Option<u64>,
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(
        action: impl Into<String>,
        resource_type: impl Into<String>,
        resource_id: impl ToString,
        session: Option<&Session>,
    ) -> Self {
        Self {
            action: action.into(),
            resource_type: resource_type.into(),
            resource_id: resource_id.to_string(),
            worker_id: session.map(|s| s.worker_id.0),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn emit(&self) {
        let details = self.details.as_ref().map(|d| d.to_string());
        info!(
            audit.action = %self.action,
            audit.resource_type = %self.resource_type,
            audit.resource_id = %self.resource_id,
            audit.worker_id = ?self.worker_id,
            audit.details = details.as_deref(),
            "audit event"
        );
    }
}
