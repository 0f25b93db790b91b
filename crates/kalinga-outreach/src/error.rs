use thiserror::Error;

use kalinga_core::error::CoreError;
use kalinga_forms::error::FormError;
use kalinga_forms::schema::{ValidationError, ValidationIssue};
use kalinga_gateway::error::GatewayError;

#[derive(Debug, Error)]
pub enum OutreachError {
    #[error("network error: {0}")]
    Network(String),

    #[error("{} field(s) need attention", .0.len())]
    Validation(Vec<ValidationError>),

    #[error("not found or out of date: {0}")]
    ConflictNotFound(String),

    #[error("session is no longer authorized")]
    Unauthorized,

    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("not allowed while {0}")]
    InvalidState(String),

    #[error("no form available for category: {0}")]
    NoFormAvailable(String),

    #[error(transparent)]
    Form(#[from] FormError),
}

impl OutreachError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// A single-field validation failure.
    pub(crate) fn invalid(field_id: &str, issue: ValidationIssue, message: impl Into<String>) -> Self {
        Self::Validation(vec![ValidationError {
            field_id: field_id.to_string(),
            issue,
            message: message.into(),
        }])
    }
}

impl From<GatewayError> for OutreachError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Network(msg) => Self::Network(msg),
            GatewayError::Decode(msg) => Self::Network(format!("malformed response: {msg}")),
            GatewayError::Unauthorized => Self::Unauthorized,
            GatewayError::NotFound(msg) | GatewayError::Conflict(msg) => Self::ConflictNotFound(msg),
            GatewayError::Rejected { status, message } => Self::Rejected { status, message },
        }
    }
}

impl From<CoreError> for OutreachError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::MissingField(field) => {
                Self::invalid(&field, ValidationIssue::Missing, format!("{field} is required"))
            }
            CoreError::InvalidWindow(msg) => Self::invalid("window", ValidationIssue::OutOfRange, msg),
            CoreError::UnknownCategory(label) => Self::NoFormAvailable(label),
            other => Self::invalid("input", ValidationIssue::WrongType, other.to_string()),
        }
    }
}
