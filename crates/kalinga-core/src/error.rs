use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("unknown client status: {0}")]
    UnknownStatus(String),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid time window: {0}")]
    InvalidWindow(String),
}
