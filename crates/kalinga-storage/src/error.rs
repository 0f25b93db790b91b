use thiserror::Error;

use kalinga_core::error::CoreError;
use kalinga_core::models::category::Category;
use kalinga_core::models::client::{ClientId, ClientStatus};
use kalinga_core::models::visit_record::RecordId;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("client not found: {0}")]
    ClientNotFound(ClientId),

    #[error("{category} record not found: {id}")]
    RecordNotFound { category: Category, id: RecordId },

    #[error("client {client} cannot move from {from} to {to}")]
    InvalidTransition {
        client: ClientId,
        from: ClientStatus,
        to: ClientStatus,
    },

    #[error("coordinates out of range: {latitude}, {longitude}")]
    InvalidPosition { latitude: f64, longitude: f64 },

    #[error(transparent)]
    Invalid(#[from] CoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),
}
