use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::category::Category;
use super::client::ClientId;
use super::session::WorkerId;

/// Membership of a client in one program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Enrollment {
    pub client_id: ClientId,
    pub category: Category,
    pub worker_id: Option<WorkerId>,
    pub enrolled_at: jiff::Timestamp,
}

/// Body of `POST /{category}/clients`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EnrollRequest {
    pub client_id: ClientId,
}
