use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::category::Category;
use super::client::ClientId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Clinical form values keyed by field id.
pub type FieldValues = BTreeMap<String, serde_json::Value>;

/// One clinical data submission for a (client, category) pair.
///
/// A client accumulates several of these per category, one per visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VisitRecord {
    pub id: RecordId,
    pub client_id: ClientId,
    pub category: Category,
    pub values: FieldValues,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

/// Body of `POST /{category}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewVisitRecord {
    pub client_id: ClientId,
    pub values: FieldValues,
}

/// Body of `PUT /{category}/{record_id}`.
///
/// Only the keys present are written; every other stored key is left as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VisitRecordUpdate {
    pub values: FieldValues,
}
