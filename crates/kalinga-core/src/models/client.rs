use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::session::WorkerId;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClientId(pub u64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A resident registered with the health center.
///
/// Clients are never deleted; "removal" is a transition to `Inactive`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub philhealth_id: Option<String>,
    pub birth_date: Option<jiff::civil::Date>,
    pub sex: Option<Sex>,
    /// The enrolling worker. `None` for self-service intake submissions.
    pub worker_id: Option<WorkerId>,
    pub status: ClientStatus,
    pub condition: ClientCondition,
    pub position: Option<Position>,
    pub registered_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl Client {
    /// Case-insensitive substring match across name, address, phone and
    /// PhilHealth id. A blank term matches every client.
    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        let haystacks = [
            Some(self.name.as_str()),
            Some(self.address.as_str()),
            self.phone.as_deref(),
            self.philhealth_id.as_deref(),
        ];
        haystacks
            .into_iter()
            .flatten()
            .any(|h| h.to_lowercase().contains(&needle))
    }

    pub fn identity(&self) -> ClientIdentity {
        ClientIdentity {
            id: self.id,
            name: self.name.clone(),
            address: self.address.clone(),
        }
    }
}

/// The identity fields shown (read-only) at the top of every clinical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClientIdentity {
    pub id: ClientId,
    pub name: String,
    pub address: String,
}

/// Registration payload for a new client, from a worker or from public intake.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewClient {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub philhealth_id: Option<String>,
    #[serde(default)]
    pub birth_date: Option<jiff::civil::Date>,
    #[serde(default)]
    pub sex: Option<Sex>,
}

impl NewClient {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::MissingField("name".to_string()));
        }
        if self.address.trim().is_empty() {
            return Err(CoreError::MissingField("address".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ClientStatus {
    Pending,
    Active,
    Inactive,
}

impl ClientStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(CoreError::UnknownStatus(s.to_string())),
        }
    }
}

/// A lifecycle transition requested from one of the review queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum StatusTransition {
    /// Pending intake approved by an administrator.
    Activate,
    /// Active or pending client moved to the inactive list.
    Deactivate,
    /// Inactive client returned to the active list.
    Restore,
}

impl StatusTransition {
    /// The status reached by applying this transition to `from`, or `None`
    /// when the transition does not apply.
    pub fn apply(self, from: ClientStatus) -> Option<ClientStatus> {
        match (self, from) {
            (Self::Activate, ClientStatus::Pending) => Some(ClientStatus::Active),
            (Self::Deactivate, ClientStatus::Active | ClientStatus::Pending) => {
                Some(ClientStatus::Inactive)
            }
            (Self::Restore, ClientStatus::Inactive) => Some(ClientStatus::Active),
            _ => None,
        }
    }

    pub const fn target(self) -> ClientStatus {
        match self {
            Self::Activate | Self::Restore => ClientStatus::Active,
            Self::Deactivate => ClientStatus::Inactive,
        }
    }

    /// The transition that moves a client from `from` to `to`, if any.
    pub fn between(from: ClientStatus, to: ClientStatus) -> Option<Self> {
        [Self::Activate, Self::Deactivate, Self::Restore]
            .into_iter()
            .find(|t| t.apply(from) == Some(to))
    }
}

/// Body of `PUT /clients/{id}/status`.
///
/// `worker_id` assigns the client to a worker. It is accepted only when
/// activating pending intake, and required there when the client has no
/// enrolling worker yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatusUpdate {
    pub status: ClientStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub worker_id: Option<WorkerId>,
}

impl StatusUpdate {
    pub fn to(status: ClientStatus) -> Self {
        Self {
            status,
            worker_id: None,
        }
    }

    pub fn assigned(mut self, worker: WorkerId) -> Self {
        self.worker_id = Some(worker);
        self
    }
}

/// Body of `POST /update-client-condition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConditionUpdate {
    pub client_id: ClientId,
    pub condition: ClientCondition,
}

/// Query string of `GET /clients`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientListQuery {
    #[serde(rename = "workerId", default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ClientStatus>,
}

/// Query string of `GET /{category}/clients`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
}

/// Free-text residence condition tag kept on every client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ClientCondition {
    #[default]
    PermanentResidence,
    Temporary,
    Deceased,
    Transfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}
