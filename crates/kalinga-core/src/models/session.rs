use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WorkerId(pub u64);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    Admin,
    Worker,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Worker => "worker",
        }
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "worker" => Ok(Self::Worker),
            _ => Err(CoreError::UnknownRole(s.to_string())),
        }
    }
}

/// The signed-in identity, established at login and passed explicitly to
/// every component that scopes data by worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Session {
    pub worker_id: WorkerId,
    pub role: Role,
}

impl Session {
    pub fn worker(worker_id: WorkerId) -> Self {
        Self {
            worker_id,
            role: Role::Worker,
        }
    }

    pub fn admin(worker_id: WorkerId) -> Self {
        Self {
            worker_id,
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Worker filter applied to list and statistics queries.
    /// Administrators see every worker's clients.
    pub fn worker_scope(&self) -> Option<WorkerId> {
        match self.role {
            Role::Admin => None,
            Role::Worker => Some(self.worker_id),
        }
    }
}
