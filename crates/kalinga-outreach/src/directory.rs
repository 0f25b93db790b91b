//! Client lists: a program's roster and the three lifecycle queues.
//!
//! Lists are fetched whole and searched in memory. A status change removes
//! the client from the queue it was shown in only once the record store has
//! confirmed it; the other queues pick the change up on their next fetch.

use kalinga_core::models::category::Category;
use kalinga_core::models::client::{
    Client, ClientCondition, ClientId, ClientListQuery, ClientStatus, ConditionUpdate, NewClient,
    Position, RosterQuery, StatusTransition, StatusUpdate,
};
use kalinga_core::models::enrollment::Enrollment;
use kalinga_core::models::session::{Session, WorkerId};
use kalinga_forms::schema::ValidationIssue;
use kalinga_gateway::RecordGateway;

use crate::error::OutreachError;

fn search<'a>(clients: &'a [Client], term: &str) -> Vec<&'a Client> {
    clients.iter().filter(|c| c.matches_search(term)).collect()
}

/// Active clients enrolled in one program.
#[derive(Debug)]
pub struct CategoryRoster {
    category: Category,
    clients: Vec<Client>,
    loaded: bool,
}

impl CategoryRoster {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            clients: Vec::new(),
            loaded: false,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    /// Workers get their own clients; administrators get everyone's.
    pub async fn fetch(&mut self, gateway: &dyn RecordGateway, session: Session) -> Result<(), OutreachError> {
        let query = RosterQuery {
            worker_id: session.worker_scope().map(|w| w.0),
            category_name: Some(self.category.label().to_string()),
        };
        match gateway.category_roster(session, self.category, query).await {
            Ok(clients) => {
                self.clients = clients;
                self.loaded = true;
                Ok(())
            }
            Err(e) => {
                let err = OutreachError::from(e);
                if err.is_unauthorized() {
                    self.clear();
                }
                Err(err)
            }
        }
    }

    /// Case-insensitive substring search over name, address, phone and
    /// PhilHealth id. A blank term returns everyone.
    pub fn search(&self, term: &str) -> Vec<&Client> {
        search(&self.clients, term)
    }

    pub fn clear(&mut self) {
        self.clients.clear();
        self.loaded = false;
    }
}

/// Where a queue is in its fetch / mutate cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueuePhase {
    /// Nothing fetched yet.
    Empty,
    /// Showing what the last fetch returned.
    Fetched,
    /// A status change is awaiting the record store.
    Mutating {
        client_id: ClientId,
        transition: StatusTransition,
    },
    /// The record store accepted the change; the client left this queue.
    Confirmed {
        client_id: ClientId,
        transition: StatusTransition,
    },
    /// The record store refused the change; the queue is as it was.
    RolledBack {
        client_id: ClientId,
        transition: StatusTransition,
        error: String,
    },
}

/// One lifecycle queue (active, pending or inactive).
#[derive(Debug)]
pub struct StatusQueue {
    status: ClientStatus,
    clients: Vec<Client>,
    phase: QueuePhase,
}

impl StatusQueue {
    pub fn new(status: ClientStatus) -> Self {
        Self {
            status,
            clients: Vec::new(),
            phase: QueuePhase::Empty,
        }
    }

    pub fn status(&self) -> ClientStatus {
        self.status
    }

    pub fn phase(&self) -> &QueuePhase {
        &self.phase
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn contains(&self, id: ClientId) -> bool {
        self.clients.iter().any(|c| c.id == id)
    }

    pub async fn fetch(&mut self, gateway: &dyn RecordGateway, session: Session) -> Result<(), OutreachError> {
        let query = ClientListQuery {
            worker_id: session.worker_scope().map(|w| w.0),
            status: Some(self.status),
        };
        match gateway.list_clients(session, query).await {
            Ok(clients) => {
                self.clients = clients;
                self.phase = QueuePhase::Fetched;
                Ok(())
            }
            Err(e) => {
                let err = OutreachError::from(e);
                if err.is_unauthorized() {
                    self.clear();
                }
                Err(err)
            }
        }
    }

    pub fn search(&self, term: &str) -> Vec<&Client> {
        search(&self.clients, term)
    }

    /// Apply `transition` to a client shown in this queue.
    ///
    /// The client is removed from the list only after the record store
    /// confirms; on failure the list is untouched and the error returned.
    pub async fn transition(
        &mut self,
        gateway: &dyn RecordGateway,
        session: Session,
        client_id: ClientId,
        transition: StatusTransition,
    ) -> Result<Client, OutreachError> {
        self.apply(gateway, session, client_id, transition, None).await
    }

    /// Activate pending intake and hand it to `assignee`, whose active queue
    /// and rosters it joins.
    pub async fn activate(
        &mut self,
        gateway: &dyn RecordGateway,
        session: Session,
        client_id: ClientId,
        assignee: WorkerId,
    ) -> Result<Client, OutreachError> {
        self.apply(gateway, session, client_id, StatusTransition::Activate, Some(assignee))
            .await
    }

    async fn apply(
        &mut self,
        gateway: &dyn RecordGateway,
        session: Session,
        client_id: ClientId,
        transition: StatusTransition,
        assignee: Option<WorkerId>,
    ) -> Result<Client, OutreachError> {
        let Some(shown) = self.clients.iter().find(|c| c.id == client_id) else {
            return Err(OutreachError::InvalidState(format!(
                "client {client_id} is not in the {} queue",
                self.status
            )));
        };
        let Some(target) = transition.apply(self.status) else {
            return Err(OutreachError::InvalidState(format!(
                "{transition:?} from the {} queue",
                self.status
            )));
        };
        if transition == StatusTransition::Activate && assignee.or(shown.worker_id).is_none() {
            return Err(OutreachError::InvalidState(format!(
                "client {client_id} needs an assigned worker to be activated"
            )));
        }

        let update = match assignee {
            Some(worker) => StatusUpdate::to(target).assigned(worker),
            None => StatusUpdate::to(target),
        };

        self.phase = QueuePhase::Mutating {
            client_id,
            transition,
        };
        match gateway.set_status(session, client_id, update).await {
            Ok(client) => {
                self.clients.retain(|c| c.id != client_id);
                self.phase = QueuePhase::Confirmed {
                    client_id,
                    transition,
                };
                tracing::info!(client_id = %client_id, ?transition, to = %target, "status change confirmed");
                Ok(client)
            }
            Err(e) => {
                let err = OutreachError::from(e);
                tracing::warn!(client_id = %client_id, ?transition, error = %err, "status change rolled back");
                if err.is_unauthorized() {
                    self.clear();
                } else {
                    self.phase = QueuePhase::RolledBack {
                        client_id,
                        transition,
                        error: err.to_string(),
                    };
                }
                Err(err)
            }
        }
    }

    pub fn clear(&mut self) {
        self.clients.clear();
        self.phase = QueuePhase::Empty;
    }
}

/// Register a client on the worker's behalf. The client starts active.
pub async fn register_client(
    gateway: &dyn RecordGateway,
    session: Session,
    client: NewClient,
) -> Result<Client, OutreachError> {
    client.validate()?;
    Ok(gateway.register_client(session, client).await?)
}

/// Public self-service intake. The client waits for administrator activation.
pub async fn submit_intake(gateway: &dyn RecordGateway, client: NewClient) -> Result<Client, OutreachError> {
    client.validate()?;
    Ok(gateway.submit_intake(client).await?)
}

pub async fn enroll(
    gateway: &dyn RecordGateway,
    session: Session,
    client: ClientId,
    category: Category,
) -> Result<Enrollment, OutreachError> {
    Ok(gateway.enroll(session, category, client).await?)
}

pub async fn update_condition(
    gateway: &dyn RecordGateway,
    session: Session,
    client_id: ClientId,
    condition: ClientCondition,
) -> Result<Client, OutreachError> {
    let update = ConditionUpdate {
        client_id,
        condition,
    };
    Ok(gateway.update_condition(session, update).await?)
}

pub async fn update_position(
    gateway: &dyn RecordGateway,
    session: Session,
    client_id: ClientId,
    position: Position,
) -> Result<Client, OutreachError> {
    if !position.is_valid() {
        return Err(OutreachError::invalid(
            "position",
            ValidationIssue::OutOfRange,
            format!(
                "coordinates {}, {} are out of range",
                position.latitude, position.longitude
            ),
        ));
    }
    Ok(gateway.update_position(session, client_id, position).await?)
}
