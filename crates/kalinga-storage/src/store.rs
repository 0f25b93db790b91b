use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use kalinga_core::models::category::Category;
use kalinga_core::models::client::{
    Client, ClientCondition, ClientId, ClientStatus, NewClient, Position, StatusTransition,
};
use kalinga_core::models::enrollment::Enrollment;
use kalinga_core::models::session::WorkerId;
use kalinga_core::models::visit_record::{FieldValues, NewVisitRecord, RecordId, VisitRecord};

use crate::error::StorageError;

/// In-memory record store. Serialized as a whole for snapshots.
///
/// Clients, enrollments and records are kept in insertion order, which is
/// also id order, so "visit order" is simply storage order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordStore {
    #[serde(default)]
    clients: Vec<Client>,
    #[serde(default)]
    enrollments: Vec<Enrollment>,
    #[serde(default)]
    records: Vec<VisitRecord>,
    #[serde(default)]
    last_client_id: u64,
    #[serde(default)]
    last_record_id: u64,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub(crate) fn enrollments(&self) -> &[Enrollment] {
        &self.enrollments
    }

    pub(crate) fn records(&self) -> &[VisitRecord] {
        &self.records
    }

    // --- clients ---

    /// Register a client on behalf of a worker. Worker-created clients are
    /// active immediately.
    pub fn register_client(
        &mut self,
        new: NewClient,
        worker: WorkerId,
        now: Timestamp,
    ) -> Result<Client, StorageError> {
        self.insert_client(new, Some(worker), ClientStatus::Active, now)
    }

    /// Public self-service intake. The client waits in the pending queue
    /// until an administrator activates it.
    pub fn submit_intake(&mut self, new: NewClient, now: Timestamp) -> Result<Client, StorageError> {
        self.insert_client(new, None, ClientStatus::Pending, now)
    }

    fn insert_client(
        &mut self,
        new: NewClient,
        worker_id: Option<WorkerId>,
        status: ClientStatus,
        now: Timestamp,
    ) -> Result<Client, StorageError> {
        new.validate()?;

        self.last_client_id += 1;
        let client = Client {
            id: ClientId(self.last_client_id),
            name: new.name.trim().to_string(),
            address: new.address.trim().to_string(),
            phone: new.phone,
            philhealth_id: new.philhealth_id,
            birth_date: new.birth_date,
            sex: new.sex,
            worker_id,
            status,
            condition: ClientCondition::default(),
            position: None,
            registered_at: now,
            updated_at: now,
        };
        self.clients.push(client.clone());

        tracing::info!(client_id = %client.id, status = %status, "client registered");
        Ok(client)
    }

    pub fn client(&self, id: ClientId) -> Result<&Client, StorageError> {
        self.clients
            .iter()
            .find(|c| c.id == id)
            .ok_or(StorageError::ClientNotFound(id))
    }

    fn client_mut(&mut self, id: ClientId) -> Result<&mut Client, StorageError> {
        self.clients
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StorageError::ClientNotFound(id))
    }

    /// Clients filtered by enrolling worker and lifecycle status.
    pub fn list_clients(&self, worker: Option<WorkerId>, status: Option<ClientStatus>) -> Vec<Client> {
        self.clients
            .iter()
            .filter(|c| worker.is_none_or(|w| c.worker_id == Some(w)))
            .filter(|c| status.is_none_or(|s| c.status == s))
            .cloned()
            .collect()
    }

    /// Move a client to `target`, returning the updated client and the
    /// transition that was applied.
    pub fn set_status(
        &mut self,
        id: ClientId,
        target: ClientStatus,
        now: Timestamp,
    ) -> Result<(Client, StatusTransition), StorageError> {
        let client = self.client_mut(id)?;
        let from = client.status;
        let transition = StatusTransition::between(from, target).ok_or(
            StorageError::InvalidTransition {
                client: id,
                from,
                to: target,
            },
        )?;

        client.status = target;
        client.updated_at = now;
        tracing::info!(client_id = %id, %from, to = %target, "client status changed");
        Ok((client.clone(), transition))
    }

    /// Hand a client to `worker`. Their queues, rosters and records follow.
    pub fn assign_worker(
        &mut self,
        id: ClientId,
        worker: WorkerId,
        now: Timestamp,
    ) -> Result<Client, StorageError> {
        let client = self.client_mut(id)?;
        client.worker_id = Some(worker);
        client.updated_at = now;
        tracing::info!(client_id = %id, worker_id = %worker, "client assigned");
        Ok(client.clone())
    }

    pub fn update_condition(
        &mut self,
        id: ClientId,
        condition: ClientCondition,
        now: Timestamp,
    ) -> Result<Client, StorageError> {
        let client = self.client_mut(id)?;
        client.condition = condition;
        client.updated_at = now;
        Ok(client.clone())
    }

    pub fn update_position(
        &mut self,
        id: ClientId,
        position: Position,
        now: Timestamp,
    ) -> Result<Client, StorageError> {
        if !position.is_valid() {
            return Err(StorageError::InvalidPosition {
                latitude: position.latitude,
                longitude: position.longitude,
            });
        }
        let client = self.client_mut(id)?;
        client.position = Some(position);
        client.updated_at = now;
        Ok(client.clone())
    }

    // --- enrollments ---

    /// Enroll a client in a program. Enrolling twice returns the existing
    /// enrollment unchanged.
    pub fn enroll(
        &mut self,
        client_id: ClientId,
        category: Category,
        worker: Option<WorkerId>,
        now: Timestamp,
    ) -> Result<Enrollment, StorageError> {
        self.client(client_id)?;

        if let Some(existing) = self.enrollment(client_id, category) {
            return Ok(existing.clone());
        }

        let enrollment = Enrollment {
            client_id,
            category,
            worker_id: worker,
            enrolled_at: now,
        };
        self.enrollments.push(enrollment.clone());
        tracing::info!(client_id = %client_id, category = %category, "client enrolled");
        Ok(enrollment)
    }

    pub fn enrollment(&self, client_id: ClientId, category: Category) -> Option<&Enrollment> {
        self.enrollments
            .iter()
            .find(|e| e.client_id == client_id && e.category == category)
    }

    /// Active clients enrolled in `category`, optionally limited to one
    /// worker's clients.
    pub fn category_roster(&self, category: Category, worker: Option<WorkerId>) -> Vec<Client> {
        self.enrollments
            .iter()
            .filter(|e| e.category == category)
            .filter_map(|e| self.client(e.client_id).ok())
            .filter(|c| c.status == ClientStatus::Active)
            .filter(|c| worker.is_none_or(|w| c.worker_id == Some(w)))
            .cloned()
            .collect()
    }

    // --- visit records ---

    /// Every visit record of a client in one program, in visit order.
    /// An enrolled client with no visits yet yields an empty list.
    pub fn records_for(
        &self,
        category: Category,
        client_id: ClientId,
    ) -> Result<Vec<VisitRecord>, StorageError> {
        self.client(client_id)?;
        Ok(self
            .records
            .iter()
            .filter(|r| r.category == category && r.client_id == client_id)
            .cloned()
            .collect())
    }

    pub fn record(&self, category: Category, id: RecordId) -> Result<&VisitRecord, StorageError> {
        self.records
            .iter()
            .find(|r| r.id == id && r.category == category)
            .ok_or(StorageError::RecordNotFound { category, id })
    }

    /// Append a visit record. The first record for a pair also enrolls the
    /// client in the program.
    pub fn create_record(
        &mut self,
        category: Category,
        new: NewVisitRecord,
        now: Timestamp,
    ) -> Result<VisitRecord, StorageError> {
        let worker = self.client(new.client_id)?.worker_id;
        self.enroll(new.client_id, category, worker, now)?;

        self.last_record_id += 1;
        let record = VisitRecord {
            id: RecordId(self.last_record_id),
            client_id: new.client_id,
            category,
            values: new.values,
            created_at: now,
            updated_at: now,
        };
        self.records.push(record.clone());

        tracing::info!(
            record_id = %record.id,
            client_id = %record.client_id,
            category = %category,
            "visit record created"
        );
        Ok(record)
    }

    /// Merge `values` into an existing record. Keys not present in `values`
    /// keep their stored value; `updated_at` always moves.
    pub fn update_record(
        &mut self,
        category: Category,
        id: RecordId,
        values: FieldValues,
        now: Timestamp,
    ) -> Result<VisitRecord, StorageError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id && r.category == category)
            .ok_or(StorageError::RecordNotFound { category, id })?;

        let changed = values.len();
        record.values.extend(values);
        record.updated_at = now;

        tracing::info!(record_id = %id, category = %category, changed, "visit record updated");
        Ok(record.clone())
    }
}
