#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use jiff::Timestamp;
use jiff::tz::TimeZone;
use kalinga_core::models::category::Category;
use kalinga_core::models::client::{
    Client, ClientId, ClientListQuery, ConditionUpdate, NewClient, Position, RosterQuery,
    StatusUpdate,
};
use kalinga_core::models::enrollment::Enrollment;
use kalinga_core::models::session::{Session, WorkerId};
use kalinga_core::models::statistics::{AgeSegmentation, StatsQuery, TimeSeries, TotalCount};
use kalinga_core::models::visit_record::{
    FieldValues, NewVisitRecord, RecordId, VisitRecord, VisitRecordUpdate,
};
use kalinga_gateway::error::GatewayError;
use kalinga_gateway::{GatewayResult, RecordGateway};
use kalinga_storage::error::StorageError;
use kalinga_storage::store::RecordStore;

pub const WORKER: WorkerId = WorkerId(7);

pub fn worker() -> Session {
    Session::worker(WORKER)
}

pub fn admin() -> Session {
    Session::admin(WorkerId(1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Network,
    Unauthorized,
    NotFound,
    Malformed,
}

impl Fault {
    fn error(self) -> GatewayError {
        match self {
            Fault::Network => GatewayError::Network("connection reset".to_string()),
            Fault::Unauthorized => GatewayError::Unauthorized,
            Fault::NotFound => GatewayError::NotFound("no such resource".to_string()),
            Fault::Malformed => GatewayError::Decode("expected an array".to_string()),
        }
    }
}

/// A [`RecordGateway`] backed directly by an in-process [`RecordStore`],
/// with per-method fault injection and call counting.
#[derive(Default)]
pub struct StoreGateway {
    store: Mutex<RecordStore>,
    faults: Mutex<HashMap<&'static str, Fault>>,
    calls: Mutex<Vec<&'static str>>,
}

impl StoreGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, method: &'static str, fault: Fault) {
        self.faults.lock().unwrap().insert(method, fault);
    }

    pub fn heal(&self, method: &'static str) {
        self.faults.lock().unwrap().remove(method);
    }

    pub fn calls(&self, method: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|m| **m == method).count()
    }

    pub fn with_store<T>(&self, f: impl FnOnce(&mut RecordStore) -> T) -> T {
        f(&mut self.store.lock().unwrap())
    }

    /// Register clients until one with `id` exists, and return it.
    pub fn seed_client_with_id(&self, id: u64, name: &str) -> Client {
        self.with_store(|store| {
            let mut last = None;
            for _ in 0..id {
                let client = store
                    .register_client(
                        NewClient {
                            name: name.to_string(),
                            address: "Purok 3, Barangay San Roque".to_string(),
                            ..NewClient::default()
                        },
                        WORKER,
                        Timestamp::now(),
                    )
                    .unwrap();
                last = Some(client);
            }
            last.unwrap()
        })
    }

    pub fn seed_client(&self, name: &str) -> Client {
        self.with_store(|store| {
            store
                .register_client(
                    NewClient {
                        name: name.to_string(),
                        address: "Purok 3, Barangay San Roque".to_string(),
                        ..NewClient::default()
                    },
                    WORKER,
                    Timestamp::now(),
                )
                .unwrap()
        })
    }

    pub fn seed_record(&self, category: Category, client: ClientId, values: FieldValues) -> VisitRecord {
        self.with_store(|store| {
            store
                .create_record(
                    category,
                    NewVisitRecord {
                        client_id: client,
                        values,
                    },
                    Timestamp::now(),
                )
                .unwrap()
        })
    }

    fn call<T: Send + 'static>(
        &self,
        method: &'static str,
        f: impl FnOnce(&mut RecordStore) -> Result<T, StorageError>,
    ) -> GatewayResult<'_, T> {
        self.calls.lock().unwrap().push(method);
        let fault = self.faults.lock().unwrap().get(method).copied();
        let result = match fault {
            Some(fault) => Err(fault.error()),
            None => self.with_store(f).map_err(storage_error),
        };
        Box::pin(async move { result })
    }
}

fn storage_error(e: StorageError) -> GatewayError {
    match e {
        StorageError::ClientNotFound(_) | StorageError::RecordNotFound { .. } => {
            GatewayError::NotFound(e.to_string())
        }
        StorageError::InvalidTransition { .. } => GatewayError::Conflict(e.to_string()),
        other => GatewayError::Rejected {
            status: 400,
            message: other.to_string(),
        },
    }
}

fn window(query: &StatsQuery) -> Result<kalinga_core::models::statistics::TimeWindow, StorageError> {
    Ok(query.window()?)
}

impl RecordGateway for StoreGateway {
    fn visit_records(&self, _: Session, category: Category, client: ClientId) -> GatewayResult<'_, Vec<VisitRecord>> {
        self.call("visit_records", |s| s.records_for(category, client))
    }

    fn create_record(&self, _: Session, category: Category, record: NewVisitRecord) -> GatewayResult<'_, VisitRecord> {
        self.call("create_record", |s| s.create_record(category, record, Timestamp::now()))
    }

    fn update_record(
        &self,
        _: Session,
        category: Category,
        id: RecordId,
        update: VisitRecordUpdate,
    ) -> GatewayResult<'_, VisitRecord> {
        self.call("update_record", |s| {
            s.update_record(category, id, update.values, Timestamp::now())
        })
    }

    fn list_clients(&self, _: Session, query: ClientListQuery) -> GatewayResult<'_, Vec<Client>> {
        self.call("list_clients", |s| {
            Ok(s.list_clients(query.worker_id.map(WorkerId), query.status))
        })
    }

    fn register_client(&self, session: Session, client: NewClient) -> GatewayResult<'_, Client> {
        self.call("register_client", |s| {
            s.register_client(client, session.worker_id, Timestamp::now())
        })
    }

    fn submit_intake(&self, client: NewClient) -> GatewayResult<'_, Client> {
        self.call("submit_intake", |s| s.submit_intake(client, Timestamp::now()))
    }

    fn set_status(&self, _: Session, id: ClientId, update: StatusUpdate) -> GatewayResult<'_, Client> {
        self.call("set_status", |s| {
            let (client, _) = s.set_status(id, update.status, Timestamp::now())?;
            match update.worker_id {
                Some(worker) => s.assign_worker(id, worker, Timestamp::now()),
                None => Ok(client),
            }
        })
    }

    fn update_condition(&self, _: Session, update: ConditionUpdate) -> GatewayResult<'_, Client> {
        self.call("update_condition", |s| {
            s.update_condition(update.client_id, update.condition, Timestamp::now())
        })
    }

    fn update_position(&self, _: Session, id: ClientId, position: Position) -> GatewayResult<'_, Client> {
        self.call("update_position", |s| s.update_position(id, position, Timestamp::now()))
    }

    fn category_roster(&self, _: Session, category: Category, query: RosterQuery) -> GatewayResult<'_, Vec<Client>> {
        self.call("category_roster", |s| {
            Ok(s.category_roster(category, query.worker_id.map(WorkerId)))
        })
    }

    fn enroll(&self, session: Session, category: Category, client: ClientId) -> GatewayResult<'_, Enrollment> {
        self.call("enroll", |s| {
            s.enroll(client, category, Some(session.worker_id), Timestamp::now())
        })
    }

    fn total_count(&self, _: Session, category: Category, query: StatsQuery) -> GatewayResult<'_, TotalCount> {
        self.call("total_count", |s| {
            Ok(s.total_count(category, query.worker(), window(&query)?, query.variant))
        })
    }

    fn age_segmentation(&self, _: Session, category: Category, query: StatsQuery) -> GatewayResult<'_, AgeSegmentation> {
        self.call("age_segmentation", |s| {
            let today = Timestamp::now().to_zoned(TimeZone::UTC).date();
            Ok(s.age_segmentation(category, query.worker(), window(&query)?, today))
        })
    }

    fn registrations(&self, _: Session, category: Category, query: StatsQuery) -> GatewayResult<'_, TimeSeries> {
        self.call("registrations", |s| {
            Ok(s.registrations(category, query.worker(), window(&query)?))
        })
    }

    fn updates(&self, _: Session, category: Category, query: StatsQuery) -> GatewayResult<'_, TimeSeries> {
        self.call("updates", |s| Ok(s.updates(category, query.worker(), window(&query)?)))
    }
}

pub fn values(pairs: &[(&str, serde_json::Value)]) -> FieldValues {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
