//! kalinga-gateway
//!
//! Client side of the record store's REST interface. [`RecordGateway`] is
//! the seam the outreach engine talks through; [`http::HttpGateway`] is the
//! production implementation.

pub mod config;
pub mod error;
pub mod http;

use std::future::Future;
use std::pin::Pin;

use kalinga_core::models::category::Category;
use kalinga_core::models::client::{
    Client, ClientId, ClientListQuery, ConditionUpdate, NewClient, Position, RosterQuery,
    StatusUpdate,
};
use kalinga_core::models::enrollment::Enrollment;
use kalinga_core::models::session::Session;
use kalinga_core::models::statistics::{AgeSegmentation, StatsQuery, TimeSeries, TotalCount};
use kalinga_core::models::visit_record::{NewVisitRecord, RecordId, VisitRecord, VisitRecordUpdate};

use error::GatewayError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub type GatewayResult<'a, T> = BoxFuture<'a, Result<T, GatewayError>>;

/// Every call the outreach engine makes against the record store.
///
/// Methods return boxed futures for dyn compatibility. Each call carries the
/// caller's [`Session`] explicitly.
pub trait RecordGateway: Send + Sync {
    // --- visit records ---

    /// `GET /{slug}-form/{client_id}`
    fn visit_records(
        &self,
        session: Session,
        category: Category,
        client: ClientId,
    ) -> GatewayResult<'_, Vec<VisitRecord>>;

    /// `POST /{slug}`
    fn create_record(
        &self,
        session: Session,
        category: Category,
        record: NewVisitRecord,
    ) -> GatewayResult<'_, VisitRecord>;

    /// `PUT /{slug}/{record_id}`
    fn update_record(
        &self,
        session: Session,
        category: Category,
        id: RecordId,
        update: VisitRecordUpdate,
    ) -> GatewayResult<'_, VisitRecord>;

    // --- clients ---

    /// `GET /clients?workerId=&status=`
    fn list_clients(&self, session: Session, query: ClientListQuery) -> GatewayResult<'_, Vec<Client>>;

    /// `POST /clients`
    fn register_client(&self, session: Session, client: NewClient) -> GatewayResult<'_, Client>;

    /// `POST /clients/intake`, no session.
    fn submit_intake(&self, client: NewClient) -> GatewayResult<'_, Client>;

    /// `PUT /clients/{id}/status`
    fn set_status(&self, session: Session, id: ClientId, update: StatusUpdate) -> GatewayResult<'_, Client>;

    /// `POST /update-client-condition`
    fn update_condition(&self, session: Session, update: ConditionUpdate) -> GatewayResult<'_, Client>;

    /// `PUT /clients/{id}/position`
    fn update_position(&self, session: Session, id: ClientId, position: Position) -> GatewayResult<'_, Client>;

    // --- program rosters ---

    /// `GET /{slug}/clients?worker_id=&category_name=`
    fn category_roster(
        &self,
        session: Session,
        category: Category,
        query: RosterQuery,
    ) -> GatewayResult<'_, Vec<Client>>;

    /// `POST /{slug}/clients`
    fn enroll(&self, session: Session, category: Category, client: ClientId) -> GatewayResult<'_, Enrollment>;

    // --- statistics ---

    /// `GET /{slug}/count-total-clients`
    fn total_count(&self, session: Session, category: Category, query: StatsQuery) -> GatewayResult<'_, TotalCount>;

    /// `GET /{slug}/age-segmentation`
    fn age_segmentation(
        &self,
        session: Session,
        category: Category,
        query: StatsQuery,
    ) -> GatewayResult<'_, AgeSegmentation>;

    /// `GET /{slug}/new-registered`
    fn registrations(&self, session: Session, category: Category, query: StatsQuery) -> GatewayResult<'_, TimeSeries>;

    /// `GET /{slug}/{slug}-data`
    fn updates(&self, session: Session, category: Category, query: StatsQuery) -> GatewayResult<'_, TimeSeries>;
}
