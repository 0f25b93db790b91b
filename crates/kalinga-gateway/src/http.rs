use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use kalinga_core::endpoints::{self, WORKER_ID_HEADER, WORKER_ROLE_HEADER};
use kalinga_core::models::category::Category;
use kalinga_core::models::client::{
    Client, ClientId, ClientListQuery, ConditionUpdate, NewClient, Position, RosterQuery,
    StatusUpdate,
};
use kalinga_core::models::enrollment::{EnrollRequest, Enrollment};
use kalinga_core::models::session::Session;
use kalinga_core::models::statistics::{AgeSegmentation, StatsQuery, TimeSeries, TotalCount};
use kalinga_core::models::visit_record::{NewVisitRecord, RecordId, VisitRecord, VisitRecordUpdate};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::{GatewayResult, RecordGateway};

/// [`RecordGateway`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get(&self, session: Session, path: &str) -> RequestBuilder {
        with_session(self.client.get(self.url(path)), session)
    }

    fn post(&self, session: Option<Session>, path: &str) -> RequestBuilder {
        let req = self.client.post(self.url(path));
        match session {
            Some(session) => with_session(req, session),
            None => req,
        }
    }

    fn put(&self, session: Session, path: &str) -> RequestBuilder {
        with_session(self.client.put(self.url(path)), session)
    }
}

fn with_session(req: RequestBuilder, session: Session) -> RequestBuilder {
    req.header(WORKER_ID_HEADER, session.worker_id.to_string())
        .header(WORKER_ROLE_HEADER, session.role.as_str())
}

/// Send a request and decode a JSON body, mapping non-2xx statuses onto
/// [`GatewayError`].
async fn send<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, GatewayError> {
    let resp = req.send().await?;
    let status = resp.status();
    let path = resp.url().path().to_string();

    if status.is_success() {
        tracing::debug!(status = status.as_u16(), path = %path, "record store responded");
        return Ok(resp.json::<T>().await?);
    }

    let message = match resp.text().await {
        Ok(body) => serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body),
        Err(e) => e.to_string(),
    };
    tracing::warn!(status = status.as_u16(), path = %path, error = %message, "record store rejected request");

    Err(match status {
        StatusCode::UNAUTHORIZED => GatewayError::Unauthorized,
        StatusCode::NOT_FOUND => GatewayError::NotFound(message),
        StatusCode::CONFLICT => GatewayError::Conflict(message),
        other => GatewayError::Rejected {
            status: other.as_u16(),
            message,
        },
    })
}

impl RecordGateway for HttpGateway {
    fn visit_records(
        &self,
        session: Session,
        category: Category,
        client: ClientId,
    ) -> GatewayResult<'_, Vec<VisitRecord>> {
        Box::pin(async move {
            send(self.get(session, &endpoints::client_visit_records(category, client))).await
        })
    }

    fn create_record(
        &self,
        session: Session,
        category: Category,
        record: NewVisitRecord,
    ) -> GatewayResult<'_, VisitRecord> {
        Box::pin(async move {
            let req = self.post(Some(session), &endpoints::category_records(category));
            send(req.json(&record)).await
        })
    }

    fn update_record(
        &self,
        session: Session,
        category: Category,
        id: RecordId,
        update: VisitRecordUpdate,
    ) -> GatewayResult<'_, VisitRecord> {
        Box::pin(async move {
            let req = self.put(session, &endpoints::category_record(category, id));
            send(req.json(&update)).await
        })
    }

    fn list_clients(&self, session: Session, query: ClientListQuery) -> GatewayResult<'_, Vec<Client>> {
        Box::pin(async move { send(self.get(session, endpoints::CLIENTS).query(&query)).await })
    }

    fn register_client(&self, session: Session, client: NewClient) -> GatewayResult<'_, Client> {
        Box::pin(async move { send(self.post(Some(session), endpoints::CLIENTS).json(&client)).await })
    }

    fn submit_intake(&self, client: NewClient) -> GatewayResult<'_, Client> {
        Box::pin(async move { send(self.post(None, endpoints::CLIENT_INTAKE).json(&client)).await })
    }

    fn set_status(&self, session: Session, id: ClientId, update: StatusUpdate) -> GatewayResult<'_, Client> {
        Box::pin(async move {
            let req = self.put(session, &endpoints::client_status(id));
            send(req.json(&update)).await
        })
    }

    fn update_condition(&self, session: Session, update: ConditionUpdate) -> GatewayResult<'_, Client> {
        Box::pin(async move {
            let req = self.post(Some(session), endpoints::UPDATE_CLIENT_CONDITION);
            send(req.json(&update)).await
        })
    }

    fn update_position(&self, session: Session, id: ClientId, position: Position) -> GatewayResult<'_, Client> {
        Box::pin(async move {
            let req = self.put(session, &endpoints::client_position(id));
            send(req.json(&position)).await
        })
    }

    fn category_roster(
        &self,
        session: Session,
        category: Category,
        query: RosterQuery,
    ) -> GatewayResult<'_, Vec<Client>> {
        Box::pin(async move {
            let req = self.get(session, &endpoints::category_clients(category));
            send(req.query(&query)).await
        })
    }

    fn enroll(&self, session: Session, category: Category, client: ClientId) -> GatewayResult<'_, Enrollment> {
        Box::pin(async move {
            let req = self.post(Some(session), &endpoints::category_clients(category));
            send(req.json(&EnrollRequest { client_id: client })).await
        })
    }

    fn total_count(&self, session: Session, category: Category, query: StatsQuery) -> GatewayResult<'_, TotalCount> {
        Box::pin(async move {
            let req = self.get(session, &endpoints::count_total_clients(category));
            send(req.query(&query)).await
        })
    }

    fn age_segmentation(
        &self,
        session: Session,
        category: Category,
        query: StatsQuery,
    ) -> GatewayResult<'_, AgeSegmentation> {
        Box::pin(async move {
            let req = self.get(session, &endpoints::age_segmentation(category));
            send(req.query(&query)).await
        })
    }

    fn registrations(&self, session: Session, category: Category, query: StatsQuery) -> GatewayResult<'_, TimeSeries> {
        Box::pin(async move {
            let req = self.get(session, &endpoints::new_registered(category));
            send(req.query(&query)).await
        })
    }

    fn updates(&self, session: Session, category: Category, query: StatsQuery) -> GatewayResult<'_, TimeSeries> {
        Box::pin(async move {
            let req = self.get(session, &endpoints::category_data(category));
            send(req.query(&query)).await
        })
    }
}
