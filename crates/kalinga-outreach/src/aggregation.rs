//! Program dashboard: four read-only statistics panels loaded together.

use kalinga_core::models::category::Category;
use kalinga_core::models::session::Session;
use kalinga_core::models::statistics::{
    AgeSegmentation, StatsQuery, TimeSeries, TimeWindow, TotalCount, Variant,
};
use kalinga_gateway::RecordGateway;
use kalinga_gateway::error::GatewayError;

use crate::error::OutreachError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel<T> {
    Loaded(T),
    /// The query succeeded but there is nothing to plot.
    NoData,
    Failed(String),
}

impl<T> Panel<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardRequest {
    pub category: Category,
    pub window: TimeWindow,
    pub variant: Option<Variant>,
}

impl DashboardRequest {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            window: TimeWindow::All,
            variant: None,
        }
    }

    pub fn window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSnapshot {
    pub request: DashboardRequest,
    pub total: Panel<TotalCount>,
    pub ages: Panel<AgeSegmentation>,
    pub registrations: Panel<TimeSeries>,
    pub updates: Panel<TimeSeries>,
}

fn panel<T>(
    result: Result<T, GatewayError>,
    is_empty: impl FnOnce(&T) -> bool,
) -> Result<Panel<T>, OutreachError> {
    match result {
        Ok(v) if is_empty(&v) => Ok(Panel::NoData),
        Ok(v) => Ok(Panel::Loaded(v)),
        Err(GatewayError::Unauthorized) => Err(OutreachError::Unauthorized),
        Err(e) => Ok(Panel::Failed(OutreachError::from(e).to_string())),
    }
}

/// Issue the four statistics queries concurrently and wait for all of them.
///
/// A failing query fails only its own panel, except for an authorization
/// failure, which fails the whole load. Workers see their own clients only.
pub async fn load(
    gateway: &dyn RecordGateway,
    session: Session,
    request: DashboardRequest,
) -> Result<DashboardSnapshot, OutreachError> {
    request.window.validate()?;

    let category = request.category;
    let query = StatsQuery::new(category, session.worker_scope(), request.window, request.variant);

    let (total, ages, registrations, updates) = tokio::join!(
        gateway.total_count(session, category, query.clone()),
        gateway.age_segmentation(session, category, query.clone()),
        gateway.registrations(session, category, query.clone()),
        gateway.updates(session, category, query),
    );

    Ok(DashboardSnapshot {
        request,
        total: panel(total, |_| false)?,
        ages: panel(ages, AgeSegmentation::is_empty)?,
        registrations: panel(registrations, TimeSeries::is_empty)?,
        updates: panel(updates, TimeSeries::is_empty)?,
    })
}

/// Holds the most recent snapshot. Only the latest request may replace it.
#[derive(Debug, Default)]
pub struct Dashboard {
    generation: u64,
    snapshot: Option<DashboardSnapshot>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        self.snapshot.as_ref()
    }

    /// Mark a new request; results of earlier ones become stale.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Apply a load result. Returns `Ok(false)` when it was stale.
    pub fn apply(
        &mut self,
        generation: u64,
        result: Result<DashboardSnapshot, OutreachError>,
    ) -> Result<bool, OutreachError> {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "discarding stale dashboard");
            return Ok(false);
        }
        match result {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                Ok(true)
            }
            Err(e) => {
                if e.is_unauthorized() {
                    self.clear();
                }
                Err(e)
            }
        }
    }

    pub async fn refresh(
        &mut self,
        gateway: &dyn RecordGateway,
        session: Session,
        request: DashboardRequest,
    ) -> Result<bool, OutreachError> {
        let generation = self.begin();
        let result = load(gateway, session, request).await;
        self.apply(generation, result)
    }

    pub fn clear(&mut self) {
        self.generation += 1;
        self.snapshot = None;
    }
}
