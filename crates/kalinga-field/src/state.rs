use kalinga_core::models::category::Category;
use kalinga_core::models::client::{Client, ClientId, ClientStatus};
use kalinga_core::models::session::Session;
use kalinga_outreach::aggregation::Dashboard;
use kalinga_outreach::directory::{CategoryRoster, StatusQueue};
use kalinga_outreach::reconcile::{LookupPolicy, Reconciler};

/// Everything the field client holds between commands for one signed-in
/// worker.
#[derive(Debug)]
pub struct FieldState {
    pub session: Session,
    pub reconciler: Reconciler,
    pub roster: Option<CategoryRoster>,
    pub active: StatusQueue,
    pub pending: StatusQueue,
    pub inactive: StatusQueue,
    pub dashboard: Dashboard,
}

impl FieldState {
    pub fn new(session: Session, policy: LookupPolicy) -> Self {
        Self {
            session,
            reconciler: Reconciler::new(policy),
            roster: None,
            active: StatusQueue::new(ClientStatus::Active),
            pending: StatusQueue::new(ClientStatus::Pending),
            inactive: StatusQueue::new(ClientStatus::Inactive),
            dashboard: Dashboard::new(),
        }
    }

    pub fn queue_mut(&mut self, status: ClientStatus) -> &mut StatusQueue {
        match status {
            ClientStatus::Active => &mut self.active,
            ClientStatus::Pending => &mut self.pending,
            ClientStatus::Inactive => &mut self.inactive,
        }
    }

    /// The roster for `category`, replacing one kept for another program.
    pub fn roster_mut(&mut self, category: Category) -> &mut CategoryRoster {
        let roster = self
            .roster
            .take()
            .filter(|r| r.category() == category)
            .unwrap_or_else(|| CategoryRoster::new(category));
        self.roster.insert(roster)
    }

    /// A client a visit form may be opened for: one shown in the active
    /// list or the loaded program roster. Pending and inactive clients are
    /// not eligible.
    pub fn openable_client(&self, id: ClientId) -> Option<&Client> {
        let roster = self.roster.iter().flat_map(|r| r.clients());
        self.active
            .clients()
            .iter()
            .chain(roster)
            .find(|c| c.id == id)
    }

    /// Drop every list and open form, after the session stopped being
    /// authorized.
    pub fn clear(&mut self) {
        self.reconciler.reset();
        self.roster = None;
        self.active.clear();
        self.pending.clear();
        self.inactive.clear();
        self.dashboard.clear();
        tracing::warn!(worker_id = %self.session.worker_id, "session unauthorized; local state cleared");
    }
}
