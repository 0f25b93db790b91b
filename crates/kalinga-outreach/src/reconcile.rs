//! Visit-record reconciliation.
//!
//! When a worker opens a program form for a client, the machine looks up
//! the client's existing records in that program and either opens a blank
//! form directly (no records) or asks the worker to choose between a new
//! record and an existing one. It never picks for the worker.
//!
//! ```text
//! Idle --begin--> Checking --0 records--> FormOpen(create)
//!                    |  \--lookup failed, AssumeEmpty--> FormOpen(create)
//!                    |   \-lookup failed, RequireRetry-> LookupFailed --retry--> Checking
//!                    \--n records--> HasRecords --CreateNew--> FormOpen(create)
//!                                        \--ProceedToExisting--> SelectingRecord --select(k)--> FormOpen(edit)
//! ```

use kalinga_core::models::category::Category;
use kalinga_core::models::client::{ClientId, ClientIdentity};
use kalinga_core::models::session::Session;
use kalinga_core::models::visit_record::{RecordId, VisitRecord};
use kalinga_gateway::RecordGateway;
use kalinga_gateway::error::GatewayError;

use crate::error::OutreachError;
use crate::form::FormSession;

/// What to do when the existing-records lookup fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LookupPolicy {
    /// Treat the failure as "no records" and open a blank form. The
    /// outcome is flagged so the UI can warn that history may exist.
    #[default]
    AssumeEmpty,
    /// Block creation until a lookup succeeds.
    RequireRetry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    CreateNew,
    ProceedToExisting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Checking,
    HasRecords,
    SelectingRecord,
    FormOpen,
    LookupFailed,
}

/// Handle for one in-flight lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupTicket {
    pub generation: u64,
    pub category: Category,
    pub client: ClientId,
}

/// Result of applying a lookup to the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// A blank create form is open. `assumed_empty` is set when the lookup
    /// failed and the permissive policy treated it as empty.
    FormOpened { assumed_empty: bool },
    /// The worker must choose between a new record and `count` existing ones.
    ChoiceRequired { count: usize },
    /// The lookup failed under [`LookupPolicy::RequireRetry`].
    Failed { message: String },
    /// The result belonged to an earlier lookup and was discarded.
    Stale,
}

/// One selectable existing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEntry {
    /// 1-based position in the returned order.
    pub number: usize,
    pub label: String,
    pub record_id: RecordId,
    pub updated_at: jiff::Timestamp,
}

#[derive(Debug)]
struct Target {
    client: ClientIdentity,
    category: Category,
}

#[derive(Debug)]
enum State {
    Idle,
    Checking { target: Target, generation: u64 },
    HasRecords { target: Target, records: Vec<VisitRecord> },
    SelectingRecord { target: Target, records: Vec<VisitRecord> },
    FormOpen(Box<FormSession>),
    LookupFailed { target: Target, message: String },
}

#[derive(Debug)]
pub struct Reconciler {
    state: State,
    generation: u64,
    policy: LookupPolicy,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(LookupPolicy::default())
    }
}

impl Reconciler {
    pub fn new(policy: LookupPolicy) -> Self {
        Self {
            state: State::Idle,
            generation: 0,
            policy,
        }
    }

    pub fn policy(&self) -> LookupPolicy {
        self.policy
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::Idle => Phase::Idle,
            State::Checking { .. } => Phase::Checking,
            State::HasRecords { .. } => Phase::HasRecords,
            State::SelectingRecord { .. } => Phase::SelectingRecord,
            State::FormOpen(_) => Phase::FormOpen,
            State::LookupFailed { .. } => Phase::LookupFailed,
        }
    }

    /// Start a lookup for `client` in `category`. Any earlier lookup still
    /// in flight becomes stale.
    pub fn begin(&mut self, client: ClientIdentity, category: Category) -> LookupTicket {
        self.generation += 1;
        let ticket = LookupTicket {
            generation: self.generation,
            category,
            client: client.id,
        };
        tracing::debug!(client_id = %client.id, category = %category, generation = self.generation, "checking existing records");
        self.state = State::Checking {
            target: Target { client, category },
            generation: self.generation,
        };
        ticket
    }

    /// Apply the result of the lookup started with `generation`.
    ///
    /// Results for any other generation, or arriving after the worker left
    /// the checking state, are discarded. An authorization failure resets
    /// the machine and is returned as an error.
    pub fn apply_lookup(
        &mut self,
        generation: u64,
        result: Result<Vec<VisitRecord>, GatewayError>,
    ) -> Result<LookupOutcome, OutreachError> {
        let current = matches!(self.state, State::Checking { generation: g, .. } if g == generation);
        if !current {
            tracing::debug!(generation, current = self.generation, "discarding stale lookup");
            return Ok(LookupOutcome::Stale);
        }

        let target = match std::mem::replace(&mut self.state, State::Idle) {
            State::Checking { target, .. } => target,
            _ => return Ok(LookupOutcome::Stale),
        };

        match result {
            Ok(records) if records.is_empty() => {
                self.open_blank(target);
                Ok(LookupOutcome::FormOpened { assumed_empty: false })
            }
            Ok(records) => {
                let count = records.len();
                self.state = State::HasRecords { target, records };
                Ok(LookupOutcome::ChoiceRequired { count })
            }
            Err(GatewayError::Unauthorized) => {
                self.reset();
                Err(OutreachError::Unauthorized)
            }
            Err(e) => {
                tracing::warn!(
                    client_id = %target.client.id,
                    category = %target.category,
                    error = %e,
                    policy = ?self.policy,
                    "existing-records lookup failed"
                );
                match self.policy {
                    LookupPolicy::AssumeEmpty => {
                        self.open_blank(target);
                        Ok(LookupOutcome::FormOpened { assumed_empty: true })
                    }
                    LookupPolicy::RequireRetry => {
                        let message = OutreachError::from(e).to_string();
                        self.state = State::LookupFailed {
                            target,
                            message: message.clone(),
                        };
                        Ok(LookupOutcome::Failed { message })
                    }
                }
            }
        }
    }

    fn open_blank(&mut self, target: Target) {
        let form = FormSession::create(target.client, target.category);
        self.state = State::FormOpen(Box::new(form));
    }

    /// `begin`, fetch and `apply_lookup` in one step.
    pub async fn open(
        &mut self,
        gateway: &dyn RecordGateway,
        session: Session,
        client: ClientIdentity,
        category: Category,
    ) -> Result<LookupOutcome, OutreachError> {
        let ticket = self.begin(client, category);
        self.fetch(gateway, session, ticket).await
    }

    async fn fetch(
        &mut self,
        gateway: &dyn RecordGateway,
        session: Session,
        ticket: LookupTicket,
    ) -> Result<LookupOutcome, OutreachError> {
        let result = gateway
            .visit_records(session, ticket.category, ticket.client)
            .await;
        self.apply_lookup(ticket.generation, result)
    }

    /// After a failed lookup under [`LookupPolicy::RequireRetry`], start over.
    pub fn retry(&mut self) -> Result<LookupTicket, OutreachError> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::LookupFailed { target, .. } => Ok(self.begin(target.client, target.category)),
            other => {
                self.state = other;
                Err(self.invalid("retry"))
            }
        }
    }

    pub async fn retry_lookup(
        &mut self,
        gateway: &dyn RecordGateway,
        session: Session,
    ) -> Result<LookupOutcome, OutreachError> {
        let ticket = self.retry()?;
        self.fetch(gateway, session, ticket).await
    }

    /// Message of the failed lookup, in [`Phase::LookupFailed`].
    pub fn lookup_error(&self) -> Option<&str> {
        match &self.state {
            State::LookupFailed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// The worker's answer on the two-choice screen.
    pub fn choose(&mut self, choice: Choice) -> Result<(), OutreachError> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::HasRecords { target, records } => {
                match choice {
                    Choice::CreateNew => self.open_blank(target),
                    Choice::ProceedToExisting => {
                        self.state = State::SelectingRecord { target, records };
                    }
                }
                Ok(())
            }
            other => {
                self.state = other;
                Err(self.invalid("choosing"))
            }
        }
    }

    /// Existing records in returned order, labelled for the selection list.
    /// Empty outside [`Phase::SelectingRecord`].
    pub fn entries(&self) -> Vec<RecordEntry> {
        let State::SelectingRecord { records, .. } = &self.state else {
            return Vec::new();
        };
        records
            .iter()
            .enumerate()
            .map(|(i, r)| RecordEntry {
                number: i + 1,
                label: format!("Data Entry #{}", i + 1),
                record_id: r.id,
                updated_at: r.updated_at,
            })
            .collect()
    }

    /// Open entry `number` (1-based) for editing.
    pub fn select(&mut self, number: usize) -> Result<(), OutreachError> {
        let State::SelectingRecord { target, records } = &self.state else {
            return Err(self.invalid("selecting a record"));
        };
        let Some(record) = number.checked_sub(1).and_then(|i| records.get(i)) else {
            return Err(OutreachError::InvalidState(format!(
                "selecting data entry #{number} of {}",
                records.len()
            )));
        };

        let form = FormSession::edit(target.client.clone(), record);
        self.state = State::FormOpen(Box::new(form));
        Ok(())
    }

    pub fn form(&self) -> Option<&FormSession> {
        match &self.state {
            State::FormOpen(form) => Some(&**form),
            _ => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut FormSession> {
        match &mut self.state {
            State::FormOpen(form) => Some(&mut **form),
            _ => None,
        }
    }

    /// Submit the open form. Success closes it; failure leaves it open with
    /// its error set, except for an authorization failure, which resets.
    pub async fn submit(
        &mut self,
        gateway: &dyn RecordGateway,
        session: Session,
    ) -> Result<VisitRecord, OutreachError> {
        let phase = self.phase();
        let State::FormOpen(form) = &mut self.state else {
            return Err(OutreachError::InvalidState(format!("submitting in {phase:?}")));
        };

        match form.submit(gateway, session).await {
            Ok(record) => {
                self.close();
                Ok(record)
            }
            Err(e) => {
                if e.is_unauthorized() {
                    self.reset();
                }
                Err(e)
            }
        }
    }

    /// Leave whatever is open and return to idle.
    pub fn close(&mut self) {
        self.state = State::Idle;
    }

    /// Clear all local state, after an authorization failure.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = State::Idle;
    }

    fn invalid(&self, action: &str) -> OutreachError {
        OutreachError::InvalidState(format!("{action} in {:?}", self.phase()))
    }
}
