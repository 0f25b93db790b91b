//! The field client's command language.
//!
//! One line in, one block of text out. Parsing is pure; [`execute`] drives
//! the outreach engine against a [`RecordGateway`].

use std::fmt::Write as _;
use std::str::FromStr;

use jiff::civil::Date;

use kalinga_core::models::category::Category;
use kalinga_core::models::client::{
    Client, ClientCondition, ClientId, ClientStatus, NewClient, Position, StatusTransition,
};
use kalinga_core::models::session::WorkerId;
use kalinga_core::models::statistics::{TimeWindow, Variant};
use kalinga_gateway::RecordGateway;
use kalinga_outreach::OutreachError;
use kalinga_outreach::aggregation::{self, DashboardRequest, DashboardSnapshot, Panel};
use kalinga_outreach::directory;
use kalinga_outreach::form::{FormMode, FormView};
use kalinga_outreach::reconcile::{Choice, LookupOutcome};

use crate::state::FieldState;

pub const HELP: &str = "\
clients [active|pending|inactive] [search]   list a lifecycle queue
roster <program> [search]                    list a program's clients
register <name> | <address>                  register a client
intake <name> | <address>                    submit a self-service intake
activate <client> <worker>                   activate intake and assign it to a worker
deactivate|restore <client>                  change a client's status
condition <client> <condition>               permanent_residence, temporary, deceased, transfer
position <client> <lat> <lon>                set a client's map position
enroll <client> <program>                    enroll a client in a program
open <client> <program>                      open the program form for a client
new | existing                               answer the existing-records prompt
select <n>                                   edit data entry #n
set <field> <value>                          fill a form field (blank clears)
show                                         show the open form
submit                                       save the open form
retry                                        retry a failed records lookup
close                                        discard the open form
dashboard <program> [YYYY-MM | from..to]     program statistics
quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Clients { status: ClientStatus, term: String },
    Roster { category: Category, term: String },
    Register(NewClient),
    Intake(NewClient),
    Activate { client: ClientId, worker: WorkerId },
    Status { client: ClientId, transition: StatusTransition },
    Condition { client: ClientId, condition: ClientCondition },
    Position { client: ClientId, position: Position },
    Enroll { client: ClientId, category: Category },
    Open { client: ClientId, category: Category },
    Choose(Choice),
    Select(usize),
    Set { field: String, value: String },
    Show,
    Submit,
    Retry,
    Close,
    Dashboard { category: Category, window: TimeWindow },
    Quit,
}

fn client_id(raw: Option<&str>) -> eyre::Result<ClientId> {
    let raw = raw.ok_or_else(|| eyre::eyre!("missing client id"))?;
    let id = raw
        .trim_start_matches('#')
        .parse::<u64>()
        .map_err(|_| eyre::eyre!("'{raw}' is not a client id"))?;
    Ok(ClientId(id))
}

fn category(raw: Option<&str>) -> eyre::Result<Category> {
    let raw = raw.ok_or_else(|| eyre::eyre!("missing program"))?;
    Ok(Category::from_str(raw)?)
}

fn new_client(rest: &str) -> eyre::Result<NewClient> {
    let (name, address) = rest
        .split_once('|')
        .ok_or_else(|| eyre::eyre!("expected: <name> | <address>"))?;
    Ok(NewClient {
        name: name.trim().to_string(),
        address: address.trim().to_string(),
        ..NewClient::default()
    })
}

fn window(raw: Option<&str>) -> eyre::Result<TimeWindow> {
    let Some(raw) = raw else {
        return Ok(TimeWindow::All);
    };
    if let Some((from, to)) = raw.split_once("..") {
        return Ok(TimeWindow::Range {
            from: from.parse::<Date>()?,
            to: to.parse::<Date>()?,
        });
    }
    let (year, month) = raw
        .split_once('-')
        .ok_or_else(|| eyre::eyre!("expected YYYY-MM or YYYY-MM-DD..YYYY-MM-DD"))?;
    Ok(TimeWindow::Month {
        year: year.parse()?,
        month: month.parse()?,
    })
}

/// Parse one input line. Blank lines parse to `None`.
pub fn parse(line: &str) -> eyre::Result<Option<Command>> {
    let line = line.trim();
    let Some((verb, rest)) = line
        .split_once(char::is_whitespace)
        .map(|(v, r)| (v, r.trim()))
        .or_else(|| (!line.is_empty()).then_some((line, "")))
    else {
        return Ok(None);
    };
    let mut args = rest.split_whitespace();

    let command = match verb.to_ascii_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "clients" => {
            let status = match args.next() {
                Some(s) => ClientStatus::from_str(s)?,
                None => ClientStatus::Active,
            };
            Command::Clients {
                status,
                term: args.collect::<Vec<_>>().join(" "),
            }
        }
        "roster" => Command::Roster {
            category: category(args.next())?,
            term: args.collect::<Vec<_>>().join(" "),
        },
        "register" => Command::Register(new_client(rest)?),
        "intake" => Command::Intake(new_client(rest)?),
        "activate" => {
            let client = client_id(args.next())?;
            let raw = args.next().ok_or_else(|| eyre::eyre!("missing worker id"))?;
            let worker = raw
                .parse::<u64>()
                .map_err(|_| eyre::eyre!("'{raw}' is not a worker id"))?;
            Command::Activate {
                client,
                worker: WorkerId(worker),
            }
        }
        "deactivate" | "restore" => {
            let transition = match verb.to_ascii_lowercase().as_str() {
                "deactivate" => StatusTransition::Deactivate,
                _ => StatusTransition::Restore,
            };
            Command::Status {
                client: client_id(args.next())?,
                transition,
            }
        }
        "condition" => {
            let client = client_id(args.next())?;
            let raw = args.next().ok_or_else(|| eyre::eyre!("missing condition"))?;
            let condition = serde_json::from_value(serde_json::json!(raw.to_ascii_lowercase()))
                .map_err(|_| eyre::eyre!("'{raw}' is not a condition"))?;
            Command::Condition { client, condition }
        }
        "position" => {
            let client = client_id(args.next())?;
            let (Some(lat), Some(lon)) = (args.next(), args.next()) else {
                return Err(eyre::eyre!("expected: position <client> <lat> <lon>"));
            };
            Command::Position {
                client,
                position: Position {
                    latitude: lat.parse()?,
                    longitude: lon.parse()?,
                },
            }
        }
        "enroll" => Command::Enroll {
            client: client_id(args.next())?,
            category: category(args.next())?,
        },
        "open" => Command::Open {
            client: client_id(args.next())?,
            category: category(args.next())?,
        },
        "new" => Command::Choose(Choice::CreateNew),
        "existing" => Command::Choose(Choice::ProceedToExisting),
        "select" => {
            let raw = args.next().ok_or_else(|| eyre::eyre!("missing entry number"))?;
            Command::Select(raw.trim_start_matches('#').parse()?)
        }
        "set" => {
            let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            if field.is_empty() {
                return Err(eyre::eyre!("expected: set <field> <value>"));
            }
            Command::Set {
                field: field.to_string(),
                value: value.trim().to_string(),
            }
        }
        "show" => Command::Show,
        "submit" => Command::Submit,
        "retry" => Command::Retry,
        "close" => Command::Close,
        "dashboard" => Command::Dashboard {
            category: category(args.next())?,
            window: window(args.next())?,
        },
        "quit" | "exit" => Command::Quit,
        other => return Err(eyre::eyre!("unknown command '{other}' (try `help`)")),
    };
    Ok(Some(command))
}

/// Clear local state when the session is no longer authorized.
fn settle<T>(state: &mut FieldState, result: Result<T, OutreachError>) -> eyre::Result<T> {
    result.map_err(|e| {
        if e.is_unauthorized() {
            state.clear();
        }
        eyre::Report::new(e)
    })
}

/// Run one command and return the text to show.
pub async fn execute(
    state: &mut FieldState,
    gateway: &dyn RecordGateway,
    command: Command,
) -> eyre::Result<String> {
    let session = state.session;
    match command {
        Command::Help => Ok(HELP.to_string()),
        Command::Quit => Ok(String::new()),

        Command::Clients { status, term } => {
            let result = state.queue_mut(status).fetch(gateway, session).await;
            settle(state, result)?;
            Ok(client_list(state.queue_mut(status).search(&term)))
        }
        Command::Roster { category, term } => {
            let result = state.roster_mut(category).fetch(gateway, session).await;
            settle(state, result)?;
            Ok(client_list(state.roster_mut(category).search(&term)))
        }
        Command::Register(new) => {
            let result = directory::register_client(gateway, session, new).await;
            let client = settle(state, result)?;
            Ok(format!("registered {}", client_line(&client)))
        }
        Command::Intake(new) => {
            let client = directory::submit_intake(gateway, new).await?;
            Ok(format!("intake submitted {}", client_line(&client)))
        }
        Command::Activate { client, worker } => {
            if !state.pending.contains(client) {
                let result = state.pending.fetch(gateway, session).await;
                settle(state, result)?;
            }
            let result = state.pending.activate(gateway, session, client, worker).await;
            let updated = settle(state, result)?;
            Ok(format!(
                "{} is now {} (worker {worker})",
                client_line(&updated),
                updated.status
            ))
        }
        Command::Status { client, transition } => {
            let from = match transition {
                StatusTransition::Activate => ClientStatus::Pending,
                StatusTransition::Deactivate => ClientStatus::Active,
                StatusTransition::Restore => ClientStatus::Inactive,
            };
            let queue = state.queue_mut(from);
            if !queue.contains(client) {
                let result = queue.fetch(gateway, session).await;
                settle(state, result)?;
            }
            let result = state
                .queue_mut(from)
                .transition(gateway, session, client, transition)
                .await;
            let updated = settle(state, result)?;
            // Rosters list active clients only.
            state.roster = None;
            Ok(format!("{} is now {}", client_line(&updated), updated.status))
        }
        Command::Condition { client, condition } => {
            let result = directory::update_condition(gateway, session, client, condition).await;
            let updated = settle(state, result)?;
            Ok(format!("{} condition: {:?}", client_line(&updated), updated.condition))
        }
        Command::Position { client, position } => {
            let result = directory::update_position(gateway, session, client, position).await;
            let updated = settle(state, result)?;
            Ok(format!(
                "{} at {}, {}",
                client_line(&updated),
                position.latitude,
                position.longitude
            ))
        }
        Command::Enroll { client, category } => {
            let result = directory::enroll(gateway, session, client, category).await;
            settle(state, result)?;
            Ok(format!("client #{client} enrolled in {category}"))
        }

        Command::Open { client, category } => {
            let client = find_client(state, gateway, client).await?;
            let result = state
                .reconciler
                .open(gateway, session, client.identity(), category)
                .await;
            let outcome = settle(state, result)?;
            Ok(lookup_text(state, outcome))
        }
        Command::Retry => {
            let result = state.reconciler.retry_lookup(gateway, session).await;
            let outcome = settle(state, result)?;
            Ok(lookup_text(state, outcome))
        }
        Command::Choose(choice) => {
            state.reconciler.choose(choice)?;
            match choice {
                Choice::CreateNew => Ok(form_text(state)),
                Choice::ProceedToExisting => {
                    let mut out = String::new();
                    for entry in state.reconciler.entries() {
                        let _ = writeln!(
                            out,
                            "{}. {}  (record #{}, updated {})",
                            entry.number, entry.label, entry.record_id, entry.updated_at
                        );
                    }
                    out.push_str("Type `select <n>` to edit one.");
                    Ok(out)
                }
            }
        }
        Command::Select(number) => {
            state.reconciler.select(number)?;
            Ok(form_text(state))
        }
        Command::Set { field, value } => {
            let form = state
                .reconciler
                .form_mut()
                .ok_or_else(|| eyre::eyre!("no form is open"))?;
            form.set_input(&field, &value)?;
            let bmi = form.value("bmi").map(|v| format!(" (BMI {v})")).unwrap_or_default();
            Ok(format!("{field} set{bmi}"))
        }
        Command::Show => Ok(form_text(state)),
        Command::Submit => {
            let result = state.reconciler.submit(gateway, session).await;
            let record = settle(state, result)?;
            Ok(format!(
                "saved record #{} for client #{}",
                record.id, record.client_id
            ))
        }
        Command::Close => {
            state.reconciler.close();
            Ok("form closed".to_string())
        }

        Command::Dashboard { category, window } => {
            let request = DashboardRequest::new(category)
                .window(window)
                .variant(Variant::Sex);
            let generation = state.dashboard.begin();
            let result = aggregation::load(gateway, session, request).await;
            let applied = state.dashboard.apply(generation, result);
            if let Err(e) = &applied
                && e.is_unauthorized()
            {
                state.clear();
            }
            applied?;
            Ok(state
                .dashboard
                .snapshot()
                .map(dashboard_text)
                .unwrap_or_default())
        }
    }
}

async fn find_client(
    state: &mut FieldState,
    gateway: &dyn RecordGateway,
    id: ClientId,
) -> eyre::Result<Client> {
    if let Some(client) = state.openable_client(id) {
        return Ok(client.clone());
    }
    let session = state.session;
    let result = state.active.fetch(gateway, session).await;
    settle(state, result)?;
    state
        .openable_client(id)
        .cloned()
        .ok_or_else(|| eyre::eyre!("client #{id} is not in your active list"))
}

fn client_line(client: &Client) -> String {
    format!("#{} {} ({})", client.id, client.name, client.address)
}

fn client_list(clients: Vec<&Client>) -> String {
    if clients.is_empty() {
        return "no clients".to_string();
    }
    clients
        .into_iter()
        .map(client_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn lookup_text(state: &FieldState, outcome: LookupOutcome) -> String {
    match outcome {
        LookupOutcome::FormOpened { assumed_empty } => {
            let form = form_text(state);
            if assumed_empty {
                format!("warning: existing records could not be checked\n{form}")
            } else {
                form
            }
        }
        LookupOutcome::ChoiceRequired { count } => format!(
            "{count} existing data entr{} found. Type `new` to add a visit or `existing` to edit one.",
            if count == 1 { "y" } else { "ies" }
        ),
        LookupOutcome::Failed { message } => {
            format!("could not check existing records: {message}\nType `retry` to try again.")
        }
        LookupOutcome::Stale => String::new(),
    }
}

fn form_text(state: &FieldState) -> String {
    state
        .reconciler
        .form()
        .map(|f| render_form(&f.view()))
        .unwrap_or_else(|| "no form is open".to_string())
}

pub fn render_form(view: &FormView) -> String {
    let mut out = String::new();
    let mode = match view.mode {
        FormMode::Create => "new record".to_string(),
        FormMode::Edit { record_id } => format!("editing record #{record_id}"),
    };
    let _ = writeln!(out, "== {} ({mode}) ==", view.title);
    for section in &view.sections {
        let _ = writeln!(out, "[{}]", section.name);
        for field in &section.fields {
            let value = field
                .value
                .as_ref()
                .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                .unwrap_or_default();
            let marker = match (field.editable, field.required) {
                (false, _) => " (read-only)",
                (true, true) => " *",
                (true, false) => "",
            };
            let _ = writeln!(out, "  {} [{}]{marker}: {value}", field.label, field.id);
        }
    }
    out.trim_end().to_string()
}

fn panel_text<T>(panel: &Panel<T>, render: impl FnOnce(&T) -> String) -> String {
    match panel {
        Panel::Loaded(v) => render(v),
        Panel::NoData => "no data".to_string(),
        Panel::Failed(e) => format!("failed: {e}"),
    }
}

pub fn dashboard_text(snapshot: &DashboardSnapshot) -> String {
    let series = |s: &kalinga_core::models::statistics::TimeSeries| {
        s.points
            .iter()
            .map(|p| format!("{}={}", p.period, p.count))
            .collect::<Vec<_>>()
            .join(" ")
    };
    let total = panel_text(&snapshot.total, |t| {
        let split = t
            .by_variant
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(" ");
        format!("{} {split}", t.total).trim_end().to_string()
    });
    let ages = panel_text(&snapshot.ages, |a| {
        a.buckets
            .iter()
            .map(|b| format!("{}={}", b.label, b.count))
            .collect::<Vec<_>>()
            .join(" ")
    });

    format!(
        "== {} ==\nclients: {total}\nages: {ages}\nregistered: {}\nupdates: {}",
        snapshot.request.category,
        panel_text(&snapshot.registrations, series),
        panel_text(&snapshot.updates, series),
    )
}
