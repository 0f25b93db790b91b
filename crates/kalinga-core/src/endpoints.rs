//! REST path conventions.
//!
//! Pure string functions, shared by the HTTP gateway and the record store
//! router so both sides agree on the canonical layout of every endpoint.

use crate::models::category::Category;
use crate::models::client::ClientId;
use crate::models::visit_record::RecordId;

/// Header carrying the signed-in worker's id.
pub const WORKER_ID_HEADER: &str = "x-worker-id";

/// Header carrying the signed-in worker's role (`admin` or `worker`).
pub const WORKER_ROLE_HEADER: &str = "x-worker-role";

pub const HEALTH: &str = "/health";

pub const FORMS: &str = "/forms";

/// Form schema of one program.
pub fn form_schema(category: Category) -> String {
    format!("/forms/{}", category.slug())
}

pub const CLIENTS: &str = "/clients";

pub const CLIENT_INTAKE: &str = "/clients/intake";

pub const UPDATE_CLIENT_CONDITION: &str = "/update-client-condition";

pub fn client_status(id: ClientId) -> String {
    format!("/clients/{id}/status")
}

pub fn client_position(id: ClientId) -> String {
    format!("/clients/{id}/position")
}

/// `POST` creates a visit record for the category.
pub fn category_records(category: Category) -> String {
    format!("/{}", category.slug())
}

/// `PUT` amends one visit record.
pub fn category_record(category: Category, id: RecordId) -> String {
    format!("/{}/{id}", category.slug())
}

/// Existing visit records of one client in one category.
pub fn client_visit_records(category: Category, client: ClientId) -> String {
    format!("/{}-form/{client}", category.slug())
}

pub fn category_clients(category: Category) -> String {
    format!("/{}/clients", category.slug())
}

pub fn count_total_clients(category: Category) -> String {
    format!("/{}/count-total-clients", category.slug())
}

pub fn age_segmentation(category: Category) -> String {
    format!("/{}/age-segmentation", category.slug())
}

pub fn new_registered(category: Category) -> String {
    format!("/{}/new-registered", category.slug())
}

/// Visit-record updates over time.
pub fn category_data(category: Category) -> String {
    format!("/{0}/{0}-data", category.slug())
}
