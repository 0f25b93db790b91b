use axum::Json;
use axum::extract::Path;
use serde::Serialize;

use kalinga_core::models::category::Category;
use kalinga_forms::schema::Section;
use kalinga_forms::{FormAvailability, all_forms, lookup};

use crate::error::ApiError;

#[derive(Serialize)]
pub struct FormSummary {
    category: Category,
    label: &'static str,
    title: String,
}

#[derive(Serialize)]
pub struct FormDetail {
    category: Category,
    title: String,
    sections: Vec<Section>,
}

pub async fn list_forms() -> Json<Vec<FormSummary>> {
    let forms = all_forms()
        .iter()
        .map(|f| FormSummary {
            category: f.category(),
            label: f.category().label(),
            title: f.title().to_string(),
        })
        .collect();
    Json(forms)
}

pub async fn get_form(Path(slug): Path<String>) -> Result<Json<FormDetail>, ApiError> {
    match lookup(&slug) {
        FormAvailability::Available(form) => Ok(Json(FormDetail {
            category: form.category(),
            title: form.title().to_string(),
            sections: form.sections().to_vec(),
        })),
        FormAvailability::Unavailable { label } => {
            Err(ApiError::NotFound(format!("no form available for category: {label}")))
        }
    }
}
