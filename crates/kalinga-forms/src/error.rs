use thiserror::Error;

use kalinga_core::models::category::Category;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("unknown field '{field_id}' on the {category} form")]
    UnknownField { category: Category, field_id: String },

    #[error("field '{0}' is read-only")]
    ReadOnly(String),

    #[error("invalid input for '{field_id}': {message}")]
    InvalidInput { field_id: String, message: String },
}
