use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use ts_rs::TS;

/// Valid range for a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NumberRange {
    pub min: f64,
    pub max: f64,
    pub step: Option<f64>,
}

impl NumberRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            step: None,
        }
    }

    pub const fn whole(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            step: Some(1.0),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        if value < self.min || value > self.max {
            return false;
        }
        if let Some(step) = self.step {
            let offset = value - self.min;
            let remainder = offset % step;
            // Allow floating point tolerance
            remainder < 1e-9 || (step - remainder) < 1e-9
        } else {
            true
        }
    }
}

/// What kind of value a field holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum FieldKind {
    Text,
    Number { range: NumberRange },
    /// ISO `YYYY-MM-DD`.
    Date,
    Choice { options: Vec<String> },
    Flag,
}

impl FieldKind {
    /// Convert raw text typed by a worker into the JSON value this kind stores.
    /// Blank input clears the field (`null`).
    pub fn parse_input(&self, raw: &str) -> Result<Value, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Value::Null);
        }

        match self {
            Self::Text => Ok(Value::String(raw.to_string())),
            Self::Number { .. } => raw
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(|n| serde_json::json!(n))
                .ok_or_else(|| format!("'{raw}' is not a number")),
            Self::Date => raw
                .parse::<jiff::civil::Date>()
                .map(|d| Value::String(d.to_string()))
                .map_err(|_| format!("'{raw}' is not a YYYY-MM-DD date")),
            Self::Choice { options } => options
                .iter()
                .find(|o| o.eq_ignore_ascii_case(raw))
                .map(|o| Value::String(o.clone()))
                .ok_or_else(|| format!("'{raw}' is not one of: {}", options.join(", "))),
            Self::Flag => match raw.to_ascii_lowercase().as_str() {
                "y" | "yes" | "true" | "1" => Ok(Value::Bool(true)),
                "n" | "no" | "false" | "0" => Ok(Value::Bool(false)),
                _ => Err(format!("'{raw}' is not yes/no")),
            },
        }
    }
}

/// Who may write a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FieldAccess {
    /// Filled in by the worker.
    Editable,
    /// Computed from other fields; recomputed on every edit.
    Derived,
    /// Copied from the client's registration; never edited or submitted here.
    Identity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldSpec {
    pub id: String,
    pub label: String,
    pub kind: FieldKind,
    pub access: FieldAccess,
    pub required: bool,
}

impl FieldSpec {
    fn new(id: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind,
            access: FieldAccess::Editable,
            required: false,
        }
    }

    pub fn text(id: &str, label: &str) -> Self {
        Self::new(id, label, FieldKind::Text)
    }

    pub fn number(id: &str, label: &str, range: NumberRange) -> Self {
        Self::new(id, label, FieldKind::Number { range })
    }

    pub fn date(id: &str, label: &str) -> Self {
        Self::new(id, label, FieldKind::Date)
    }

    pub fn choice(id: &str, label: &str, options: &[&str]) -> Self {
        let options = options.iter().map(|o| o.to_string()).collect();
        Self::new(id, label, FieldKind::Choice { options })
    }

    pub fn flag(id: &str, label: &str) -> Self {
        Self::new(id, label, FieldKind::Flag)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn derived(mut self) -> Self {
        self.access = FieldAccess::Derived;
        self
    }

    pub fn identity(mut self) -> Self {
        self.access = FieldAccess::Identity;
        self
    }

    pub fn is_editable(&self) -> bool {
        self.access == FieldAccess::Editable
    }

    /// Whether this field's value is sent to the record store.
    pub fn is_submitted(&self) -> bool {
        self.access != FieldAccess::Identity
    }
}

/// A titled group of fields on a clinical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Section {
    pub id: String,
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

impl Section {
    pub fn new(id: &str, name: &str, fields: Vec<FieldSpec>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            fields,
        }
    }
}

pub const CLIENT_NAME: &str = "client_name";
pub const CLIENT_ADDRESS: &str = "address";

/// The read-only identity block at the top of every clinical form.
pub fn identity_section() -> Section {
    Section::new(
        "identity",
        "Client",
        vec![
            FieldSpec::text(CLIENT_NAME, "Name").identity(),
            FieldSpec::text(CLIENT_ADDRESS, "Address").identity(),
        ],
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ValidationIssue {
    Missing,
    WrongType,
    OutOfRange,
    NotAnOption,
    InvalidDate,
}

/// A field value that would be rejected before any request is sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("{message}")]
pub struct ValidationError {
    pub field_id: String,
    pub issue: ValidationIssue,
    pub message: String,
}

impl ValidationError {
    pub(crate) fn new(field: &FieldSpec, issue: ValidationIssue, detail: &str) -> Self {
        Self {
            field_id: field.id.clone(),
            issue,
            message: format!("{}: {detail}", field.label),
        }
    }
}

/// Check one value against its field spec. `None` and `null` count as blank.
pub(crate) fn check_value(field: &FieldSpec, value: Option<&Value>) -> Option<ValidationError> {
    let blank = match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    };
    if blank {
        return field
            .required
            .then(|| ValidationError::new(field, ValidationIssue::Missing, "is required"));
    }
    let value = value?;

    match &field.kind {
        FieldKind::Text => (!value.is_string())
            .then(|| ValidationError::new(field, ValidationIssue::WrongType, "must be text")),
        FieldKind::Number { range } => match value.as_f64() {
            None => Some(ValidationError::new(
                field,
                ValidationIssue::WrongType,
                "must be a number",
            )),
            Some(n) if !range.contains(n) => Some(ValidationError::new(
                field,
                ValidationIssue::OutOfRange,
                &format!("{n} is outside range [{}, {}]", range.min, range.max),
            )),
            Some(_) => None,
        },
        FieldKind::Date => match value.as_str() {
            Some(s) if s.parse::<jiff::civil::Date>().is_ok() => None,
            _ => Some(ValidationError::new(
                field,
                ValidationIssue::InvalidDate,
                "must be a YYYY-MM-DD date",
            )),
        },
        FieldKind::Choice { options } => match value.as_str() {
            Some(s) if options.iter().any(|o| o == s) => None,
            _ => Some(ValidationError::new(
                field,
                ValidationIssue::NotAnOption,
                &format!("must be one of: {}", options.join(", ")),
            )),
        },
        FieldKind::Flag => (!value.is_boolean())
            .then(|| ValidationError::new(field, ValidationIssue::WrongType, "must be yes/no")),
    }
}
