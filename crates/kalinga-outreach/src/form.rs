//! Clinical form session: one (client, program) pair, in create or edit mode.

use serde::Serialize;
use serde_json::Value;

use kalinga_core::models::category::Category;
use kalinga_core::models::client::ClientIdentity;
use kalinga_core::models::session::Session;
use kalinga_core::models::visit_record::{
    FieldValues, NewVisitRecord, RecordId, VisitRecord, VisitRecordUpdate,
};
use kalinga_forms::error::FormError;
use kalinga_forms::schema::{CLIENT_ADDRESS, CLIENT_NAME, FieldAccess, ValidationError};
use kalinga_forms::{ProgramForm, form_for};
use kalinga_gateway::RecordGateway;

use crate::error::OutreachError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FormMode {
    /// Submitting appends a new visit record.
    Create,
    /// Submitting amends this record.
    Edit { record_id: RecordId },
}

pub struct FormSession {
    client: ClientIdentity,
    category: Category,
    form: &'static dyn ProgramForm,
    mode: FormMode,
    values: FieldValues,
    baseline: FieldValues,
    last_error: Option<String>,
}

impl std::fmt::Debug for FormSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormSession")
            .field("client", &self.client.id)
            .field("category", &self.category)
            .field("mode", &self.mode)
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}

impl FormSession {
    /// A blank form.
    pub fn create(client: ClientIdentity, category: Category) -> Self {
        Self::new(client, category, FormMode::Create, FieldValues::new())
    }

    /// A form pre-populated from an existing record. Only editable schema
    /// fields are taken from the record; derived fields are recomputed.
    pub fn edit(client: ClientIdentity, seed: &VisitRecord) -> Self {
        let form = form_for(seed.category);
        let values = seed
            .values
            .iter()
            .filter(|(id, _)| form.field(id).is_some_and(|f| f.is_editable()))
            .map(|(id, v)| (id.clone(), v.clone()))
            .collect();
        Self::new(
            client,
            seed.category,
            FormMode::Edit { record_id: seed.id },
            values,
        )
    }

    fn new(client: ClientIdentity, category: Category, mode: FormMode, mut values: FieldValues) -> Self {
        let form = form_for(category);
        form.derive(&mut values);
        Self {
            client,
            category,
            form,
            mode,
            baseline: values.clone(),
            values,
            last_error: None,
        }
    }

    pub fn client(&self) -> &ClientIdentity {
        &self.client
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn title(&self) -> &str {
        self.form.title()
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn value(&self, field_id: &str) -> Option<&Value> {
        self.values.get(field_id)
    }

    /// Set one editable field, then recompute every derived field.
    pub fn set_field(&mut self, field_id: &str, value: Value) -> Result<(), FormError> {
        let form = self.form;
        let field = form.field(field_id).ok_or_else(|| FormError::UnknownField {
            category: self.category,
            field_id: field_id.to_string(),
        })?;
        if !field.is_editable() {
            return Err(FormError::ReadOnly(field_id.to_string()));
        }

        self.values.insert(field_id.to_string(), value);
        form.derive(&mut self.values);
        Ok(())
    }

    /// Parse raw text according to the field's kind and set it.
    pub fn set_input(&mut self, field_id: &str, raw: &str) -> Result<(), FormError> {
        let form = self.form;
        let field = form.field(field_id).ok_or_else(|| FormError::UnknownField {
            category: self.category,
            field_id: field_id.to_string(),
        })?;
        let value = field
            .kind
            .parse_input(raw)
            .map_err(|message| FormError::InvalidInput {
                field_id: field_id.to_string(),
                message,
            })?;
        self.set_field(field_id, value)
    }

    /// Whether any value differs from what the form was opened with.
    /// A field cleared to `null` counts as never set.
    pub fn is_dirty(&self) -> bool {
        non_null(&self.values) != non_null(&self.baseline)
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        self.form.validate(&self.values)
    }

    /// Message of the last failed submission, cleared on success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Validate locally, then create or amend the record.
    ///
    /// Nothing is sent when validation fails. On any failure the session
    /// keeps its values and records the error for display.
    pub async fn submit(
        &mut self,
        gateway: &dyn RecordGateway,
        session: Session,
    ) -> Result<VisitRecord, OutreachError> {
        let errors = self.validate();
        if !errors.is_empty() {
            let err = OutreachError::Validation(errors);
            self.last_error = Some(err.to_string());
            return Err(err);
        }

        let values = self.form.submission(&self.values);
        let result = match self.mode {
            FormMode::Create => {
                let record = NewVisitRecord {
                    client_id: self.client.id,
                    values,
                };
                gateway.create_record(session, self.category, record).await
            }
            FormMode::Edit { record_id } => {
                let update = VisitRecordUpdate { values };
                gateway
                    .update_record(session, self.category, record_id, update)
                    .await
            }
        };

        match result {
            Ok(record) => {
                tracing::info!(
                    record_id = %record.id,
                    client_id = %self.client.id,
                    category = %self.category,
                    mode = ?self.mode,
                    "visit record submitted"
                );
                self.last_error = None;
                self.baseline = self.values.clone();
                Ok(record)
            }
            Err(e) => {
                let err = OutreachError::from(e);
                tracing::warn!(
                    client_id = %self.client.id,
                    category = %self.category,
                    error = %err,
                    "visit record submission failed"
                );
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Render sections with current values. Identity fields come from the
    /// client and are never editable.
    pub fn view(&self) -> FormView {
        let sections = self
            .form
            .sections()
            .iter()
            .map(|section| SectionView {
                name: section.name.clone(),
                fields: section
                    .fields
                    .iter()
                    .map(|field| {
                        let value = match (field.access, field.id.as_str()) {
                            (FieldAccess::Identity, CLIENT_NAME) => {
                                Some(Value::String(self.client.name.clone()))
                            }
                            (FieldAccess::Identity, CLIENT_ADDRESS) => {
                                Some(Value::String(self.client.address.clone()))
                            }
                            _ => self.values.get(&field.id).filter(|v| !v.is_null()).cloned(),
                        };
                        FieldView {
                            id: field.id.clone(),
                            label: field.label.clone(),
                            value,
                            editable: field.is_editable(),
                            required: field.required,
                        }
                    })
                    .collect(),
            })
            .collect();

        FormView {
            title: self.title().to_string(),
            mode: self.mode,
            sections,
        }
    }
}

fn non_null(values: &FieldValues) -> Vec<(&String, &Value)> {
    values.iter().filter(|(_, v)| !v.is_null()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub title: String,
    pub mode: FormMode,
    pub sections: Vec<SectionView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub name: String,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub id: String,
    pub label: String,
    pub value: Option<Value>,
    pub editable: bool,
    pub required: bool,
}
