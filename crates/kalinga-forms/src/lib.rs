//! kalinga-forms
//!
//! Clinical form schemas for every health program. Pure data plus the
//! validation and derivation rules that run before a visit record is sent to
//! the record store.

pub mod bmi;
pub mod error;
pub mod forms;
pub mod schema;

use kalinga_core::models::category::Category;
use kalinga_core::models::visit_record::FieldValues;

use schema::{FieldAccess, FieldSpec, Section, ValidationError};

/// Trait implemented by each program's clinical form.
pub trait ProgramForm: Send + Sync {
    fn category(&self) -> Category;

    /// Heading shown above the form.
    fn title(&self) -> &str {
        self.category().form_title()
    }

    /// Sections in display order. The first is always the identity block.
    fn sections(&self) -> &[Section];

    fn field(&self, id: &str) -> Option<&FieldSpec> {
        self.sections()
            .iter()
            .flat_map(|s| &s.fields)
            .find(|f| f.id == id)
    }

    /// Check every editable field. Identity and derived fields are not the
    /// worker's input and are skipped; keys outside the schema are ignored.
    fn validate(&self, values: &FieldValues) -> Vec<ValidationError> {
        self.sections()
            .iter()
            .flat_map(|s| &s.fields)
            .filter(|f| f.is_editable())
            .filter_map(|f| schema::check_value(f, values.get(&f.id)))
            .collect()
    }

    /// Recompute every derived field from its inputs.
    fn derive(&self, values: &mut FieldValues) {
        if self
            .field(bmi::BMI)
            .is_some_and(|f| f.access == FieldAccess::Derived)
        {
            bmi::apply(values);
        }
    }

    /// The subset of `values` sent to the record store: editable and derived
    /// schema fields only.
    fn submission(&self, values: &FieldValues) -> FieldValues {
        self.sections()
            .iter()
            .flat_map(|s| &s.fields)
            .filter(|f| f.is_submitted())
            .filter_map(|f| values.get(&f.id).map(|v| (f.id.clone(), v.clone())))
            .collect()
    }
}

/// The form for a program. Every category has one.
pub fn form_for(category: Category) -> &'static dyn ProgramForm {
    match category {
        Category::Pregnant => &forms::pregnant::PregnantForm,
        Category::Newborn => &forms::newborn::NewbornForm,
        Category::ChildImmunization => &forms::immunization::ImmunizationForm,
        Category::UnderFiveNutrition => &forms::nutrition::NutritionForm,
        Category::Adolescent => &forms::adolescent::AdolescentForm,
        Category::WraFamilyPlanning => &forms::family_planning::FamilyPlanningForm,
        Category::SeniorCitizen => &forms::senior_citizen::SeniorCitizenForm,
        Category::PersonWithDisability => &forms::disability::DisabilityForm,
        Category::Hypertension => &forms::hypertension::HypertensionForm,
        Category::Diabetes => &forms::diabetes::DiabetesForm,
        Category::Tuberculosis => &forms::tuberculosis::TuberculosisForm,
        Category::MentalHealth => &forms::mental_health::MentalHealthForm,
        Category::Deworming => &forms::deworming::DewormingForm,
    }
}

/// Return all registered forms, in `Category::ALL` order.
pub fn all_forms() -> Vec<&'static dyn ProgramForm> {
    Category::ALL.into_iter().map(form_for).collect()
}

/// Result of resolving a category label to its form.
#[derive(Clone)]
pub enum FormAvailability {
    Available(&'static dyn ProgramForm),
    /// The label names no known program; the UI shows "no form available".
    Unavailable { label: String },
}

impl FormAvailability {
    pub fn form(&self) -> Option<&'static dyn ProgramForm> {
        match self {
            Self::Available(form) => Some(*form),
            Self::Unavailable { .. } => None,
        }
    }
}

impl std::fmt::Debug for FormAvailability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(form) => f.debug_tuple("Available").field(&form.category()).finish(),
            Self::Unavailable { label } => {
                f.debug_struct("Unavailable").field("label", label).finish()
            }
        }
    }
}

/// Look up a form by category label or slug.
pub fn lookup(label: &str) -> FormAvailability {
    match Category::from_label(label) {
        Some(category) => FormAvailability::Available(form_for(category)),
        None => {
            tracing::debug!(label, "no form registered for category label");
            FormAvailability::Unavailable {
                label: label.to_string(),
            }
        }
    }
}
