use std::sync::LazyLock;

use kalinga_core::models::category::Category;

use super::{visit_section, vitals_section};
use crate::ProgramForm;
use crate::schema::{FieldSpec, Section, identity_section};

pub struct HypertensionForm;

impl ProgramForm for HypertensionForm {
    fn category(&self) -> Category {
        Category::Hypertension
    }

    fn sections(&self) -> &[Section] {
        static SECTIONS: LazyLock<Vec<Section>> = LazyLock::new(|| {
            let mut vitals = vitals_section(true);
            for field in &mut vitals.fields {
                if field.id.starts_with("bp_") {
                    field.required = true;
                }
            }

            vec![
                identity_section(),
                visit_section(vec![]),
                vitals,
                Section::new(
                    "management",
                    "Management",
                    vec![
                        FieldSpec::choice("stage", "Classification", &["elevated", "stage 1", "stage 2", "crisis"]),
                        FieldSpec::flag("on_maintenance", "On Maintenance Medication"),
                        FieldSpec::text("medication", "Medication"),
                        FieldSpec::flag("smoker", "Current Smoker"),
                        FieldSpec::flag("lifestyle_counseling", "Lifestyle Counseling Given"),
                    ],
                ),
            ]
        });
        &SECTIONS
    }
}
