use std::sync::LazyLock;

use kalinga_core::models::category::Category;

use super::visit_section;
use crate::ProgramForm;
use crate::schema::{FieldSpec, Section, identity_section};

pub struct DisabilityForm;

const DISABILITY_TYPES: &[&str] = &[
    "deaf or hard of hearing",
    "intellectual",
    "learning",
    "mental",
    "orthopedic",
    "physical",
    "psychosocial",
    "speech and language",
    "visual",
    "cancer",
    "rare disease",
];

impl ProgramForm for DisabilityForm {
    fn category(&self) -> Category {
        Category::PersonWithDisability
    }

    fn sections(&self) -> &[Section] {
        static SECTIONS: LazyLock<Vec<Section>> = LazyLock::new(|| {
            vec![
                identity_section(),
                visit_section(vec![]),
                Section::new(
                    "functional",
                    "Functional Assessment",
                    vec![
                        FieldSpec::choice("disability_type", "Type of Disability", DISABILITY_TYPES)
                            .required(),
                        FieldSpec::choice("cause", "Cause", &["congenital", "acquired"]),
                        FieldSpec::text("pwd_id", "PWD ID No."),
                        FieldSpec::choice("adl", "Activities of Daily Living", &["independent", "partially dependent", "fully dependent"]),
                        FieldSpec::flag("assistive_device", "Uses Assistive Device"),
                        FieldSpec::flag("rehab_referral", "Referred for Rehabilitation"),
                    ],
                ),
            ]
        });
        &SECTIONS
    }
}
