use std::sync::LazyLock;

use kalinga_core::models::category::Category;

use super::visit_section;
use crate::ProgramForm;
use crate::schema::{FieldSpec, NumberRange, Section, identity_section};

pub struct MentalHealthForm;

impl ProgramForm for MentalHealthForm {
    fn category(&self) -> Category {
        Category::MentalHealth
    }

    fn sections(&self) -> &[Section] {
        static SECTIONS: LazyLock<Vec<Section>> = LazyLock::new(|| {
            vec![
                identity_section(),
                visit_section(vec![]),
                Section::new(
                    "screening",
                    "Screening",
                    vec![
                        // PHQ-9: nine items rated 0-3.
                        FieldSpec::number("phq9_score", "PHQ-9 Total", NumberRange::whole(0.0, 27.0)),
                        FieldSpec::choice(
                            "condition",
                            "Priority Condition",
                            &["depression", "psychosis", "epilepsy", "substance use", "self-harm", "other"],
                        ),
                        FieldSpec::flag("suicide_risk", "Suicide Risk Identified"),
                        FieldSpec::flag("on_medication", "On Psychotropic Medication"),
                        FieldSpec::flag("referred", "Referred to Specialist"),
                    ],
                ),
            ]
        });
        &SECTIONS
    }
}
