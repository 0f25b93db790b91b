use std::sync::LazyLock;

use kalinga_core::models::category::Category;

use super::{visit_section, vitals_section};
use crate::ProgramForm;
use crate::schema::{FieldSpec, NumberRange, Section, identity_section};

/// Directly observed treatment, short course.
pub struct TuberculosisForm;

impl ProgramForm for TuberculosisForm {
    fn category(&self) -> Category {
        Category::Tuberculosis
    }

    fn sections(&self) -> &[Section] {
        static SECTIONS: LazyLock<Vec<Section>> = LazyLock::new(|| {
            vec![
                identity_section(),
                visit_section(vec![]),
                Section::new(
                    "case",
                    "Case Details",
                    vec![
                        FieldSpec::text("tb_case_number", "TB Case Number").required(),
                        FieldSpec::choice(
                            "registration_group",
                            "Registration Group",
                            &["new", "relapse", "treatment after failure", "treatment after lost to follow-up", "other"],
                        ),
                        FieldSpec::choice("anatomic_site", "Anatomic Site", &["pulmonary", "extra-pulmonary"]),
                        FieldSpec::date("treatment_start", "Treatment Start Date"),
                    ],
                ),
                Section::new(
                    "treatment",
                    "Treatment",
                    vec![
                        FieldSpec::choice("phase", "Phase", &["intensive", "continuation"]).required(),
                        FieldSpec::number("doses_observed", "Doses Observed", NumberRange::whole(0.0, 240.0)),
                        FieldSpec::choice("sputum_result", "Sputum Result", &["positive", "negative", "not done"]),
                        FieldSpec::choice(
                            "outcome",
                            "Treatment Outcome",
                            &["cured", "treatment completed", "failed", "died", "lost to follow-up", "not evaluated"],
                        ),
                    ],
                ),
                vitals_section(false),
            ]
        });
        &SECTIONS
    }
}
