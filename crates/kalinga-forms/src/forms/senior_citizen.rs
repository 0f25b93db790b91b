use std::sync::LazyLock;

use kalinga_core::models::category::Category;

use super::{visit_section, vitals_section};
use crate::ProgramForm;
use crate::schema::{FieldSpec, Section, identity_section};

pub struct SeniorCitizenForm;

impl ProgramForm for SeniorCitizenForm {
    fn category(&self) -> Category {
        Category::SeniorCitizen
    }

    fn sections(&self) -> &[Section] {
        static SECTIONS: LazyLock<Vec<Section>> = LazyLock::new(|| {
            vec![
                identity_section(),
                visit_section(vec![]),
                vitals_section(true),
                Section::new(
                    "assessment",
                    "Geriatric Assessment",
                    vec![
                        FieldSpec::text("senior_id", "Senior Citizen ID No."),
                        FieldSpec::flag("pneumococcal", "Pneumococcal Vaccine Given"),
                        FieldSpec::flag("influenza", "Influenza Vaccine Given"),
                        FieldSpec::choice("mobility", "Mobility", &["independent", "assisted", "bedridden"]),
                        FieldSpec::flag("fall_history", "Fall in the Past Year"),
                        FieldSpec::flag("visual_impairment", "Visual Impairment"),
                    ],
                ),
            ]
        });
        &SECTIONS
    }
}
