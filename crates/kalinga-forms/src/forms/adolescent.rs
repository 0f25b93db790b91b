use std::sync::LazyLock;

use kalinga_core::models::category::Category;

use super::{visit_section, vitals_section};
use crate::ProgramForm;
use crate::schema::{FieldSpec, Section, identity_section};

pub struct AdolescentForm;

impl ProgramForm for AdolescentForm {
    fn category(&self) -> Category {
        Category::Adolescent
    }

    fn sections(&self) -> &[Section] {
        static SECTIONS: LazyLock<Vec<Section>> = LazyLock::new(|| {
            vec![
                identity_section(),
                visit_section(vec![]),
                vitals_section(true),
                Section::new(
                    "heeadsss",
                    "Psychosocial Assessment",
                    vec![
                        FieldSpec::choice("schooling", "Schooling", &["in school", "out of school", "working"]),
                        FieldSpec::flag("substance_use", "Substance Use"),
                        FieldSpec::flag("sexually_active", "Sexually Active"),
                        FieldSpec::flag("depression_risk", "At Risk for Depression"),
                        FieldSpec::flag("hpv_vaccine", "HPV Vaccine Given"),
                        FieldSpec::flag("referred", "Referred to Facility"),
                    ],
                ),
            ]
        });
        &SECTIONS
    }
}
