use std::sync::LazyLock;

use kalinga_core::models::category::Category;

use super::visit_section;
use crate::ProgramForm;
use crate::schema::{FieldSpec, NumberRange, Section, identity_section};

pub struct DewormingForm;

impl ProgramForm for DewormingForm {
    fn category(&self) -> Category {
        Category::Deworming
    }

    fn sections(&self) -> &[Section] {
        static SECTIONS: LazyLock<Vec<Section>> = LazyLock::new(|| {
            vec![
                identity_section(),
                visit_section(vec![]),
                Section::new(
                    "dose",
                    "Deworming",
                    vec![
                        FieldSpec::choice("drug", "Drug", &["albendazole", "mebendazole"]).required(),
                        FieldSpec::choice("dose", "Dose", &["200 mg", "400 mg", "500 mg"]).required(),
                        FieldSpec::choice("round", "Round", &["1st", "2nd"]),
                        FieldSpec::text("school", "School"),
                        FieldSpec::number("grade_level", "Grade Level", NumberRange::whole(1.0, 12.0)),
                    ],
                ),
            ]
        });
        &SECTIONS
    }
}
