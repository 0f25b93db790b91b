use std::sync::LazyLock;

use kalinga_core::models::category::Category;

use super::{visit_section, vitals_section};
use crate::ProgramForm;
use crate::schema::{FieldSpec, NumberRange, Section, identity_section};

pub struct DiabetesForm;

impl ProgramForm for DiabetesForm {
    fn category(&self) -> Category {
        Category::Diabetes
    }

    fn sections(&self) -> &[Section] {
        static SECTIONS: LazyLock<Vec<Section>> = LazyLock::new(|| {
            vec![
                identity_section(),
                visit_section(vec![]),
                vitals_section(true),
                Section::new(
                    "glycemic",
                    "Glycemic Control",
                    vec![
                        FieldSpec::number("fbs_mg_dl", "Fasting Blood Sugar (mg/dL)", NumberRange::new(20.0, 800.0)),
                        FieldSpec::number("rbs_mg_dl", "Random Blood Sugar (mg/dL)", NumberRange::new(20.0, 1000.0)),
                        FieldSpec::number("hba1c", "HbA1c (%)", NumberRange::new(3.0, 20.0)),
                        FieldSpec::choice("diabetes_type", "Type", &["type 1", "type 2", "gestational"]),
                        FieldSpec::flag("on_insulin", "On Insulin"),
                        FieldSpec::flag("foot_exam", "Foot Examination Done"),
                    ],
                ),
            ]
        });
        &SECTIONS
    }
}
