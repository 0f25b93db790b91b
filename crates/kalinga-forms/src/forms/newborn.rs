use std::sync::LazyLock;

use kalinga_core::models::category::Category;

use super::visit_section;
use crate::ProgramForm;
use crate::schema::{FieldSpec, NumberRange, Section, identity_section};

pub struct NewbornForm;

impl ProgramForm for NewbornForm {
    fn category(&self) -> Category {
        Category::Newborn
    }

    fn sections(&self) -> &[Section] {
        static SECTIONS: LazyLock<Vec<Section>> = LazyLock::new(|| {
            vec![
                identity_section(),
                visit_section(vec![]),
                Section::new(
                    "birth",
                    "Birth Details",
                    vec![
                        FieldSpec::number("birth_weight_g", "Birth Weight (g)", NumberRange::whole(300.0, 7000.0))
                            .required(),
                        FieldSpec::number("birth_length_cm", "Birth Length (cm)", NumberRange::new(20.0, 70.0)),
                        FieldSpec::number("apgar", "APGAR Score", NumberRange::whole(0.0, 10.0)),
                    ],
                ),
                Section::new(
                    "essential_care",
                    "Essential Newborn Care",
                    vec![
                        FieldSpec::flag("early_breastfeeding", "Breastfeeding within 1 Hour"),
                        FieldSpec::flag("vitamin_k", "Vitamin K Given"),
                        FieldSpec::flag("bcg", "BCG Given"),
                        FieldSpec::flag("hepa_b_birth_dose", "Hepatitis B Birth Dose"),
                        FieldSpec::date("newborn_screening", "Newborn Screening Date"),
                        FieldSpec::date("hearing_screening", "Newborn Hearing Screening Date"),
                    ],
                ),
            ]
        });
        &SECTIONS
    }
}
