use std::sync::LazyLock;

use kalinga_core::models::category::Category;

use super::{visit_section, vitals_section};
use crate::ProgramForm;
use crate::schema::{FieldSpec, NumberRange, Section, identity_section};

/// Prenatal visits through the postpartum period.
pub struct PregnantForm;

impl ProgramForm for PregnantForm {
    fn category(&self) -> Category {
        Category::Pregnant
    }

    fn sections(&self) -> &[Section] {
        static SECTIONS: LazyLock<Vec<Section>> = LazyLock::new(|| {
            vec![
                identity_section(),
                visit_section(vec![]),
                Section::new(
                    "obstetric",
                    "Obstetric History",
                    vec![
                        FieldSpec::date("lmp", "Last Menstrual Period").required(),
                        FieldSpec::date("edc", "Expected Date of Confinement"),
                        FieldSpec::number("gravida", "Gravida", NumberRange::whole(1.0, 20.0)),
                        FieldSpec::number("para", "Para", NumberRange::whole(0.0, 20.0)),
                        FieldSpec::number(
                            "aog_weeks",
                            "Age of Gestation (weeks)",
                            NumberRange::whole(0.0, 45.0),
                        ),
                        FieldSpec::choice("risk_level", "Risk Level", &["low", "moderate", "high"]),
                    ],
                ),
                vitals_section(true),
                Section::new(
                    "supplements",
                    "Micronutrient Supplementation",
                    vec![
                        FieldSpec::flag("iron_folic", "Iron with Folic Acid Given"),
                        FieldSpec::flag("calcium", "Calcium Carbonate Given"),
                        FieldSpec::flag("iodine", "Iodine Capsule Given"),
                        FieldSpec::number("td_dose", "Tetanus-Diphtheria Dose", NumberRange::whole(1.0, 5.0)),
                    ],
                ),
                Section::new(
                    "postpartum",
                    "Delivery & Postpartum",
                    vec![
                        FieldSpec::date("delivery_date", "Date of Delivery"),
                        FieldSpec::choice(
                            "delivery_place",
                            "Place of Delivery",
                            &["health facility", "home", "other"],
                        ),
                        FieldSpec::choice(
                            "birth_attendant",
                            "Birth Attendant",
                            &["doctor", "nurse", "midwife", "hilot", "other"],
                        ),
                        FieldSpec::date("postpartum_visit", "Postpartum Visit Date"),
                    ],
                ),
            ]
        });
        &SECTIONS
    }
}
