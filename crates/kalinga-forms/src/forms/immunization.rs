use std::sync::LazyLock;

use kalinga_core::models::category::Category;

use super::visit_section;
use crate::ProgramForm;
use crate::schema::{FieldSpec, NumberRange, Section, identity_section};

/// One antigen dose per visit record.
pub struct ImmunizationForm;

const VACCINES: &[&str] = &[
    "BCG",
    "Hepatitis B",
    "Pentavalent",
    "OPV",
    "IPV",
    "PCV",
    "MMR",
];

impl ProgramForm for ImmunizationForm {
    fn category(&self) -> Category {
        Category::ChildImmunization
    }

    fn sections(&self) -> &[Section] {
        static SECTIONS: LazyLock<Vec<Section>> = LazyLock::new(|| {
            vec![
                identity_section(),
                visit_section(vec![]),
                Section::new(
                    "dose",
                    "Vaccination",
                    vec![
                        FieldSpec::choice("vaccine", "Vaccine", VACCINES).required(),
                        FieldSpec::number("dose_number", "Dose Number", NumberRange::whole(1.0, 4.0))
                            .required(),
                        FieldSpec::date("dose_date", "Date Given").required(),
                        FieldSpec::choice("site", "Injection Site", &["left arm", "right arm", "left thigh", "right thigh", "oral"]),
                        FieldSpec::flag("adverse_event", "Adverse Event Following Immunization"),
                        FieldSpec::flag("fully_immunized", "Fully Immunized Child"),
                    ],
                ),
            ]
        });
        &SECTIONS
    }
}
