use std::sync::LazyLock;

use kalinga_core::models::category::Category;

use super::{blood_pressure, visit_section};
use crate::ProgramForm;
use crate::schema::{FieldSpec, Section, identity_section};

/// Women of reproductive age availing a family planning method.
pub struct FamilyPlanningForm;

const METHODS: &[&str] = &[
    "BTL",
    "NSV",
    "condom",
    "pills",
    "injectable",
    "implant",
    "IUD",
    "LAM",
    "SDM",
    "BBT",
];

impl ProgramForm for FamilyPlanningForm {
    fn category(&self) -> Category {
        Category::WraFamilyPlanning
    }

    fn sections(&self) -> &[Section] {
        static SECTIONS: LazyLock<Vec<Section>> = LazyLock::new(|| {
            let mut service = vec![
                FieldSpec::choice(
                    "client_type",
                    "Type of Client",
                    &["new acceptor", "current user", "changing method", "restart"],
                )
                .required(),
                FieldSpec::choice("method", "Method", METHODS).required(),
                FieldSpec::date("follow_up", "Next Service Date"),
                FieldSpec::flag("dropout", "Dropped Out"),
                FieldSpec::text("dropout_reason", "Reason for Dropout"),
            ];
            service.extend(blood_pressure());

            vec![
                identity_section(),
                visit_section(vec![]),
                Section::new("service", "Family Planning Service", service),
            ]
        });
        &SECTIONS
    }
}
