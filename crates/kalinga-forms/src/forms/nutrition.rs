use std::sync::LazyLock;

use kalinga_core::models::category::Category;

use super::{visit_section, vitals_section};
use crate::ProgramForm;
use crate::schema::{FieldSpec, NumberRange, Section, identity_section};

/// Under-five growth monitoring (Operation Timbang Plus).
pub struct NutritionForm;

impl ProgramForm for NutritionForm {
    fn category(&self) -> Category {
        Category::UnderFiveNutrition
    }

    fn sections(&self) -> &[Section] {
        static SECTIONS: LazyLock<Vec<Section>> = LazyLock::new(|| {
            vec![
                identity_section(),
                visit_section(vec![]),
                vitals_section(false),
                Section::new(
                    "assessment",
                    "Nutritional Status",
                    vec![
                        FieldSpec::number("muac_cm", "MUAC (cm)", NumberRange::new(5.0, 30.0)),
                        FieldSpec::choice(
                            "weight_for_age",
                            "Weight-for-Age",
                            &["normal", "underweight", "severely underweight", "overweight"],
                        ),
                        FieldSpec::choice(
                            "height_for_age",
                            "Height-for-Age",
                            &["normal", "stunted", "severely stunted", "tall"],
                        ),
                        FieldSpec::choice(
                            "weight_for_height",
                            "Weight-for-Height",
                            &["normal", "wasted", "severely wasted", "overweight", "obese"],
                        ),
                        FieldSpec::flag("vitamin_a", "Vitamin A Given"),
                        FieldSpec::flag("micronutrient_powder", "Micronutrient Powder Given"),
                    ],
                ),
            ]
        });
        &SECTIONS
    }
}
