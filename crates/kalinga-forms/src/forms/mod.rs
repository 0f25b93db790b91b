pub mod adolescent;
pub mod deworming;
pub mod diabetes;
pub mod disability;
pub mod family_planning;
pub mod hypertension;
pub mod immunization;
pub mod mental_health;
pub mod newborn;
pub mod nutrition;
pub mod pregnant;
pub mod senior_citizen;
pub mod tuberculosis;

use crate::bmi::{BMI, HEIGHT_CM, WEIGHT_KG};
use crate::schema::{FieldSpec, NumberRange, Section};

pub const VISIT_DATE: &str = "visit_date";

/// Visit date and free-text remarks, wrapped around program-specific fields.
pub(crate) fn visit_section(fields: Vec<FieldSpec>) -> Section {
    let mut all = vec![FieldSpec::date(VISIT_DATE, "Date of Visit").required()];
    all.extend(fields);
    all.push(FieldSpec::text("remarks", "Remarks"));
    Section::new("visit", "Visit", all)
}

/// Height, weight and the derived BMI, optionally with blood pressure.
pub(crate) fn vitals_section(with_bp: bool) -> Section {
    let mut fields = vec![
        FieldSpec::number(HEIGHT_CM, "Height (cm)", NumberRange::new(20.0, 250.0)),
        FieldSpec::number(WEIGHT_KG, "Weight (kg)", NumberRange::new(0.5, 300.0)),
        FieldSpec::number(BMI, "BMI", NumberRange::new(0.0, 200.0)).derived(),
    ];
    if with_bp {
        fields.extend(blood_pressure());
    }
    Section::new("vitals", "Vital Signs", fields)
}

pub(crate) fn blood_pressure() -> [FieldSpec; 2] {
    [
        FieldSpec::number("bp_systolic", "Systolic BP (mmHg)", NumberRange::whole(50.0, 300.0)),
        FieldSpec::number("bp_diastolic", "Diastolic BP (mmHg)", NumberRange::whole(30.0, 200.0)),
    ]
}
