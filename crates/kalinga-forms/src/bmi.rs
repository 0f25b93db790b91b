//! Body-mass index derivation.

use kalinga_core::models::visit_record::FieldValues;

pub const HEIGHT_CM: &str = "height_cm";
pub const WEIGHT_KG: &str = "weight_kg";
pub const BMI: &str = "bmi";

/// `weight_kg / (height_m)^2`, rounded to two decimal places.
///
/// Returns `None` unless both inputs are finite and strictly positive, so a
/// zero height never reaches the division.
pub fn compute_bmi(height_cm: f64, weight_kg: f64) -> Option<f64> {
    if !height_cm.is_finite() || !weight_kg.is_finite() || height_cm <= 0.0 || weight_kg <= 0.0 {
        return None;
    }
    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    Some((bmi * 100.0).round() / 100.0)
}

/// Recompute `bmi` from `height_cm` and `weight_kg` in place.
///
/// When either input is missing or not positive the stored `bmi` is left
/// untouched.
pub fn apply(values: &mut FieldValues) {
    let height = values.get(HEIGHT_CM).and_then(|v| v.as_f64());
    let weight = values.get(WEIGHT_KG).and_then(|v| v.as_f64());

    if let (Some(h), Some(w)) = (height, weight)
        && let Some(bmi) = compute_bmi(h, w)
    {
        values.insert(BMI.to_string(), serde_json::json!(bmi));
    }
}
