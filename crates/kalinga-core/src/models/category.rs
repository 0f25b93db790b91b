use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// A health program a client can be enrolled in.
///
/// The set is closed: every program has a clinical form and a record
/// endpoint, so dispatch on `Category` is always exhaustive. Serialized as
/// the URL slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Category {
    #[serde(rename = "pregnant")]
    Pregnant,
    #[serde(rename = "newborn")]
    Newborn,
    #[serde(rename = "immunization")]
    ChildImmunization,
    #[serde(rename = "nutrition")]
    UnderFiveNutrition,
    #[serde(rename = "adolescent")]
    Adolescent,
    #[serde(rename = "family-planning")]
    WraFamilyPlanning,
    #[serde(rename = "senior-citizen")]
    SeniorCitizen,
    #[serde(rename = "disability")]
    PersonWithDisability,
    #[serde(rename = "hypertension")]
    Hypertension,
    #[serde(rename = "diabetes")]
    Diabetes,
    #[serde(rename = "tuberculosis")]
    Tuberculosis,
    #[serde(rename = "mental-health")]
    MentalHealth,
    #[serde(rename = "deworming")]
    Deworming,
}

impl Category {
    pub const ALL: [Category; 13] = [
        Category::Pregnant,
        Category::Newborn,
        Category::ChildImmunization,
        Category::UnderFiveNutrition,
        Category::Adolescent,
        Category::WraFamilyPlanning,
        Category::SeniorCitizen,
        Category::PersonWithDisability,
        Category::Hypertension,
        Category::Diabetes,
        Category::Tuberculosis,
        Category::MentalHealth,
        Category::Deworming,
    ];

    /// Canonical human-readable label, as shown in enrollment lists.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pregnant => "Pregnant",
            Self::Newborn => "Newborn Care",
            Self::ChildImmunization => "Child Immunization",
            Self::UnderFiveNutrition => "Under-Five Nutrition",
            Self::Adolescent => "Adolescent Health",
            Self::WraFamilyPlanning => "WRA Family Planning",
            Self::SeniorCitizen => "Senior Citizen",
            Self::PersonWithDisability => "Person with Disability",
            Self::Hypertension => "Hypertension",
            Self::Diabetes => "Diabetes",
            Self::Tuberculosis => "Tuberculosis",
            Self::MentalHealth => "Mental Health",
            Self::Deworming => "School-Age Deworming",
        }
    }

    /// Base path segment of this program's record endpoints.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Pregnant => "pregnant",
            Self::Newborn => "newborn",
            Self::ChildImmunization => "immunization",
            Self::UnderFiveNutrition => "nutrition",
            Self::Adolescent => "adolescent",
            Self::WraFamilyPlanning => "family-planning",
            Self::SeniorCitizen => "senior-citizen",
            Self::PersonWithDisability => "disability",
            Self::Hypertension => "hypertension",
            Self::Diabetes => "diabetes",
            Self::Tuberculosis => "tuberculosis",
            Self::MentalHealth => "mental-health",
            Self::Deworming => "deworming",
        }
    }

    /// Heading of the clinical form for this program.
    pub const fn form_title(self) -> &'static str {
        match self {
            Self::Pregnant => "Prenatal & Postpartum Care",
            Self::Newborn => "Essential Newborn Care",
            Self::ChildImmunization => "Expanded Program on Immunization",
            Self::UnderFiveNutrition => "Operation Timbang Plus",
            Self::Adolescent => "Adolescent Health & Development",
            Self::WraFamilyPlanning => "Family Planning Service Record",
            Self::SeniorCitizen => "Senior Citizen Health Assessment",
            Self::PersonWithDisability => "PWD Functional Assessment",
            Self::Hypertension => "Hypertension Monitoring",
            Self::Diabetes => "Diabetes Monitoring",
            Self::Tuberculosis => "TB-DOTS Treatment Card",
            Self::MentalHealth => "Mental Health Follow-up",
            Self::Deworming => "Deworming Record",
        }
    }

    /// Parse a canonical label or slug.
    ///
    /// Surrounding whitespace and ASCII case are ignored; spelling is not.
    /// Returns `None` for anything that is neither a label nor a slug.
    pub fn from_label(input: &str) -> Option<Self> {
        let needle = input.trim();
        Self::ALL.into_iter().find(|c| {
            c.label().eq_ignore_ascii_case(needle) || c.slug().eq_ignore_ascii_case(needle)
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| CoreError::UnknownCategory(s.to_string()))
    }
}
