//! Applicant profile, add-on selections and age eligibility

use serde::{Deserialize, Serialize};

use crate::rating::ServiceId;

/// Youngest insurable age
pub const MIN_AGE: i32 = 18;

/// Oldest insurable age
pub const MAX_AGE: i32 = 80;

/// The person being quoted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    /// Age in whole years
    pub age: i32,

    /// Whether parents or in-laws are added to the plan
    #[serde(default)]
    pub include_parents: bool,

    /// Reserved: the family factor is flat regardless of how many parents are listed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents_ages: Vec<i32>,
}

impl Applicant {
    pub fn new(age: i32, include_parents: bool) -> Self {
        Self {
            age,
            include_parents,
            parents_ages: Vec::new(),
        }
    }
}

/// Add-on services chosen by the applicant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionalSelections {
    #[serde(default)]
    pub funeral_assistance: bool,

    #[serde(default)]
    pub tele_vet: bool,
}

impl OptionalSelections {
    /// No add-ons
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(funeral_assistance: bool, tele_vet: bool) -> Self {
        Self {
            funeral_assistance,
            tele_vet,
        }
    }

    /// Selected add-ons in catalog order
    pub fn selected(&self) -> impl Iterator<Item = ServiceId> {
        [
            (ServiceId::FuneralAssistance, self.funeral_assistance),
            (ServiceId::TeleVet, self.tele_vet),
        ]
        .into_iter()
        .filter_map(|(id, chosen)| chosen.then_some(id))
    }
}

/// Outcome of the age eligibility check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeValidation {
    pub valid: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Check that an age is insurable; never fails, the result carries the reason
pub fn validate_age(age: i32) -> AgeValidation {
    if age < MIN_AGE {
        return AgeValidation {
            valid: false,
            message: Some(format!("La edad mínima es {} años", MIN_AGE)),
        };
    }
    if age > MAX_AGE {
        return AgeValidation {
            valid: false,
            message: Some(format!("La edad máxima es {} años", MAX_AGE)),
        };
    }
    AgeValidation {
        valid: true,
        message: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_age_bounds() {
        assert!(validate_age(18).valid);
        assert!(validate_age(45).valid);
        assert!(validate_age(80).valid);
        assert_eq!(validate_age(18).message, None);

        let too_young = validate_age(17);
        assert!(!too_young.valid);
        assert!(too_young.message.unwrap().contains("mínima es 18"));

        let too_old = validate_age(81);
        assert!(!too_old.valid);
        assert!(too_old.message.unwrap().contains("máxima es 80"));

        assert!(!validate_age(0).valid);
        assert!(!validate_age(-5).valid);
    }

    #[test]
    fn test_selected_optionals() {
        assert_eq!(OptionalSelections::none().selected().count(), 0);

        let both: Vec<_> = OptionalSelections::new(true, true).selected().collect();
        assert_eq!(both, vec![ServiceId::FuneralAssistance, ServiceId::TeleVet]);

        let vet: Vec<_> = OptionalSelections::new(false, true).selected().collect();
        assert_eq!(vet, vec![ServiceId::TeleVet]);
    }

    #[test]
    fn test_applicant_defaults_from_json() {
        let applicant: Applicant = serde_json::from_str(r#"{"age": 40}"#).unwrap();
        assert_eq!(applicant, Applicant::new(40, false));

        let options: OptionalSelections = serde_json::from_str(r#"{"teleVet": true}"#).unwrap();
        assert_eq!(options, OptionalSelections::new(false, true));
    }
}
