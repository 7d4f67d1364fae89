//! Loading factors applied on top of the service premiums

use serde::{Deserialize, Serialize};

/// Age band multipliers, split at a single cutoff age
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeBandFactors {
    /// First age of the upper band
    pub cutoff_age: i32,
    pub under_cutoff: f64,
    pub at_or_over_cutoff: f64,
}

impl AgeBandFactors {
    pub fn factor_for(&self, age: i32) -> f64 {
        if age >= self.cutoff_age {
            self.at_or_over_cutoff
        } else {
            self.under_cutoff
        }
    }
}

impl Default for AgeBandFactors {
    fn default() -> Self {
        Self {
            cutoff_age: 70,
            under_cutoff: 1.0,
            at_or_over_cutoff: 2.0,
        }
    }
}

/// Rating factors from the pricing workbook
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingFactors {
    /// Converts risk premium to tariff premium
    pub tariff_multiplier: f64,

    /// Administrative expense loading
    #[serde(rename = "expenses")]
    pub expense_rate: f64,

    #[serde(rename = "profit")]
    pub profit_rate: f64,

    #[serde(rename = "commission")]
    pub commission_rate: f64,

    /// Applied when parents or in-laws are included
    pub family_factor: f64,

    /// Applied to the sum of selected optional services
    pub optional_factor: f64,

    pub age_factors: AgeBandFactors,
}

impl RatingFactors {
    /// Combined expense, profit and commission loading
    pub fn total_loading(&self) -> f64 {
        self.expense_rate + self.profit_rate + self.commission_rate
    }

    pub fn family_multiplier(&self, include_parents: bool) -> f64 {
        if include_parents {
            self.family_factor
        } else {
            1.0
        }
    }
}

impl Default for RatingFactors {
    fn default() -> Self {
        Self {
            tariff_multiplier: 4.5,
            expense_rate: 0.20,
            profit_rate: 0.15,
            commission_rate: 0.30,
            family_factor: 1.8,
            optional_factor: 1.25,
            age_factors: AgeBandFactors::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_bands() {
        let bands = AgeBandFactors::default();

        assert_eq!(bands.factor_for(18), 1.0);
        assert_eq!(bands.factor_for(69), 1.0);
        assert_eq!(bands.factor_for(70), 2.0);
        assert_eq!(bands.factor_for(95), 2.0);
        assert_eq!(bands.factor_for(-3), 1.0);
    }

    #[test]
    fn test_loadings() {
        let factors = RatingFactors::default();

        assert!((factors.total_loading() - 0.65).abs() < 1e-12);
        assert_eq!(factors.family_multiplier(false), 1.0);
        assert_eq!(factors.family_multiplier(true), 1.8);
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(RatingFactors::default()).unwrap();

        assert_eq!(json["tariffMultiplier"], 4.5);
        assert_eq!(json["expenses"], 0.2);
        assert_eq!(json["optionalFactor"], 1.25);
        assert_eq!(json["ageFactors"]["cutoffAge"], 70);
    }
}
