//! Premium output structures

use serde::{Deserialize, Serialize};

use crate::rating::{ServiceCategory, ServiceId};

/// Round a currency amount to cents, half away from zero
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Premium contribution of a single service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePremiumDetail {
    pub service_id: ServiceId,
    pub service_name: String,
    pub frequency: f64,
    pub base_cost: f64,
    /// frequency × base cost
    pub risk_premium: f64,
    /// risk premium × tariff multiplier
    pub tariff_premium: f64,
    pub plan_multiplier: f64,
    /// tariff premium × plan multiplier
    pub final_premium: f64,
    pub included: bool,
}

/// One line of the audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationStep {
    pub step: u8,
    pub description: String,
    pub value: f64,
    pub calculation: String,
}

/// Annual premium split into its rating adjustments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumBreakdown {
    pub base_premium: f64,
    pub optionals_premium: f64,
    pub age_adjustment: f64,
    pub family_adjustment: f64,
    pub expenses: f64,
    pub profit: f64,
    pub commission: f64,

    /// Adjusted premium after the age and family factors, before loadings
    pub pre_loading_premium: f64,

    /// Rounded to cents
    pub total_annual: f64,
    /// Rounded annual / 12, rounded to cents
    pub total_monthly: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_breakdown: Option<Vec<ServicePremiumDetail>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_steps: Option<Vec<CalculationStep>>,
}

impl PremiumBreakdown {
    /// Sum of the unrounded components; equals the annual total within a cent
    pub fn component_sum(&self) -> f64 {
        self.base_premium
            + self.optionals_premium
            + self.age_adjustment
            + self.family_adjustment
            + self.expenses
            + self.profit
            + self.commission
    }
}

/// Coverage line shown alongside a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageItem {
    pub service_name: String,
    pub included: bool,
    pub coverage: String,
    pub service_type: ServiceCategory,
}
