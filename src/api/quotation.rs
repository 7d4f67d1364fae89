//! Quotation endpoints: calculate, plans, coverage, age validation

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ApiReply;
use crate::quote::{Applicant, CalculationStep, CoverageItem, OptionalSelections, PremiumEngine, ServicePremiumDetail};
use crate::rating::PlanTier;

/// Days a quotation stays valid
pub const QUOTE_VALIDITY_DAYS: i64 = 30;

static QUOTE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Body of `POST /api/quotation/calculate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationRequest {
    pub applicant: Applicant,
    pub plan: PlanTier,
    #[serde(default)]
    pub optional_services: OptionalSelections,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PricingComponents {
    base_premium: f64,
    optionals_premium: f64,
    age_adjustment: f64,
    family_adjustment: f64,
    expenses: f64,
    profit: f64,
    commission: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Pricing {
    annual: f64,
    monthly: f64,
    breakdown: PricingComponents,
    #[serde(skip_serializing_if = "Option::is_none")]
    service_breakdown: Option<Vec<ServicePremiumDetail>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    calculation_steps: Option<Vec<CalculationStep>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Quotation {
    quotation_id: String,
    input: QuotationRequest,
    pricing: Pricing,
    coverage: Vec<CoverageItem>,
    valid_until: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

fn next_quotation_id(now: DateTime<Utc>) -> String {
    let sequence = QUOTE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("MIA-{}-{:06}", now.timestamp_millis(), sequence % 1_000_000)
}

pub(super) fn calculate(engine: &PremiumEngine, body: &str, now: DateTime<Utc>) -> ApiReply {
    let request: QuotationRequest = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => return ApiReply::failure(400, "Validation Error", Some(&e.to_string())),
    };

    let age_check = engine.validate_age(request.applicant.age);
    if !age_check.valid {
        return ApiReply::failure(400, "Invalid age", age_check.message.as_deref());
    }

    let result = engine.calculate_premium(&request.applicant, request.plan, &request.optional_services, true);
    let coverage = engine.coverage_details(request.plan, &request.optional_services);

    let quotation = Quotation {
        quotation_id: next_quotation_id(now),
        pricing: Pricing {
            annual: result.total_annual,
            monthly: result.total_monthly,
            breakdown: PricingComponents {
                base_premium: result.base_premium,
                optionals_premium: result.optionals_premium,
                age_adjustment: result.age_adjustment,
                family_adjustment: result.family_adjustment,
                expenses: result.expenses,
                profit: result.profit,
                commission: result.commission,
            },
            service_breakdown: result.service_breakdown,
            calculation_steps: result.calculation_steps,
        },
        input: request,
        coverage,
        valid_until: now + Duration::days(QUOTE_VALIDITY_DAYS),
        created_at: now,
    };

    ApiReply::success(&quotation)
}

pub(super) fn plans(engine: &PremiumEngine) -> ApiReply {
    ApiReply::success(engine.plans_info())
}

pub(super) fn coverage(engine: &PremiumEngine, plan: &str) -> ApiReply {
    let tier: PlanTier = match plan.parse() {
        Ok(t) => t,
        Err(_) => return ApiReply::failure(400, "Invalid plan", Some("Plan must be plata, oro, or diamante")),
    };

    let coverage = engine.coverage_details(tier, &OptionalSelections::none());
    ApiReply::success(&serde_json::json!({ "plan": tier, "coverage": coverage }))
}

pub(super) fn validate(engine: &PremiumEngine, body: &str) -> ApiReply {
    // Any JSON number with no fractional part, so 45 and 45.0 both validate
    let age = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("age").and_then(Value::as_f64))
        .filter(|age| age.fract() == 0.0);

    match age {
        Some(age) => {
            let age = age.clamp(i32::MIN as f64, i32::MAX as f64) as i32;
            ApiReply::success(&engine.validate_age(age))
        }
        None => ApiReply::failure(400, "Age is required and must be an integer", None),
    }
}
