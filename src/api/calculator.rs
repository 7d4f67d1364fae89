//! Calculator endpoints: price table, plan comparison, rating factors

use serde_json::json;

use super::ApiReply;
use crate::quote::{validate_age, PremiumEngine};
use crate::rating::PlanTier;
use crate::report::{compare_plans, price_table as build_price_table, recommendation, PRICE_TABLE_NOTES, STANDARD_AGES};

pub(super) fn price_table(engine: &PremiumEngine) -> ApiReply {
    let rows = build_price_table(engine, &STANDARD_AGES);

    ApiReply::success(&json!({
        "ages": STANDARD_AGES,
        "plans": PlanTier::ALL,
        "priceTable": rows,
        "notes": PRICE_TABLE_NOTES,
    }))
}

pub(super) fn compare(engine: &PremiumEngine, age: &str) -> ApiReply {
    let age = match age.parse::<i32>() {
        Ok(a) if validate_age(a).valid => a,
        _ => return ApiReply::failure(400, "Invalid age. Must be between 18 and 80", None),
    };

    ApiReply::success(&json!({
        "age": age,
        "comparison": compare_plans(engine, age),
        "recommendation": recommendation(age),
    }))
}

pub(super) fn factors(engine: &PremiumEngine) -> ApiReply {
    ApiReply::success(&json!({
        "factors": engine.calculation_factors(),
        "description": {
            "tariffMultiplier": "Factor para convertir prima de riesgo a prima tarifa",
            "expenses": "Porcentaje de gastos administrativos",
            "profit": "Porcentaje de utilidad",
            "commission": "Porcentaje de comisión",
            "familyFactor": "Factor aplicado al incluir padres/suegros",
            "optionalFactor": "Factor aplicado a servicios opcionales",
            "ageFactors": "Factores por rango de edad",
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::super::route;
    use super::*;
    use chrono::Utc;

    fn get(path: &str) -> ApiReply {
        route(&PremiumEngine::default_pricing(), "GET", path, "", Utc::now())
    }

    #[test]
    fn test_price_table_endpoint() {
        let reply = get("/api/calculator/price-table");

        assert_eq!(reply.status, 200);
        let data = &reply.body["data"];
        assert_eq!(data["ages"].as_array().unwrap().len(), 14);
        assert_eq!(data["plans"][2], "diamante");
        assert_eq!(data["priceTable"][0]["age"], 18);
        assert_eq!(data["notes"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_compare_endpoint() {
        let reply = get("/api/calculator/compare/45");

        assert_eq!(reply.status, 200);
        let data = &reply.body["data"];
        assert_eq!(data["age"], 45);
        assert_eq!(data["comparison"].as_array().unwrap().len(), 3);
        assert_eq!(data["comparison"][1]["plan"], "oro");
        assert_eq!(data["comparison"][1]["features"]["name"], "Plan Oro");
        assert!(data["recommendation"].as_str().unwrap().starts_with("Plan Oro o Diamante"));
    }

    #[test]
    fn test_compare_rejects_bad_age() {
        for path in ["/api/calculator/compare/17", "/api/calculator/compare/81", "/api/calculator/compare/abc"] {
            let reply = get(path);
            assert_eq!(reply.status, 400, "{}", path);
            assert_eq!(reply.body["success"], false);
        }
    }

    #[test]
    fn test_factors_endpoint() {
        let reply = get("/api/calculator/factors");

        assert_eq!(reply.status, 200);
        assert_eq!(reply.body["data"]["factors"]["familyFactor"], 1.8);
        assert_eq!(reply.body["data"]["factors"]["commission"], 0.3);
        assert!(reply.body["data"]["description"]["ageFactors"].is_string());
    }
}
