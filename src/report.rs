//! Price grids and plan comparisons over the premium engine
//!
//! Every row is an independent quote, so grids are priced in parallel against
//! a single borrowed engine.

use rayon::prelude::*;
use serde::Serialize;

use crate::quote::{Applicant, CoverageItem, OptionalSelections, PremiumEngine};
use crate::rating::{PlanInfo, PlanTier, ServiceCategory, ServiceId, TierValues};

/// Ages shown on the published price table
pub const STANDARD_AGES: [i32; 14] = [18, 25, 30, 35, 40, 45, 50, 55, 60, 65, 69, 70, 75, 80];

/// Ages shown on the monthly table
pub const MONTHLY_AGES: [i32; 6] = [25, 35, 45, 55, 65, 69];

/// Ages shown on the family table
pub const FAMILY_AGES: [i32; 5] = [35, 45, 55, 65, 69];

/// Ages shown on the age impact analysis
pub const AGE_IMPACT_AGES: [i32; 9] = [25, 35, 45, 55, 65, 69, 70, 75, 80];

/// Age the impact factors are expressed against
pub const AGE_IMPACT_BASELINE: i32 = 35;

/// Age used to price add-on increments
pub const OPTIONAL_REFERENCE_AGE: i32 = 45;

/// Notes attached to the standard grid
pub const PRICE_TABLE_NOTES: [&str; 3] = [
    "Precios en pesos mexicanos (MXN)",
    "A partir de 70 años se aplica factor 2x",
    "Sin factor familiar ni servicios opcionales",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierPrice {
    pub annual: f64,
    pub monthly: f64,
}

/// One age of the price grid, individual applicant without add-ons
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRow {
    pub age: i32,
    #[serde(flatten)]
    pub prices: TierValues<TierPrice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FamilyRow {
    pub age: i32,
    pub individual: f64,
    pub family: f64,
    pub increment: f64,
}

/// Extra annual premium for adding one optional service
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionalCostRow {
    pub service_id: ServiceId,
    pub service_name: String,
    pub additional_annual: TierValues<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanComparison {
    pub plan: PlanTier,
    pub pricing: TierPrice,
    /// Annual difference against the base tier
    pub difference: f64,
    /// Included services only
    pub coverage: Vec<CoverageItem>,
    pub features: PlanInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgeImpactRow {
    pub age: i32,
    pub annual: f64,
    pub monthly: f64,
    /// Annual premium relative to the baseline age
    pub factor: f64,
}

fn individual_price(engine: &PremiumEngine, age: i32, tier: PlanTier, optionals: &OptionalSelections) -> TierPrice {
    let result = engine.calculate_premium(&Applicant::new(age, false), tier, optionals, false);
    TierPrice {
        annual: result.total_annual,
        monthly: result.total_monthly,
    }
}

/// Annual and monthly premium per tier for each age
pub fn price_table(engine: &PremiumEngine, ages: &[i32]) -> Vec<PriceRow> {
    let none = OptionalSelections::none();
    ages.par_iter()
        .map(|&age| PriceRow {
            age,
            prices: TierValues::new(
                individual_price(engine, age, PlanTier::Plata, &none),
                individual_price(engine, age, PlanTier::Oro, &none),
                individual_price(engine, age, PlanTier::Diamante, &none),
            ),
        })
        .collect()
}

/// Individual versus parents-included annual premium
pub fn family_table(engine: &PremiumEngine, ages: &[i32], tier: PlanTier) -> Vec<FamilyRow> {
    let none = OptionalSelections::none();
    ages.par_iter()
        .map(|&age| {
            let individual = engine.calculate_premium(&Applicant::new(age, false), tier, &none, false);
            let family = engine.calculate_premium(&Applicant::new(age, true), tier, &none, false);
            FamilyRow {
                age,
                individual: individual.total_annual,
                family: family.total_annual,
                increment: family.total_annual - individual.total_annual,
            }
        })
        .collect()
}

/// Incremental annual cost of each optional service, per tier
pub fn optional_services_table(engine: &PremiumEngine, age: i32) -> Vec<OptionalCostRow> {
    let optional_ids: Vec<ServiceId> = engine
        .services_configuration()
        .in_category(ServiceCategory::Optional)
        .map(|s| s.id)
        .collect();

    optional_ids
        .par_iter()
        .map(|&id| {
            let selection = OptionalSelections::new(id == ServiceId::FuneralAssistance, id == ServiceId::TeleVet);
            let increment = |tier: PlanTier| {
                individual_price(engine, age, tier, &selection).annual
                    - individual_price(engine, age, tier, &OptionalSelections::none()).annual
            };
            OptionalCostRow {
                service_id: id,
                service_name: engine.services_configuration().get(id).name.clone(),
                additional_annual: TierValues::new(
                    increment(PlanTier::Plata),
                    increment(PlanTier::Oro),
                    increment(PlanTier::Diamante),
                ),
            }
        })
        .collect()
}

/// Side-by-side view of every tier for one age
pub fn compare_plans(engine: &PremiumEngine, age: i32) -> Vec<PlanComparison> {
    let none = OptionalSelections::none();
    let base_annual = individual_price(engine, age, PlanTier::Plata, &none).annual;

    PlanTier::ALL
        .par_iter()
        .map(|&tier| {
            let pricing = individual_price(engine, age, tier, &none);
            PlanComparison {
                plan: tier,
                pricing,
                difference: pricing.annual - base_annual,
                coverage: engine
                    .coverage_details(tier, &none)
                    .into_iter()
                    .filter(|c| c.included)
                    .collect(),
                features: engine.plans_info().get(tier).clone(),
            }
        })
        .collect()
}

/// Suggested tier for an age
pub fn recommendation(age: i32) -> &'static str {
    if age < 35 {
        "Plan Oro - Equilibrio perfecto entre precio y cobertura para edad joven"
    } else if age < 65 {
        "Plan Oro o Diamante - Mayor cobertura recomendada para edad intermedia"
    } else {
        "Plan Diamante - Máxima cobertura recomendada para edad avanzada"
    }
}

/// Premium by age for one tier, relative to the baseline age
pub fn age_impact(engine: &PremiumEngine, tier: PlanTier, ages: &[i32]) -> Vec<AgeImpactRow> {
    let none = OptionalSelections::none();
    let baseline = individual_price(engine, AGE_IMPACT_BASELINE, tier, &none).annual;

    ages.par_iter()
        .map(|&age| {
            let price = individual_price(engine, age, tier, &none);
            AgeImpactRow {
                age,
                annual: price.annual,
                monthly: price.monthly,
                factor: if baseline > 0.0 { price.annual / baseline } else { 0.0 },
            }
        })
        .collect()
}

fn tier_label(tier: PlanTier) -> String {
    let name = tier.as_str();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Header, dashed rule and one line per age for a per-tier grid
fn render_tier_grid(rows: &[PriceRow], width: usize, value: impl Fn(&TierPrice) -> f64) -> String {
    let mut header = format!("{:<8}", "Edad");
    for tier in PlanTier::ALL {
        header.push_str(&format!("{:>width$}", tier_label(tier), width = width));
    }

    let mut lines = vec![header, "-".repeat(8 + width * PlanTier::ALL.len())];
    for row in rows {
        let mut line = format!("{:<8}", row.age);
        for tier in PlanTier::ALL {
            line.push_str(&format!("{:>width$.0}", value(row.prices.get(tier)), width = width));
        }
        lines.push(line);
    }
    lines.join("\n") + "\n"
}

/// Annual premium grid as fixed-width text
pub fn render_price_table(rows: &[PriceRow]) -> String {
    render_tier_grid(rows, 12, |p| p.annual)
}

/// Monthly premium grid as fixed-width text
pub fn render_monthly_table(rows: &[PriceRow]) -> String {
    render_tier_grid(rows, 10, |p| p.monthly)
}

pub fn render_family_table(rows: &[FamilyRow]) -> String {
    let mut out = format!("{:<8}{:>12}{:>12}{:>12}\n", "Edad", "Individual", "Familiar", "Incremento");
    out.push_str(&format!("{}\n", "-".repeat(44)));
    for row in rows {
        out.push_str(&format!(
            "{:<8}{:>12.0}{:>12.0}{:>12}\n",
            row.age,
            row.individual,
            row.family,
            format!("+{:.0}", row.increment)
        ));
    }
    out
}

pub fn render_optional_services_table(rows: &[OptionalCostRow]) -> String {
    let mut out = format!("{:<25}{:>12}{:>13}\n", "Servicio", "Oro", "Diamante");
    out.push_str(&format!("{}\n", "-".repeat(50)));
    for row in rows {
        out.push_str(&format!(
            "{:<25}{:>12}{:>13}\n",
            row.service_name,
            format!("+{:.0}", row.additional_annual.oro),
            format!("+{:.0}", row.additional_annual.diamante)
        ));
    }
    out
}

pub fn render_comparison(age: i32, comparison: &[PlanComparison]) -> String {
    let mut out = format!("Comparación de planes ({} años)\n", age);
    out.push_str(&format!("{:<12}{:>12}{:>12}{:>15}\n", "Plan", "Anual", "Mensual", "Diferencia"));
    out.push_str(&format!("{}\n", "-".repeat(51)));
    for item in comparison {
        let diff = if item.plan == PlanTier::Plata {
            "Base".to_string()
        } else {
            format!("+{:.0}", item.difference)
        };
        out.push_str(&format!(
            "{:<12}{:>12.0}{:>12.0}{:>15}\n",
            item.plan.as_str().to_uppercase(),
            item.pricing.annual,
            item.pricing.monthly,
            diff
        ));
    }
    out.push_str(&format!("\nRecomendación: {}\n", recommendation(age)));
    out
}

pub fn render_age_impact(tier: PlanTier, rows: &[AgeImpactRow]) -> String {
    let mut out = format!("Impacto por edad - Plan {}\n", tier.as_str().to_uppercase());
    out.push_str(&format!("{:<8}{:>15}{:>15}{:>10}\n", "Edad", "Prima Anual", "Prima Mensual", "Factor"));
    out.push_str(&format!("{}\n", "-".repeat(48)));
    for row in rows {
        out.push_str(&format!(
            "{:<8}{:>15.0}{:>15.0}{:>10}\n",
            row.age,
            row.annual,
            row.monthly,
            format!("{:.2}x", row.factor)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_price_table_rows() {
        let engine = PremiumEngine::default_pricing();
        let rows = price_table(&engine, &STANDARD_AGES);

        assert_eq!(rows.len(), STANDARD_AGES.len());
        assert_eq!(rows.iter().map(|r| r.age).collect::<Vec<_>>(), STANDARD_AGES.to_vec());

        let at_69 = rows.iter().find(|r| r.age == 69).unwrap();
        assert_eq!(at_69.prices.oro.annual, 2002.31);
        assert_eq!(at_69.prices.oro.monthly, 166.86);

        for row in &rows {
            assert!(row.prices.plata.annual < row.prices.oro.annual);
            assert!(row.prices.oro.annual < row.prices.diamante.annual);
        }
    }

    #[test]
    fn test_price_row_serializes_flat() {
        let engine = PremiumEngine::default_pricing();
        let rows = price_table(&engine, &[69]);
        let json = serde_json::to_value(&rows[0]).unwrap();

        assert_eq!(json["age"], 69);
        assert_eq!(json["oro"]["annual"], 2002.31);
    }

    #[test]
    fn test_family_table() {
        let engine = PremiumEngine::default_pricing();
        let rows = family_table(&engine, &FAMILY_AGES, PlanTier::Oro);

        for row in &rows {
            assert_abs_diff_eq!(row.family / row.individual, 1.8, epsilon = 1e-3);
            assert_abs_diff_eq!(row.increment, row.family - row.individual, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_optional_services_table() {
        let engine = PremiumEngine::default_pricing();
        let rows = optional_services_table(&engine, OPTIONAL_REFERENCE_AGE);

        assert_eq!(rows.len(), 2);
        let funeral = &rows[0];
        assert_eq!(funeral.service_id, ServiceId::FuneralAssistance);
        assert_eq!(funeral.additional_annual.plata, 0.0);
        // 135 × 1.25 loaded by 1.65
        assert_abs_diff_eq!(funeral.additional_annual.oro, 278.44, epsilon = 0.02);
        assert!(funeral.additional_annual.diamante > funeral.additional_annual.oro);
    }

    #[test]
    fn test_compare_plans() {
        let engine = PremiumEngine::default_pricing();
        let comparison = compare_plans(&engine, 45);

        assert_eq!(comparison.len(), 3);
        assert_eq!(comparison[0].plan, PlanTier::Plata);
        assert_eq!(comparison[0].difference, 0.0);
        assert_eq!(comparison[0].coverage.len(), 6);
        assert_eq!(comparison[1].coverage.len(), 9);
        assert!(comparison[2].difference > comparison[1].difference);
        assert_eq!(comparison[2].features.name, "Plan Diamante");
    }

    #[test]
    fn test_recommendation_bands() {
        assert!(recommendation(25).starts_with("Plan Oro -"));
        assert!(recommendation(35).starts_with("Plan Oro o Diamante"));
        assert!(recommendation(64).starts_with("Plan Oro o Diamante"));
        assert!(recommendation(65).starts_with("Plan Diamante"));
    }

    #[test]
    fn test_age_impact() {
        let engine = PremiumEngine::default_pricing();
        let rows = age_impact(&engine, PlanTier::Oro, &AGE_IMPACT_AGES);

        let baseline = rows.iter().find(|r| r.age == AGE_IMPACT_BASELINE).unwrap();
        assert_eq!(baseline.factor, 1.0);
        let senior = rows.iter().find(|r| r.age == 75).unwrap();
        assert_abs_diff_eq!(senior.factor, 2.0, epsilon = 1e-3);
    }

    #[test]
    fn test_rendering() {
        let engine = PremiumEngine::default_pricing();

        let table = render_price_table(&price_table(&engine, &[69, 70]));
        assert!(table.starts_with("Edad"));
        assert!(table.contains("Diamante"));
        assert!(table.contains("2002"));

        let comparison = render_comparison(45, &compare_plans(&engine, 45));
        assert!(comparison.contains("PLATA"));
        assert!(comparison.contains("Base"));
        assert!(comparison.contains("Recomendación"));
    }

    #[test]
    fn test_grid_layout() {
        let engine = PremiumEngine::default_pricing();
        let rows = price_table(&engine, &[45, 69]);

        let annual = render_price_table(&rows);
        let lines: Vec<&str> = annual.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "-".repeat(44));
        assert!(lines[3].starts_with("69"));
        assert!(lines[3].contains("2002"));
        assert!(annual.ends_with('\n'));

        let monthly = render_monthly_table(&rows);
        assert_eq!(monthly.lines().nth(1).unwrap(), "-".repeat(38));
        assert!(monthly.lines().nth(3).unwrap().contains("167"));
    }
}
