//! Premium calculation engine
//!
//! Applies the rating adjustments in a fixed order:
//! service premiums → optional loading → age factor → family factor → loadings

use log::debug;

use super::applicant::{validate_age, AgeValidation, Applicant, OptionalSelections};
use super::breakdown::{round_currency, CalculationStep, CoverageItem, PremiumBreakdown, ServicePremiumDetail};
use crate::rating::{
    PlanInfo, PlanTier, RatingFactors, RatingTables, Service, ServiceCatalog, ServiceCategory, TierValues,
};

/// Stateless premium engine over immutable rating tables
///
/// Build once and share by reference or `Arc`; every call is a pure function
/// of the tables and its arguments.
#[derive(Debug, Clone)]
pub struct PremiumEngine {
    tables: RatingTables,
}

impl PremiumEngine {
    pub fn new(tables: RatingTables) -> Self {
        Self { tables }
    }

    /// Engine over the built-in workbook tables
    pub fn default_pricing() -> Self {
        Self::new(RatingTables::default_pricing())
    }

    /// Price one service for a tier
    fn price_service(&self, service: &Service, tier: PlanTier) -> ServicePremiumDetail {
        let risk_premium = service.risk_premium();
        let tariff_premium = risk_premium * self.tables.factors.tariff_multiplier;
        let plan_multiplier = service.plan_multiplier(tier);

        ServicePremiumDetail {
            service_id: service.id,
            service_name: service.name.clone(),
            frequency: service.frequency,
            base_cost: service.base_cost,
            risk_premium,
            tariff_premium,
            plan_multiplier,
            final_premium: tariff_premium * plan_multiplier,
            included: plan_multiplier > 0.0,
        }
    }

    /// Calculate the annual and monthly premium for an applicant
    ///
    /// The age is not checked here; call [`PremiumEngine::validate_age`] first
    /// to enforce the insurable range. Ages outside it still price using
    /// whichever age band they fall into.
    pub fn calculate_premium(
        &self,
        applicant: &Applicant,
        tier: PlanTier,
        optionals: &OptionalSelections,
        include_breakdown: bool,
    ) -> PremiumBreakdown {
        let factors = &self.tables.factors;
        let catalog = &self.tables.services;

        // 1. Bundled services covered by the tier
        let base_details: Vec<ServicePremiumDetail> = catalog
            .in_category(ServiceCategory::Base)
            .filter(|s| s.is_covered(tier))
            .map(|s| self.price_service(s, tier))
            .collect();
        let base_premium: f64 = base_details.iter().map(|d| d.final_premium).sum();

        // 2. Selected add-ons, loaded as a group
        let optional_details: Vec<ServicePremiumDetail> = optionals
            .selected()
            .map(|id| self.price_service(catalog.get(id), tier))
            .collect();
        let optionals_raw: f64 = optional_details.iter().map(|d| d.final_premium).sum();
        let optionals_premium = optionals_raw * factors.optional_factor;

        // 3. Subtotal
        let subtotal = base_premium + optionals_premium;

        // 4. Age band
        let age_multiplier = factors.age_factors.factor_for(applicant.age);
        let after_age = subtotal * age_multiplier;
        let age_adjustment = after_age - subtotal;

        // 5. Parents / in-laws
        let family_multiplier = factors.family_multiplier(applicant.include_parents);
        let after_family = after_age * family_multiplier;
        let family_adjustment = after_family - after_age;

        // 6. Loadings
        let expenses = after_family * factors.expense_rate;
        let profit = after_family * factors.profit_rate;
        let commission = after_family * factors.commission_rate;

        // 7. Rounded once, at the end
        let total_annual = round_currency(after_family + expenses + profit + commission);
        let total_monthly = round_currency(total_annual / 12.0);

        debug!(
            "Priced age={} tier={} parents={} optionals={:?}: annual={:.2} monthly={:.2}",
            applicant.age, tier, applicant.include_parents, optionals, total_annual, total_monthly
        );

        let mut breakdown = PremiumBreakdown {
            base_premium,
            optionals_premium,
            age_adjustment,
            family_adjustment,
            expenses,
            profit,
            commission,
            pre_loading_premium: after_family,
            total_annual,
            total_monthly,
            service_breakdown: None,
            calculation_steps: None,
        };

        if include_breakdown {
            let steps = vec![
                CalculationStep {
                    step: 1,
                    description: "Prima base de servicios incluidos".to_string(),
                    value: base_premium,
                    calculation: format!(
                        "Suma de {} servicios del plan {} (frecuencia × costo × {} × factor de plan)",
                        base_details.len(),
                        tier,
                        factors.tariff_multiplier
                    ),
                },
                CalculationStep {
                    step: 2,
                    description: "Prima servicios opcionales".to_string(),
                    value: optionals_premium,
                    calculation: format!("{:.2} × {}", optionals_raw, factors.optional_factor),
                },
                CalculationStep {
                    step: 3,
                    description: "Subtotal antes de factores".to_string(),
                    value: subtotal,
                    calculation: format!("{:.2} + {:.2}", base_premium, optionals_premium),
                },
                CalculationStep {
                    step: 4,
                    description: "Ajuste por edad".to_string(),
                    value: age_adjustment,
                    calculation: format!(
                        "{:.2} × {} − {:.2} (edad {}, corte {})",
                        subtotal, age_multiplier, subtotal, applicant.age, factors.age_factors.cutoff_age
                    ),
                },
                CalculationStep {
                    step: 5,
                    description: "Ajuste familiar".to_string(),
                    value: family_adjustment,
                    calculation: format!("{:.2} × {} − {:.2}", after_age, family_multiplier, after_age),
                },
                CalculationStep {
                    step: 6,
                    description: "Gastos, utilidad y comisión".to_string(),
                    value: expenses + profit + commission,
                    calculation: format!(
                        "{:.2} × ({} + {} + {})",
                        after_family, factors.expense_rate, factors.profit_rate, factors.commission_rate
                    ),
                },
                CalculationStep {
                    step: 7,
                    description: "Prima total anual".to_string(),
                    value: total_annual,
                    calculation: format!(
                        "{:.2} + {:.2} + {:.2} + {:.2}; mensual {:.2}",
                        after_family, expenses, profit, commission, total_monthly
                    ),
                },
            ];

            let mut details = base_details;
            details.extend(optional_details);
            breakdown.service_breakdown = Some(details);
            breakdown.calculation_steps = Some(steps);
        }

        breakdown
    }

    /// Coverage for a tier: every bundled service, then each selected add-on
    pub fn coverage_details(&self, tier: PlanTier, optionals: &OptionalSelections) -> Vec<CoverageItem> {
        let catalog = &self.tables.services;

        let bundled = catalog.in_category(ServiceCategory::Base).map(|s| CoverageItem {
            service_name: s.name.clone(),
            included: s.is_covered(tier),
            coverage: s.coverage_for(tier).to_string(),
            service_type: ServiceCategory::Base,
        });

        let add_ons = optionals.selected().map(|id| {
            let s = catalog.get(id);
            CoverageItem {
                service_name: s.name.clone(),
                included: true,
                coverage: s.coverage_for(tier).to_string(),
                service_type: ServiceCategory::Optional,
            }
        });

        bundled.chain(add_ons).collect()
    }

    /// Check the insurable age range
    pub fn validate_age(&self, age: i32) -> AgeValidation {
        validate_age(age)
    }

    pub fn services_configuration(&self) -> &ServiceCatalog {
        &self.tables.services
    }

    pub fn calculation_factors(&self) -> &RatingFactors {
        &self.tables.factors
    }

    pub fn plans_info(&self) -> &TierValues<PlanInfo> {
        &self.tables.plans
    }

    pub fn tables(&self) -> &RatingTables {
        &self.tables
    }
}

impl Default for PremiumEngine {
    fn default() -> Self {
        Self::default_pricing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::ServiceId;
    use approx::assert_abs_diff_eq;

    fn quote(age: i32, parents: bool, tier: PlanTier, optionals: OptionalSelections) -> PremiumBreakdown {
        PremiumEngine::default_pricing().calculate_premium(&Applicant::new(age, parents), tier, &optionals, false)
    }

    fn all_options() -> [OptionalSelections; 4] {
        [
            OptionalSelections::new(false, false),
            OptionalSelections::new(true, false),
            OptionalSelections::new(false, true),
            OptionalSelections::new(true, true),
        ]
    }

    #[test]
    fn test_workbook_reference_cases() {
        // Reference values from the pricing workbook are pre-loading premiums
        let base = quote(69, false, PlanTier::Oro, OptionalSelections::none());
        assert_abs_diff_eq!(base.pre_loading_premium, 1213.5239446936341, epsilon = 1e-9);
        assert_eq!(round_currency(base.pre_loading_premium), 1213.52);
        assert_eq!(round_currency(base.pre_loading_premium / 12.0), 101.13);
        assert_eq!(base.total_annual, 2002.31);
        assert_eq!(base.total_monthly, 166.86);

        let diamond = quote(69, false, PlanTier::Diamante, OptionalSelections::none());
        assert_eq!(round_currency(diamond.pre_loading_premium), 1518.67);
        assert_eq!(diamond.total_annual, 2505.8);

        let senior = quote(75, false, PlanTier::Oro, OptionalSelections::none());
        assert_eq!(round_currency(senior.pre_loading_premium), 2427.05);
        assert_eq!(senior.total_annual, 4004.63);
    }

    #[test]
    fn test_base_tier_premium() {
        let plata = quote(45, false, PlanTier::Plata, OptionalSelections::none());

        assert_abs_diff_eq!(plata.base_premium, 110.25175124869169, epsilon = 1e-9);
        assert_eq!(plata.optionals_premium, 0.0);
        assert_eq!(plata.total_annual, 181.92);
    }

    #[test]
    fn test_tier_monotonicity() {
        for age in [18, 35, 69, 70, 80] {
            for parents in [false, true] {
                for options in all_options() {
                    let plata = quote(age, parents, PlanTier::Plata, options);
                    let oro = quote(age, parents, PlanTier::Oro, options);
                    let diamante = quote(age, parents, PlanTier::Diamante, options);

                    assert!(plata.total_annual < oro.total_annual, "age {} {:?}", age, options);
                    assert!(oro.total_annual < diamante.total_annual, "age {} {:?}", age, options);
                }
            }
        }
    }

    #[test]
    fn test_age_cutoff() {
        for age in [18, 30, 50, 69] {
            assert_eq!(quote(age, false, PlanTier::Oro, OptionalSelections::none()).age_adjustment, 0.0);
        }

        for tier in PlanTier::ALL {
            let at_69 = quote(69, false, tier, OptionalSelections::new(true, true));
            for age in [70, 75, 80] {
                let older = quote(age, false, tier, OptionalSelections::new(true, true));
                assert!(older.age_adjustment > 0.0);
                assert_abs_diff_eq!(older.total_annual / at_69.total_annual, 2.0, epsilon = 1e-3);
            }
        }
    }

    #[test]
    fn test_family_factor() {
        let individual = quote(45, false, PlanTier::Oro, OptionalSelections::none());
        assert_eq!(individual.family_adjustment, 0.0);

        let family = quote(45, true, PlanTier::Oro, OptionalSelections::none());
        let after_age = family.base_premium + family.optionals_premium + family.age_adjustment;
        assert_abs_diff_eq!(family.family_adjustment, after_age * 0.8, epsilon = 1e-9);
        assert_abs_diff_eq!(family.family_adjustment, 970.8191557549073, epsilon = 1e-6);

        let senior_family = quote(75, true, PlanTier::Diamante, OptionalSelections::new(true, true));
        let after_age = senior_family.base_premium + senior_family.optionals_premium + senior_family.age_adjustment;
        assert_abs_diff_eq!(senior_family.family_adjustment, after_age * 0.8, epsilon = 1e-9);
    }

    #[test]
    fn test_parents_ages_do_not_scale_family_factor() {
        let engine = PremiumEngine::default_pricing();
        let mut applicant = Applicant::new(40, true);
        let flat = engine.calculate_premium(&applicant, PlanTier::Oro, &OptionalSelections::none(), false);

        applicant.parents_ages = vec![66, 68, 71, 74];
        let listed = engine.calculate_premium(&applicant, PlanTier::Oro, &OptionalSelections::none(), false);

        assert_eq!(flat, listed);
    }

    #[test]
    fn test_optional_services() {
        let funeral = quote(69, false, PlanTier::Oro, OptionalSelections::new(true, false));
        assert_abs_diff_eq!(funeral.optionals_premium, 168.75, epsilon = 1e-9);

        let vet = quote(69, false, PlanTier::Oro, OptionalSelections::new(false, true));
        assert_abs_diff_eq!(vet.optionals_premium, 66.0375, epsilon = 1e-9);

        let both = quote(69, false, PlanTier::Oro, OptionalSelections::new(true, true));
        assert_abs_diff_eq!(both.optionals_premium, (135.0 + 52.83) * 1.25, epsilon = 1e-9);

        // Add-ons are priced at zero on the base tier
        let plata = quote(69, false, PlanTier::Plata, OptionalSelections::new(true, true));
        assert_eq!(plata.optionals_premium, 0.0);

        // Diamante scales funeral assistance by 1.5
        let diamond = quote(69, false, PlanTier::Diamante, OptionalSelections::new(true, false));
        assert_abs_diff_eq!(diamond.optionals_premium, 135.0 * 1.5 * 1.25, epsilon = 1e-9);
    }

    #[test]
    fn test_loadings_on_adjusted_premium() {
        let result = quote(45, false, PlanTier::Oro, OptionalSelections::none());

        assert_abs_diff_eq!(result.expenses, result.pre_loading_premium * 0.20, epsilon = 1e-9);
        assert_abs_diff_eq!(result.profit, result.pre_loading_premium * 0.15, epsilon = 1e-9);
        assert_abs_diff_eq!(result.commission, result.pre_loading_premium * 0.30, epsilon = 1e-9);
    }

    #[test]
    fn test_breakdown_sum_and_monthly_laws() {
        for age in [-5, 18, 42, 69, 70, 80, 95] {
            for parents in [false, true] {
                for tier in PlanTier::ALL {
                    for options in all_options() {
                        let result = quote(age, parents, tier, options);

                        assert_abs_diff_eq!(result.total_annual, result.component_sum(), epsilon = 0.01);
                        assert_eq!(result.total_monthly, round_currency(result.total_annual / 12.0));
                    }
                }
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let engine = PremiumEngine::default_pricing();
        let applicant = Applicant::new(72, true);
        let options = OptionalSelections::new(true, true);

        let first = engine.calculate_premium(&applicant, PlanTier::Diamante, &options, true);
        let second = engine.calculate_premium(&applicant, PlanTier::Diamante, &options, true);

        assert_eq!(first, second);
        assert_eq!(first.total_annual.to_bits(), second.total_annual.to_bits());
    }

    #[test]
    fn test_detailed_breakdown() {
        let engine = PremiumEngine::default_pricing();
        let applicant = Applicant::new(35, false);
        let options = OptionalSelections::new(true, false);

        let detailed = engine.calculate_premium(&applicant, PlanTier::Oro, &options, true);
        let plain = engine.calculate_premium(&applicant, PlanTier::Oro, &options, false);

        assert!(plain.service_breakdown.is_none());
        assert!(plain.calculation_steps.is_none());
        assert_eq!(detailed.total_annual, plain.total_annual);

        let services = detailed.service_breakdown.unwrap();
        assert_eq!(services.len(), 10);
        assert!(services.iter().all(|d| d.included));
        assert_eq!(services.last().unwrap().service_id, ServiceId::FuneralAssistance);

        let doctor = services.iter().find(|d| d.service_id == ServiceId::HomeDoctorVisit).unwrap();
        assert_abs_diff_eq!(doctor.tariff_premium, doctor.risk_premium * 4.5, epsilon = 1e-9);
        assert_abs_diff_eq!(doctor.final_premium, doctor.tariff_premium * 1.2, epsilon = 1e-9);

        let steps = detailed.calculation_steps.unwrap();
        assert_eq!(steps.iter().map(|s| s.step).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(steps[6].value, detailed.total_annual);
    }

    #[test]
    fn test_base_tier_breakdown_excludes_uncovered_services() {
        let engine = PremiumEngine::default_pricing();
        let result =
            engine.calculate_premium(&Applicant::new(30, false), PlanTier::Plata, &OptionalSelections::none(), true);

        let ids: Vec<_> = result.service_breakdown.unwrap().iter().map(|d| d.service_id).collect();
        assert_eq!(ids.len(), 6);
        assert!(!ids.contains(&ServiceId::HospitalEmergency));
        assert!(!ids.contains(&ServiceId::DiagnosticTests));
    }

    #[test]
    fn test_coverage_details() {
        let engine = PremiumEngine::default_pricing();

        let plata = engine.coverage_details(PlanTier::Plata, &OptionalSelections::none());
        assert_eq!(plata.len(), 9);
        for item in plata.iter().filter(|c| {
            c.service_name.contains("Urgencia") || c.service_name.contains("Consulta") || c.service_name.contains("Pruebas")
        }) {
            assert!(!item.included);
            assert_eq!(item.coverage, "N/A");
        }

        let oro = engine.coverage_details(PlanTier::Oro, &OptionalSelections::none());
        assert!(oro.iter().all(|c| c.included));

        let with_add_ons = engine.coverage_details(PlanTier::Oro, &OptionalSelections::new(true, true));
        assert_eq!(with_add_ons.len(), 11);
        let funeral = &with_add_ons[9];
        assert_eq!(funeral.service_name, "Asistencia funeraria");
        assert_eq!(funeral.service_type, ServiceCategory::Optional);
        assert_eq!(funeral.coverage, "$30,000");

        // Selected add-ons are always listed as included, even where the tier prices them at zero
        let plata_add_ons = engine.coverage_details(PlanTier::Plata, &OptionalSelections::new(false, true));
        assert!(plata_add_ons.last().unwrap().included);
    }

    #[test]
    fn test_accessors() {
        let engine = PremiumEngine::default_pricing();

        assert_eq!(engine.services_configuration().len(), 11);
        assert_eq!(engine.calculation_factors().family_factor, 1.8);
        assert_eq!(engine.plans_info().get(PlanTier::Oro).name, "Plan Oro");
        assert!(!engine.validate_age(81).valid);
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PremiumEngine>();
    }
}
