//! Regression check of engine output against the pricing workbook
//!
//! The workbook reports the adjusted premium before expense, profit and
//! commission loadings, so the reference quantities are compared against
//! `pre_loading_premium` (annual) and its twelfth (monthly).

use log::{info, warn};
use serde::Serialize;

use crate::quote::{Applicant, OptionalSelections, PremiumBreakdown, PremiumEngine};
use crate::rating::PlanTier;

/// Absolute tolerance for every reference comparison
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Quantity compared against a reference value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReferenceMetric {
    AnnualPremium,
    MonthlyPremium,
}

impl ReferenceMetric {
    fn extract(&self, breakdown: &PremiumBreakdown) -> f64 {
        match self {
            ReferenceMetric::AnnualPremium => breakdown.pre_loading_premium,
            ReferenceMetric::MonthlyPremium => breakdown.pre_loading_premium / 12.0,
        }
    }
}

/// One workbook scenario with its expected values
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCase {
    pub name: &'static str,
    pub applicant: Applicant,
    pub tier: PlanTier,
    pub optionals: OptionalSelections,
    pub expected: Vec<(ReferenceMetric, f64)>,
    /// A failing critical case fails the whole run
    pub critical: bool,
}

/// Workbook scenarios used as golden vectors
pub fn workbook_cases() -> Vec<ReferenceCase> {
    vec![
        ReferenceCase {
            name: "base_case",
            applicant: Applicant::new(69, false),
            tier: PlanTier::Oro,
            optionals: OptionalSelections::none(),
            expected: vec![
                (ReferenceMetric::AnnualPremium, 1213.5239446936341),
                (ReferenceMetric::MonthlyPremium, 101.12699539113618),
            ],
            critical: true,
        },
        ReferenceCase {
            name: "diamond_case",
            applicant: Applicant::new(69, false),
            tier: PlanTier::Diamante,
            optionals: OptionalSelections::none(),
            expected: vec![(ReferenceMetric::AnnualPremium, 1518.6680630818535)],
            critical: false,
        },
        ReferenceCase {
            name: "age_factor_case",
            applicant: Applicant::new(75, false),
            tier: PlanTier::Oro,
            optionals: OptionalSelections::none(),
            expected: vec![(ReferenceMetric::AnnualPremium, 2427.0478893872682)],
            critical: false,
        },
    ]
}

/// Outcome of a single comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub test_name: String,
    pub metric: ReferenceMetric,
    pub expected: f64,
    pub calculated: f64,
    pub difference: f64,
    pub passed: bool,
    pub critical: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub tolerance: f64,
    pub results: Vec<ValidationResult>,
}

impl ValidationReport {
    /// True when every critical comparison passed
    pub fn passed(&self) -> bool {
        self.results.iter().filter(|r| r.critical).all(|r| r.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| !r.passed)
    }
}

/// Runs reference cases against an engine
#[derive(Debug, Clone)]
pub struct ReferenceValidator {
    tolerance: f64,
    cases: Vec<ReferenceCase>,
}

impl ReferenceValidator {
    /// Workbook cases at the default tolerance
    pub fn new() -> Self {
        Self::with_cases(workbook_cases(), DEFAULT_TOLERANCE)
    }

    pub fn with_cases(cases: Vec<ReferenceCase>, tolerance: f64) -> Self {
        Self { tolerance, cases }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn run(&self, engine: &PremiumEngine) -> ValidationReport {
        let mut results = Vec::new();

        for case in &self.cases {
            let breakdown = engine.calculate_premium(&case.applicant, case.tier, &case.optionals, false);

            for &(metric, expected) in &case.expected {
                let calculated = metric.extract(&breakdown);
                let difference = (calculated - expected).abs();
                let passed = difference <= self.tolerance;

                if passed {
                    info!("{} {:?}: {:.4} (expected {:.4})", case.name, metric, calculated, expected);
                } else {
                    warn!(
                        "{} {:?}: {:.4} differs from {:.4} by {:.4}",
                        case.name, metric, calculated, expected, difference
                    );
                }

                results.push(ValidationResult {
                    test_name: case.name.to_string(),
                    metric,
                    expected,
                    calculated,
                    difference,
                    passed,
                    critical: case.critical,
                });
            }
        }

        ValidationReport {
            tolerance: self.tolerance,
            results,
        }
    }
}

impl Default for ReferenceValidator {
    fn default() -> Self {
        Self::new()
    }
}
