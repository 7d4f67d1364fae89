//! Premium quotation: applicant inputs, the calculation engine and its outputs

mod applicant;
mod breakdown;
mod engine;

pub use applicant::{validate_age, AgeValidation, Applicant, OptionalSelections, MAX_AGE, MIN_AGE};
pub use breakdown::{round_currency, CalculationStep, CoverageItem, PremiumBreakdown, ServicePremiumDetail};
pub use engine::PremiumEngine;
