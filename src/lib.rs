//! Health Quote - Premium quotation engine for tiered health assistance plans
//!
//! This library provides:
//! - Static rating tables (service catalog, loading factors, plan metadata), built in or loaded from CSV
//! - The premium calculation engine with per-service and per-step breakdowns
//! - Price grids and plan comparisons for reporting
//! - A reference check of engine output against the pricing workbook
//! - A transport-independent JSON API

pub mod error;
pub mod rating;
pub mod quote;
pub mod report;
pub mod validation;
pub mod api;

// Re-export commonly used types
pub use error::RatingError;
pub use rating::{PlanTier, RatingFactors, RatingTables, ServiceCatalog, ServiceId};
pub use quote::{Applicant, OptionalSelections, PremiumBreakdown, PremiumEngine};
pub use validation::ReferenceValidator;
