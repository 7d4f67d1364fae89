//! Rating tables: service catalog, loading factors and plan metadata

mod factors;
mod plans;
mod services;
pub mod loader;

pub use factors::{AgeBandFactors, RatingFactors};
pub use plans::{default_plans_info, PlanInfo, PlanTier, TierValues};
pub use services::{Service, ServiceCatalog, ServiceCategory, ServiceId};
pub use loader::LoadedRatingTables;

use std::path::Path;

use crate::error::Result;

/// Container for all static rating inputs
#[derive(Debug, Clone, PartialEq)]
pub struct RatingTables {
    pub services: ServiceCatalog,
    pub factors: RatingFactors,
    pub plans: TierValues<PlanInfo>,
}

impl RatingTables {
    /// Create tables with the values of the pricing workbook
    pub fn default_pricing() -> Self {
        Self {
            services: ServiceCatalog::default_catalog(),
            factors: RatingFactors::default(),
            plans: default_plans_info(),
        }
    }

    /// Load tables from CSV files in the default location (data/rating/)
    pub fn from_csv() -> Result<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_RATING_PATH))
    }

    /// Load tables from CSV files in a specific directory
    /// Plan descriptions are not tabulated and keep their built-in text
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let loaded = LoadedRatingTables::load_from(path)?;

        Ok(Self {
            services: ServiceCatalog::from_services(loaded.services)?,
            factors: loaded.factors,
            plans: default_plans_info(),
        })
    }
}

impl Default for RatingTables {
    fn default() -> Self {
        Self::default_pricing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_tables_match_defaults() {
        let tables = RatingTables::from_csv().expect("Failed to load rating tables");
        assert_eq!(tables, RatingTables::default_pricing());
    }
}
