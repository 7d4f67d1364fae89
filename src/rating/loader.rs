//! CSV-based rating table loader
//!
//! Loads the service catalog and rating factors from CSV files in data/rating/

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::info;
use serde::Deserialize;

use super::factors::{AgeBandFactors, RatingFactors};
use super::plans::TierValues;
use super::services::{Service, ServiceCategory, ServiceId};
use crate::error::{RatingError, Result};

/// Default path to rating tables directory
pub const DEFAULT_RATING_PATH: &str = "data/rating";

/// Raw CSV row matching services.csv columns
#[derive(Debug, Deserialize)]
struct ServiceRow {
    id: ServiceId,
    name: String,
    frequency: f64,
    base_cost: f64,
    plata_factor: f64,
    oro_factor: f64,
    diamante_factor: f64,
    category: ServiceCategory,
    plata_coverage: String,
    oro_coverage: String,
    diamante_coverage: String,
}

impl ServiceRow {
    fn into_service(self) -> Service {
        Service {
            id: self.id,
            name: self.name,
            frequency: self.frequency,
            base_cost: self.base_cost,
            plan_factors: TierValues::new(self.plata_factor, self.oro_factor, self.diamante_factor),
            category: self.category,
            coverage: TierValues::new(self.plata_coverage, self.oro_coverage, self.diamante_coverage),
        }
    }
}

/// Load service rows from services.csv
pub fn load_services(path: &Path) -> Result<Vec<Service>> {
    let file = File::open(path.join("services.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut services = Vec::new();
    for result in reader.deserialize() {
        let row: ServiceRow = result?;
        services.push(row.into_service());
    }

    Ok(services)
}

/// Raw CSV row matching factors.csv columns
#[derive(Debug, Deserialize)]
struct FactorRow {
    factor: String,
    value: f64,
}

/// Load rating factors from factors.csv
/// Each row is `factor,value`; every factor must be present exactly once
pub fn load_factors(path: &Path) -> Result<RatingFactors> {
    let file = File::open(path.join("factors.csv"))?;
    read_factors(file)
}

fn read_factors<R: Read>(source: R) -> Result<RatingFactors> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);

    let mut values: HashMap<String, f64> = HashMap::new();
    for result in reader.deserialize() {
        let row: FactorRow = result?;
        if !row.value.is_finite() || row.value < 0.0 {
            return Err(RatingError::InvalidValue {
                field: row.factor,
                value: row.value,
            });
        }
        if values.contains_key(&row.factor) {
            return Err(RatingError::DuplicateFactor(row.factor));
        }
        values.insert(row.factor, row.value);
    }

    factors_from_map(values)
}

fn factors_from_map(mut values: HashMap<String, f64>) -> Result<RatingFactors> {
    let mut take = |key: &'static str| values.remove(key).ok_or(RatingError::MissingFactor(key));

    let cutoff = take("age_cutoff")?;
    if cutoff.fract() != 0.0 || cutoff > i32::MAX as f64 {
        return Err(RatingError::InvalidValue {
            field: "age_cutoff".to_string(),
            value: cutoff,
        });
    }

    let factors = RatingFactors {
        tariff_multiplier: take("tariff_multiplier")?,
        expense_rate: take("expenses")?,
        profit_rate: take("profit")?,
        commission_rate: take("commission")?,
        family_factor: take("family_factor")?,
        optional_factor: take("optional_factor")?,
        age_factors: AgeBandFactors {
            cutoff_age: cutoff as i32,
            under_cutoff: take("age_factor_under_cutoff")?,
            at_or_over_cutoff: take("age_factor_at_or_over_cutoff")?,
        },
    };

    if let Some(unknown) = values.into_keys().min() {
        return Err(RatingError::UnknownFactor(unknown));
    }

    Ok(factors)
}

/// Raw rating tables as read from disk
pub struct LoadedRatingTables {
    pub services: Vec<Service>,
    pub factors: RatingFactors,
}

impl LoadedRatingTables {
    /// Load all tables from the default path
    pub fn load_default() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_RATING_PATH))
    }

    /// Load all tables from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let loaded = Self {
            services: load_services(path)?,
            factors: load_factors(path)?,
        };
        info!(
            "Loaded {} services and rating factors from {}",
            loaded.services.len(),
            path.display()
        );
        Ok(loaded)
    }
}
