//! Error types for rating table construction and parsing

use thiserror::Error;

use crate::rating::ServiceId;

/// Errors raised while building or loading rating tables
#[derive(Debug, Error)]
pub enum RatingError {
    #[error("I/O error reading rating tables: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error reading rating tables: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown plan tier: {0} (expected plata, oro or diamante)")]
    UnknownPlanTier(String),

    #[error("Unknown rating factor: {0}")]
    UnknownFactor(String),

    #[error("Missing rating factor: {0}")]
    MissingFactor(&'static str),

    #[error("Rating factor {0} appears more than once")]
    DuplicateFactor(String),

    #[error("Service {0} appears more than once in the catalog")]
    DuplicateService(ServiceId),

    #[error("Service {0} is missing from the catalog")]
    MissingService(ServiceId),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: f64 },
}

pub type Result<T> = std::result::Result<T, RatingError>;
