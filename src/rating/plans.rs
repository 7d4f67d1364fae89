//! Plan tiers and descriptive plan metadata

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RatingError;

/// Coverage level of a plan, ordered by breadth and price
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    /// Base tier
    Plata,
    /// Mid tier
    Oro,
    /// Premium tier
    Diamante,
}

impl PlanTier {
    /// All tiers from cheapest to most complete
    pub const ALL: [PlanTier; 3] = [PlanTier::Plata, PlanTier::Oro, PlanTier::Diamante];

    /// Wire name used by the API and CSV tables
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Plata => "plata",
            PlanTier::Oro => "oro",
            PlanTier::Diamante => "diamante",
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanTier {
    type Err = RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plata" => Ok(PlanTier::Plata),
            "oro" => Ok(PlanTier::Oro),
            "diamante" => Ok(PlanTier::Diamante),
            _ => Err(RatingError::UnknownPlanTier(s.to_string())),
        }
    }
}

/// One value per plan tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierValues<T> {
    pub plata: T,
    pub oro: T,
    pub diamante: T,
}

impl<T> TierValues<T> {
    pub fn new(plata: T, oro: T, diamante: T) -> Self {
        Self { plata, oro, diamante }
    }

    pub fn get(&self, tier: PlanTier) -> &T {
        match tier {
            PlanTier::Plata => &self.plata,
            PlanTier::Oro => &self.oro,
            PlanTier::Diamante => &self.diamante,
        }
    }

    pub fn map<U, F: FnMut(&T) -> U>(&self, mut f: F) -> TierValues<U> {
        TierValues {
            plata: f(&self.plata),
            oro: f(&self.oro),
            diamante: f(&self.diamante),
        }
    }
}

/// Marketing description of a plan tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInfo {
    pub name: String,
    pub description: String,
    /// Indicative monthly price range, display only
    pub monthly_estimate: String,
    pub features: Vec<String>,
}

impl PlanInfo {
    fn new(name: &str, description: &str, monthly_estimate: &str, features: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            monthly_estimate: monthly_estimate.to_string(),
            features: features.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Default plan descriptions shown to prospects
pub fn default_plans_info() -> TierValues<PlanInfo> {
    TierValues {
        plata: PlanInfo::new(
            "Plan Plata",
            "Plan básico con servicios esenciales de telemedicina",
            "~$600-800",
            &["Telemedicina ilimitada", "Orientaciones telefónicas", "Médico a domicilio básico"],
        ),
        oro: PlanInfo::new(
            "Plan Oro",
            "Plan intermedio con servicios adicionales de salud",
            "~$900-1,200",
            &["Todo Plan Plata", "Urgencias hospitalarias", "Consultas médicas", "Pruebas diagnósticas"],
        ),
        diamante: PlanInfo::new(
            "Plan Diamante",
            "Plan premium con cobertura completa",
            "~$1,300-1,600",
            &["Todo Plan Oro", "Coberturas aumentadas", "Máximos beneficios"],
        ),
    }
}
