//! Catalog of insured assistance services

use std::fmt;

use serde::{Deserialize, Serialize};

use super::plans::{PlanTier, TierValues};
use crate::error::{RatingError, Result};

/// Stable identifier for every service in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceId {
    Telemedicine,
    PhoneMedicalGuidance,
    PhonePsychologicalGuidance,
    PhoneNutritionalGuidance,
    PhoneGestationalGuidance,
    HomeDoctorVisit,
    HospitalEmergency,
    DiagnosticTests,
    GeneralConsultation,
    FuneralAssistance,
    TeleVet,
}

impl ServiceId {
    /// Catalog order, matching the source rating sheet
    pub const ALL: [ServiceId; 11] = [
        ServiceId::Telemedicine,
        ServiceId::PhoneMedicalGuidance,
        ServiceId::PhonePsychologicalGuidance,
        ServiceId::PhoneNutritionalGuidance,
        ServiceId::PhoneGestationalGuidance,
        ServiceId::HomeDoctorVisit,
        ServiceId::HospitalEmergency,
        ServiceId::DiagnosticTests,
        ServiceId::GeneralConsultation,
        ServiceId::FuneralAssistance,
        ServiceId::TeleVet,
    ];

    /// Position of this service in the catalog
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceId::Telemedicine => "telemedicine",
            ServiceId::PhoneMedicalGuidance => "phone_medical_guidance",
            ServiceId::PhonePsychologicalGuidance => "phone_psychological_guidance",
            ServiceId::PhoneNutritionalGuidance => "phone_nutritional_guidance",
            ServiceId::PhoneGestationalGuidance => "phone_gestational_guidance",
            ServiceId::HomeDoctorVisit => "home_doctor_visit",
            ServiceId::HospitalEmergency => "hospital_emergency",
            ServiceId::DiagnosticTests => "diagnostic_tests",
            ServiceId::GeneralConsultation => "general_consultation",
            ServiceId::FuneralAssistance => "funeral_assistance",
            ServiceId::TeleVet => "tele_vet",
        }
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a service is bundled into a plan or sold as an add-on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    /// Bundled into every plan whose multiplier is positive
    Base,
    /// Added only when the applicant selects it
    Optional,
}

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: ServiceId,

    /// Display name
    pub name: String,

    /// Expected annual occurrences per insured
    pub frequency: f64,

    /// Cost per occurrence
    pub base_cost: f64,

    /// Multiplier per plan tier (0 = not covered)
    pub plan_factors: TierValues<f64>,

    #[serde(rename = "serviceType")]
    pub category: ServiceCategory,

    /// Human-readable coverage limit per plan tier
    pub coverage: TierValues<String>,
}

impl Service {
    /// Expected claim cost: frequency × base cost
    pub fn risk_premium(&self) -> f64 {
        self.frequency * self.base_cost
    }

    pub fn plan_multiplier(&self, tier: PlanTier) -> f64 {
        *self.plan_factors.get(tier)
    }

    pub fn is_covered(&self, tier: PlanTier) -> bool {
        self.plan_multiplier(tier) > 0.0
    }

    pub fn coverage_for(&self, tier: PlanTier) -> &str {
        self.coverage.get(tier)
    }
}

/// Complete service catalog, indexed by [`ServiceId`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ServiceCatalog {
    services: Vec<Service>,
}

impl ServiceCatalog {
    /// Build a catalog from an arbitrary list, requiring every service exactly once
    pub fn from_services(services: Vec<Service>) -> Result<Self> {
        let mut slots: Vec<Option<Service>> = vec![None; ServiceId::ALL.len()];

        for service in services {
            for (field, value) in [("frequency", service.frequency), ("base_cost", service.base_cost)] {
                if !value.is_finite() || value < 0.0 {
                    return Err(RatingError::InvalidValue {
                        field: format!("{}.{}", service.id, field),
                        value,
                    });
                }
            }
            for tier in PlanTier::ALL {
                let factor = service.plan_multiplier(tier);
                if !factor.is_finite() || factor < 0.0 {
                    return Err(RatingError::InvalidValue {
                        field: format!("{}.{}_factor", service.id, tier),
                        value: factor,
                    });
                }
            }

            let slot = &mut slots[service.id.index()];
            if slot.is_some() {
                return Err(RatingError::DuplicateService(service.id));
            }
            *slot = Some(service);
        }

        let services = slots
            .into_iter()
            .zip(ServiceId::ALL)
            .map(|(slot, id)| slot.ok_or(RatingError::MissingService(id)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { services })
    }

    /// Catalog values taken from the pricing workbook
    pub fn default_catalog() -> Self {
        use ServiceCategory::{Base, Optional};

        const UNLIMITED: (&str, &str, &str) = ("Ilimitado", "Ilimitado", "Ilimitado");

        Self {
            services: vec![
                service(ServiceId::Telemedicine, "Telemedicina", 0.02, 587.0, (1.0, 1.0, 1.0), Base, UNLIMITED),
                service(
                    ServiceId::PhoneMedicalGuidance,
                    "Orientación Medica Telefónica",
                    0.01,
                    90.46707516000002,
                    (1.0, 1.0, 1.0),
                    Base,
                    UNLIMITED,
                ),
                service(
                    ServiceId::PhonePsychologicalGuidance,
                    "Orientación Psicológica Telefónica",
                    0.008,
                    395.37083653846156,
                    (1.0, 1.0, 1.0),
                    Base,
                    UNLIMITED,
                ),
                service(
                    ServiceId::PhoneNutritionalGuidance,
                    "Orientación Nutricional Telefónica",
                    0.004363331235577932,
                    395.37083653846156,
                    (1.0, 1.0, 1.0),
                    Base,
                    UNLIMITED,
                ),
                service(
                    ServiceId::PhoneGestationalGuidance,
                    "Orientación Gestacional Telefónica",
                    0.002,
                    450.0,
                    (1.0, 1.0, 1.0),
                    Base,
                    UNLIMITED,
                ),
                service(
                    ServiceId::HomeDoctorVisit,
                    "Envío De Medico A Domicilio",
                    0.008,
                    758.4522252204242,
                    (1.0, 1.2, 1.5),
                    Base,
                    ("1 Evento / $1,500", "2 Eventos / $1,500", "3 Eventos / $1,500"),
                ),
                service(
                    ServiceId::HospitalEmergency,
                    "Asistencia de Urgencia Hospitalaria",
                    0.01,
                    2000.0,
                    (0.0, 1.0, 1.5),
                    Base,
                    ("N/A", "$2,000", "$4,000"),
                ),
                service(
                    ServiceId::DiagnosticTests,
                    "Pruebas Diagnosticas",
                    0.1,
                    1735.1026939575004,
                    (0.0, 1.0, 1.25),
                    Base,
                    ("N/A", "7 Exámenes", "10 Exámenes"),
                ),
                service(
                    ServiceId::GeneralConsultation,
                    "Consulta Médica (Medicina General)",
                    0.035,
                    1441.3658739205093,
                    (0.0, 1.0, 1.25),
                    Base,
                    ("N/A", "2 Eventos / $1,500", "3 Eventos / $2,000"),
                ),
                service(
                    ServiceId::FuneralAssistance,
                    "Asistencia funeraria",
                    0.001,
                    30000.0,
                    (0.0, 1.0, 1.5),
                    Optional,
                    ("N/A", "$30,000", "$50,000"),
                ),
                service(
                    ServiceId::TeleVet,
                    "TeleVet",
                    0.02,
                    587.0,
                    (0.0, 1.0, 1.0),
                    Optional,
                    ("N/A", "Ilimitado", "Ilimitado"),
                ),
            ],
        }
    }

    /// Direct lookup; every id is present by construction
    pub fn get(&self, id: ServiceId) -> &Service {
        &self.services[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Service> {
        self.services.iter()
    }

    pub fn in_category(&self, category: ServiceCategory) -> impl Iterator<Item = &Service> {
        self.services.iter().filter(move |s| s.category == category)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        Self::default_catalog()
    }
}

fn service(
    id: ServiceId,
    name: &str,
    frequency: f64,
    base_cost: f64,
    factors: (f64, f64, f64),
    category: ServiceCategory,
    coverage: (&str, &str, &str),
) -> Service {
    Service {
        id,
        name: name.to_string(),
        frequency,
        base_cost,
        plan_factors: TierValues::new(factors.0, factors.1, factors.2),
        category,
        coverage: TierValues::new(coverage.0.to_string(), coverage.1.to_string(), coverage.2.to_string()),
    }
}
