use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tariff dataset document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffCatalog {
    pub tariff_profiles: Vec<TariffProfile>,
    /// Shared cost parameters, served verbatim
    pub general_costs: Value,
}

/// One tariff record
///
/// Only the identifying fields are typed; every other field of the record
/// is kept in `extra` and emitted unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffProfile {
    pub tariff_id: String,
    pub company: String,
    pub profile: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Lightweight listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffSummary {
    pub id: String,
    pub company: String,
    pub name: String,
}

/// Response body for a single tariff lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TariffDetails {
    pub description: String,
    pub details: TariffProfile,
}

impl TariffProfile {
    pub fn description(&self) -> String {
        format!("{} - {}", self.company, self.profile)
    }

    pub fn summary(&self) -> TariffSummary {
        TariffSummary {
            id: self.tariff_id.clone(),
            company: self.company.clone(),
            name: self.profile.clone(),
        }
    }
}

impl From<TariffProfile> for TariffDetails {
    fn from(profile: TariffProfile) -> Self {
        Self {
            description: profile.description(),
            details: profile,
        }
    }
}

impl TariffCatalog {
    /// First record with exactly this identifier
    pub fn find(&self, tariff_id: &str) -> Option<&TariffProfile> {
        self.tariff_profiles
            .iter()
            .find(|profile| profile.tariff_id == tariff_id)
    }

    pub fn summaries(&self) -> Vec<TariffSummary> {
        self.tariff_profiles.iter().map(TariffProfile::summary).collect()
    }
}
