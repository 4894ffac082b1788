//! Carbon footprint estimate
//!
//! A live figure wins when the caller has one (e.g. from an external
//! knowledge service). Otherwise the bundled fallback table answers, in this
//! order: the species figure, the figure for the resolved fishing method,
//! then the seafood-wide average.
//!
//! Figures are kg CO₂e per kg of product.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::utils::Locale;

pub const CO2_UNIT: &str = "kg_co2_per_kg";

/// Reference footprints used for comparisons
pub const CHICKEN_KG_CO2: f64 = 4.5;
pub const BEEF_KG_CO2: f64 = 27.0;

/// Below this ratio the comparison switches from chicken to beef
const CHICKEN_MIN_RATIO: f64 = 2.0;

/// Where an estimate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Co2Source {
    Live,
    Fallback,
}

/// Footprint attached to an assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Co2Estimate {
    pub value: f64,
    pub unit: String,
    pub source: Co2Source,
    /// Comparison with a meat reference, when one reads sensibly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<String>,
}

impl Co2Estimate {
    pub fn new(value: f64, source: Co2Source, locale: Locale) -> Self {
        Self {
            value,
            unit: CO2_UNIT.to_string(),
            source,
            comparison: comparison(value, locale),
        }
    }
}

/// Bundled fallback figures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Co2Table {
    #[serde(default)]
    by_species: FxHashMap<String, f64>,
    #[serde(default)]
    by_method: FxHashMap<String, f64>,
    global_average_seafood: f64,
}

impl Co2Table {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn global_average(&self) -> f64 {
        self.global_average_seafood
    }

    /// Number of species and method figures
    pub fn len(&self) -> usize {
        self.by_species.len() + self.by_method.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_species.is_empty() && self.by_method.is_empty()
    }

    /// Fallback figure for a species caught with a canonical method key
    pub fn fallback(&self, species_id: &str, method_key: &str) -> f64 {
        self.by_species
            .get(species_id)
            .or_else(|| self.by_method.get(method_key))
            .copied()
            .unwrap_or(self.global_average_seafood)
    }

    /// Live figure when usable, else the fallback chain
    pub fn estimate(
        &self,
        species_id: &str,
        method_key: &str,
        live: Option<f64>,
        locale: Locale,
    ) -> Co2Estimate {
        match live.filter(|value| value.is_finite() && *value >= 0.0) {
            Some(value) => Co2Estimate::new(value, Co2Source::Live, locale),
            None => Co2Estimate::new(
                self.fallback(species_id, method_key),
                Co2Source::Fallback,
                locale,
            ),
        }
    }
}

/// "N× less CO₂ than chicken" when the product emits at most half of
/// chicken's footprint, else the same against beef. `None` for zero,
/// negative or beef-level figures.
pub fn comparison(value: f64, locale: Locale) -> Option<String> {
    if !value.is_finite() || value <= 0.0 || value >= BEEF_KG_CO2 {
        return None;
    }

    let chicken = CHICKEN_KG_CO2 / value;
    if chicken >= CHICKEN_MIN_RATIO {
        let ratio = format!("{:.1}", (chicken * 10.0).round() / 10.0);
        return Some(match locale {
            Locale::Es => format!("{} veces menos CO₂ que el pollo", ratio),
            Locale::En => format!("{}× less CO₂ than chicken", ratio),
        });
    }

    let ratio = format!("{:.0}", (BEEF_KG_CO2 / value).round());
    Some(match locale {
        Locale::Es => format!("{} veces menos CO₂ que la ternera", ratio),
        Locale::En => format!("{}× less CO₂ than beef", ratio),
    })
}
