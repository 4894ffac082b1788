//! SIGNAL 3: CATCH AREA MODIFIER
//!
//! Scores where the product was caught using the FAO major fishing area
//! classification. Codes are hierarchical and dot-separated ("27", "27.8",
//! "27.8.a"); the most specific catalogued ancestor wins.
//!
//! Modifiers range from -15 (heavily overfished basins such as the
//! western Mediterranean) to +5 in the bundled table.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::utils::{supplied, Locale};

/// One catalogued FAO area
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaoArea {
    /// Spanish display name
    pub name: String,
    #[serde(default)]
    pub name_en: Option<String>,
    pub modifier: i32,
}

impl FaoArea {
    pub fn localized_name(&self, locale: Locale) -> &str {
        match (locale, self.name_en.as_deref()) {
            (Locale::En, Some(en)) => en,
            _ => &self.name,
        }
    }
}

/// FAO area catalogue keyed by code
#[derive(Debug, Clone, Default)]
pub struct AreaTable {
    areas: FxHashMap<String, FaoArea>,
}

impl AreaTable {
    pub fn new(areas: FxHashMap<String, FaoArea>) -> Self {
        Self { areas }
    }

    /// Parse the area catalogue from its JSON object form (`{"27.8": {...}}`)
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        let areas: FxHashMap<String, FaoArea> = serde_json::from_str(json)?;
        Ok(Self::new(areas))
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Most specific catalogued area for a code
    ///
    /// `"27.8.a"` tries `"27.8.a"`, then `"27.8"`, then `"27"`.
    pub fn lookup(&self, code: &str) -> Option<(&str, &FaoArea)> {
        let code = code.trim();
        if code.is_empty() {
            return None;
        }

        let segments: Vec<&str> = code.split('.').collect();
        (1..=segments.len()).rev().find_map(|depth| {
            let prefix = segments[..depth].join(".");
            self.areas
                .get_key_value(prefix.as_str())
                .map(|(k, v)| (k.as_str(), v))
        })
    }

    /// Modifier for a raw area signal (0 when absent or unrecognized)
    pub fn modifier(&self, code: Option<&str>) -> i32 {
        supplied(code)
            .and_then(|c| self.lookup(c))
            .map_or(0, |(_, area)| area.modifier)
    }

    /// Localized area name with the same hierarchical fallback
    ///
    /// Absent code → "unknown area" text; uncatalogued code → the code itself.
    pub fn area_name(&self, code: Option<&str>, locale: Locale) -> String {
        let Some(code) = supplied(code) else {
            return match locale {
                Locale::Es => "Zona desconocida".to_string(),
                Locale::En => "Unknown area".to_string(),
            };
        };

        match self.lookup(code) {
            Some((_, area)) => area.localized_name(locale).to_string(),
            None => code.to_string(),
        }
    }
}
