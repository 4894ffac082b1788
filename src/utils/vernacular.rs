//! Vernacular name handling utility
//!
//! Selects the display name for a species in the user's locale:
//! 1. First name listed for the requested locale
//! 2. First Spanish name (fallback)
//! 3. EU commercial name (last resort)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::data::SpeciesRecord;

/// Display locale for names, labels and messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Es => "es",
            Locale::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "es" | "spa" | "spanish" => Ok(Locale::Es),
            "en" | "eng" | "english" => Ok(Locale::En),
            other => Err(format!("unsupported locale '{}'", other)),
        }
    }
}

/// Get display name for a species in the given locale
pub fn display_name(species: &SpeciesRecord, locale: Locale) -> String {
    let names = &species.names;
    let preferred = match locale {
        Locale::En => first_non_blank(&names.en),
        Locale::Es => None,
    };

    preferred
        .or_else(|| first_non_blank(&names.es))
        .unwrap_or(names.eu_commercial.as_str())
        .to_string()
}

fn first_non_blank(names: &[String]) -> Option<&str> {
    names.iter().map(|s| s.trim()).find(|s| !s.is_empty())
}
