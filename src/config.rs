//! Runtime configuration for the binaries
//!
//! Read from environment variables:
//! - `DATA_DIR`: directory holding `species_db.json`, `fishing_methods.json`,
//!   `fao_areas.json` and `co2_fallback.json` (bundled datasets when unset)
//! - `PORT`: HTTP port (default 3000)
//! - `STRICT_CATALOG`: `1`/`true` makes cross-species name collisions a load error
//! - `CACHE_TTL_SECS`: assessment cache time-to-live (default 300)

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::data::ReferenceData;
use crate::search_index::NamePolicy;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub data_dir: Option<PathBuf>,
    pub port: u16,
    pub strict_catalog: bool,
    pub cache_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            port: DEFAULT_PORT,
            strict_catalog: false,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (environment, test map)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match value("PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a port number, got '{}'", raw))?,
            None => DEFAULT_PORT,
        };

        let cache_ttl_secs = match value("CACHE_TTL_SECS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("CACHE_TTL_SECS must be whole seconds, got '{}'", raw))?,
            None => DEFAULT_CACHE_TTL_SECS,
        };

        let strict_catalog = value("STRICT_CATALOG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            data_dir: value("DATA_DIR").map(PathBuf::from),
            port,
            strict_catalog,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        })
    }

    pub fn name_policy(&self) -> NamePolicy {
        if self.strict_catalog {
            NamePolicy::Reject
        } else {
            NamePolicy::LastWins
        }
    }

    /// Load reference data from `data_dir`, or the bundled datasets
    pub fn load_reference_data(&self) -> Result<ReferenceData> {
        match &self.data_dir {
            Some(dir) => ReferenceData::load_dir(dir, self.name_policy())
                .with_context(|| format!("Failed to load reference data from {}", dir.display())),
            None if self.strict_catalog => ReferenceData::from_json_strs(
                crate::data::BUNDLED_SPECIES,
                crate::data::BUNDLED_METHODS,
                crate::data::BUNDLED_AREAS,
                crate::data::BUNDLED_CO2,
                NamePolicy::Reject,
            )
            .context("Bundled reference data failed strict validation"),
            None => ReferenceData::bundled().context("Failed to load bundled reference data"),
        }
    }
}
