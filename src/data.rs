//! Data Loading and Management
//!
//! Handles loading the species catalog, the method/area reference tables and
//! the CO₂ fallback figures. The reference datasets ship inside the binary
//! (`data/*.json`) and can be swapped for a directory of the same four files
//! at startup.
//!
//! Everything loaded here is immutable after construction: scoring calls only
//! ever borrow it, so one `ReferenceData` can serve parallel callers.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::co2::Co2Table;
use crate::metrics::{AreaTable, IucnStatus, MethodTable};
use crate::search_index::{NamePolicy, SpeciesIndex};

/// Bundled reference datasets
pub const BUNDLED_SPECIES: &str = include_str!("../data/species_db.json");
pub const BUNDLED_METHODS: &str = include_str!("../data/fishing_methods.json");
pub const BUNDLED_AREAS: &str = include_str!("../data/fao_areas.json");
pub const BUNDLED_CO2: &str = include_str!("../data/co2_fallback.json");

pub const SPECIES_FILE: &str = "species_db.json";
pub const METHODS_FILE: &str = "fishing_methods.json";
pub const AREAS_FILE: &str = "fao_areas.json";
pub const CO2_FILE: &str = "co2_fallback.json";

/// Errors raised while loading or validating reference data
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {dataset}: {source}")]
    Parse {
        dataset: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("species at position {0} has an empty id")]
    EmptyId(usize),

    #[error("duplicate species id '{0}'")]
    DuplicateId(String),

    #[error("species '{id}' has invalid score range [{min}, {max}]")]
    InvalidRange { id: String, min: i32, max: i32 },

    #[error("species '{id}' default score {score} lies outside its range [{min}, {max}]")]
    DefaultOutOfRange {
        id: String,
        score: i32,
        min: i32,
        max: i32,
    },

    #[error("species '{id}' lists unknown alternative '{alternative}'")]
    UnknownAlternative { id: String, alternative: String },

    #[error("name '{name}' is shared by species '{first}' and '{second}'")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },
}

/// Commercial grouping of a species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeciesCategory {
    WhiteFish,
    FattyFish,
    SmallPelagic,
    LargePelagic,
    Shellfish,
    Bivalve,
    Cephalopod,
}

/// Every name a species is known by
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesNames {
    #[serde(default)]
    pub es: Vec<String>,
    #[serde(default)]
    pub en: Vec<String>,
    #[serde(default)]
    pub fr: Vec<String>,
    /// Latin binomial
    pub scientific: String,
    /// Regulatory commercial designation
    pub eu_commercial: String,
}

impl SpeciesNames {
    /// All locale names followed by the scientific and commercial names
    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.es
            .iter()
            .chain(&self.en)
            .chain(&self.fr)
            .map(String::as_str)
            .chain([self.scientific.as_str(), self.eu_commercial.as_str()])
    }

    /// Names offered in pickers: the display locales (es, en), then the
    /// scientific and commercial names. French names resolve but are not
    /// searched.
    pub fn search_variants(&self) -> impl Iterator<Item = &str> {
        self.es
            .iter()
            .chain(&self.en)
            .map(String::as_str)
            .chain([self.scientific.as_str(), self.eu_commercial.as_str()])
    }
}

/// Inclusive `[min, max]` score interval, serialized as a two-element array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRange(pub i32, pub i32);

impl ScoreRange {
    /// Global bounds used when a species is unknown
    pub const GLOBAL: ScoreRange = ScoreRange(0, 100);

    pub fn min(&self) -> i32 {
        self.0
    }

    pub fn max(&self) -> i32 {
        self.1
    }

    pub fn clamp(&self, score: i32) -> i32 {
        score.max(self.0).min(self.1)
    }

    pub fn contains(&self, score: i32) -> bool {
        self.0 <= score && score <= self.1
    }

    /// `min <= max` and both inside the global bounds
    pub fn is_valid(&self) -> bool {
        self.0 <= self.1 && Self::GLOBAL.contains(self.0) && Self::GLOBAL.contains(self.1)
    }
}

/// One species of the reference catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesRecord {
    pub id: String,
    pub names: SpeciesNames,
    #[serde(rename = "iucnStatus", alias = "defaultIucnStatus")]
    pub default_iucn_status: IucnStatus,
    pub default_score: i32,
    pub score_range: ScoreRange,
    #[serde(default)]
    pub good_alternatives: Vec<String>,
    pub category: SpeciesCategory,
    #[serde(rename = "notes_es", default)]
    pub notes_es: String,
    #[serde(rename = "notes_en", default, skip_serializing_if = "Option::is_none")]
    pub notes_en: Option<String>,
}

impl SpeciesRecord {
    /// "Reduce consumption" note in the requested locale
    pub fn notes(&self, locale: crate::utils::Locale) -> &str {
        match (locale, self.notes_en.as_deref()) {
            (crate::utils::Locale::En, Some(en)) if !en.trim().is_empty() => en,
            _ => &self.notes_es,
        }
    }
}

/// Immutable species catalog in load order
#[derive(Debug, Clone)]
pub struct SpeciesCatalog {
    species: Vec<SpeciesRecord>,
    by_id: FxHashMap<String, usize>,
}

impl SpeciesCatalog {
    /// Validate records and build the id lookup
    pub fn from_records(species: Vec<SpeciesRecord>) -> Result<Self, CatalogError> {
        let mut by_id = FxHashMap::default();

        for (idx, record) in species.iter().enumerate() {
            if record.id.trim().is_empty() {
                return Err(CatalogError::EmptyId(idx));
            }
            if by_id.insert(record.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateId(record.id.clone()));
            }

            let range = record.score_range;
            if !range.is_valid() {
                return Err(CatalogError::InvalidRange {
                    id: record.id.clone(),
                    min: range.min(),
                    max: range.max(),
                });
            }
            if !range.contains(record.default_score) {
                return Err(CatalogError::DefaultOutOfRange {
                    id: record.id.clone(),
                    score: record.default_score,
                    min: range.min(),
                    max: range.max(),
                });
            }
        }

        // Alternatives can point forward, so check once all ids are known
        for record in &species {
            if let Some(missing) = record
                .good_alternatives
                .iter()
                .find(|alt| !by_id.contains_key(alt.as_str()))
            {
                return Err(CatalogError::UnknownAlternative {
                    id: record.id.clone(),
                    alternative: missing.clone(),
                });
            }
        }

        Ok(Self { species, by_id })
    }

    /// Parse and validate the catalog from its JSON array form
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let species: Vec<SpeciesRecord> =
            serde_json::from_str(json).map_err(|source| CatalogError::Parse {
                dataset: SPECIES_FILE.to_string(),
                source,
            })?;
        Self::from_records(species)
    }

    pub fn get(&self, id: &str) -> Option<&SpeciesRecord> {
        self.by_id.get(id).map(|&idx| &self.species[idx])
    }

    /// Record at a catalog position
    pub fn at(&self, position: usize) -> Option<&SpeciesRecord> {
        self.species.get(position)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpeciesRecord> {
        self.species.iter()
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}

/// Main data holder for seafood scoring
///
/// Contains the catalog, the name index built from it, the signal tables and
/// the CO₂ fallback figures.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub catalog: SpeciesCatalog,
    pub index: SpeciesIndex,
    pub methods: MethodTable,
    pub areas: AreaTable,
    pub co2: Co2Table,
}

impl ReferenceData {
    /// Load the datasets compiled into the crate
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json_strs(
            BUNDLED_SPECIES,
            BUNDLED_METHODS,
            BUNDLED_AREAS,
            BUNDLED_CO2,
            NamePolicy::LastWins,
        )
    }

    /// Load `species_db.json`, `fishing_methods.json`, `fao_areas.json` and
    /// `co2_fallback.json` from a directory
    pub fn load_dir(dir: &Path, policy: NamePolicy) -> Result<Self, CatalogError> {
        tracing::info!("Loading reference data from {}", dir.display());

        let species = read_dataset(&dir.join(SPECIES_FILE))?;
        let methods = read_dataset(&dir.join(METHODS_FILE))?;
        let areas = read_dataset(&dir.join(AREAS_FILE))?;
        let co2 = read_dataset(&dir.join(CO2_FILE))?;

        Self::from_json_strs(&species, &methods, &areas, &co2, policy)
    }

    /// Parse all four datasets from JSON text
    pub fn from_json_strs(
        species: &str,
        methods: &str,
        areas: &str,
        co2: &str,
        policy: NamePolicy,
    ) -> Result<Self, CatalogError> {
        let catalog = SpeciesCatalog::from_json_str(species)?;
        let methods = MethodTable::from_json_str(methods).map_err(|source| CatalogError::Parse {
            dataset: METHODS_FILE.to_string(),
            source,
        })?;
        let areas = AreaTable::from_json_str(areas).map_err(|source| CatalogError::Parse {
            dataset: AREAS_FILE.to_string(),
            source,
        })?;
        let co2 = Co2Table::from_json_str(co2).map_err(|source| CatalogError::Parse {
            dataset: CO2_FILE.to_string(),
            source,
        })?;

        Self::from_parts(catalog, methods, areas, co2, policy)
    }

    /// Assemble from already-parsed parts, building the name index
    pub fn from_parts(
        catalog: SpeciesCatalog,
        methods: MethodTable,
        areas: AreaTable,
        co2: Co2Table,
        policy: NamePolicy,
    ) -> Result<Self, CatalogError> {
        let index = SpeciesIndex::build(&catalog, policy)?;

        tracing::info!(
            species = catalog.len(),
            names = index.name_count(),
            methods = methods.len(),
            areas = areas.len(),
            co2_figures = co2.len(),
            "Reference data loaded"
        );

        Ok(Self {
            catalog,
            index,
            methods,
            areas,
            co2,
        })
    }

    pub fn species(&self, id: &str) -> Option<&SpeciesRecord> {
        self.catalog.get(id)
    }

    /// Resolve free text to a catalog species id
    pub fn resolve_species_id(&self, input: &str) -> Option<&str> {
        self.index
            .resolve(input)
            .and_then(|pos| self.catalog.at(pos))
            .map(|record| record.id.as_str())
    }

    /// Ranked species for an interactive picker (at most 8)
    pub fn search_species(&self, query: &str) -> Vec<&SpeciesRecord> {
        self.index
            .search(query)
            .into_iter()
            .filter_map(|pos| self.catalog.at(pos))
            .collect()
    }
}

fn read_dataset(path: &Path) -> Result<String, CatalogError> {
    fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}


#[cfg(test)]
mod tests {
    use super::test_fixtures::*;
    use super::*;

    #[test]
    fn test_score_range() {
        let range = ScoreRange(20, 75);
        assert_eq!(range.clamp(15), 20);
        assert_eq!(range.clamp(70), 70);
        assert_eq!(range.clamp(90), 75);
        assert!(range.is_valid());
        assert!(!ScoreRange(50, 40).is_valid());
        assert!(!ScoreRange(-1, 40).is_valid());
        assert!(!ScoreRange(0, 101).is_valid());
    }

    #[test]
    fn test_catalog_lookup_preserves_order() {
        let catalog = SpeciesCatalog::from_records(scoring_species()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get("atun_rojo").unwrap().default_score, 15);
        assert_eq!(catalog.position("abadejo"), Some(2));
        assert!(catalog.get("bacalao").is_none());
        let ids: Vec<&str> = catalog.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["merluza", "atun_rojo", "abadejo"]);
    }

    #[test]
    fn test_rejects_duplicate_id() {
        let records = vec![species("merluza", &["Merluza"], &[]), species("merluza", &["Pescadilla"], &[])];
        let err = SpeciesCatalog::from_records(records).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == "merluza"));
    }

    #[test]
    fn test_rejects_empty_id() {
        let err = SpeciesCatalog::from_records(vec![species(" ", &["Nada"], &[])]).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyId(0)));
    }

    #[test]
    fn test_rejects_invalid_range() {
        let mut record = species("merluza", &["Merluza"], &[]);
        record.score_range = ScoreRange(80, 20);
        let err = SpeciesCatalog::from_records(vec![record]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRange { min: 80, max: 20, .. }));

        let mut record = species("merluza", &["Merluza"], &[]);
        record.score_range = ScoreRange(0, 120);
        assert!(SpeciesCatalog::from_records(vec![record]).is_err());
    }

    #[test]
    fn test_rejects_default_score_outside_range() {
        let mut record = species("merluza", &["Merluza"], &[]);
        record.score_range = ScoreRange(60, 90);
        let err = SpeciesCatalog::from_records(vec![record]).unwrap_err();
        assert!(matches!(err, CatalogError::DefaultOutOfRange { score: 50, .. }));
    }

    #[test]
    fn test_rejects_unknown_alternative() {
        let mut record = species("merluza", &["Merluza"], &[]);
        record.good_alternatives = vec!["kraken".to_string()];
        let err = SpeciesCatalog::from_records(vec![record]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "species 'merluza' lists unknown alternative 'kraken'"
        );
    }

    #[test]
    fn test_parses_catalog_json() {
        let json = r#"[{
            "id": "merluza",
            "names": { "es": ["Merluza"], "en": ["Hake"], "fr": ["Merlu"],
                       "scientific": "Merluccius merluccius", "eu_commercial": "Merluza" },
            "iucnStatus": "LC",
            "defaultScore": 55,
            "scoreRange": [20, 75],
            "goodAlternatives": [],
            "category": "white_fish",
            "notes_es": "Nota"
        }]"#;
        let catalog = SpeciesCatalog::from_json_str(json).unwrap();
        let hake = catalog.get("merluza").unwrap();
        assert_eq!(hake.default_iucn_status, IucnStatus::Lc);
        assert_eq!(hake.score_range, ScoreRange(20, 75));
        assert_eq!(hake.category, SpeciesCategory::WhiteFish);
        assert_eq!(hake.names.variants().count(), 5);
        assert_eq!(hake.names.search_variants().count(), 4);
        assert_eq!(hake.notes(crate::utils::Locale::En), "Nota");
    }

    #[test]
    fn test_malformed_json_reports_dataset() {
        let err = SpeciesCatalog::from_json_str("[{]").unwrap_err();
        assert!(err.to_string().starts_with("failed to parse species_db.json"));
    }

    #[test]
    fn test_bundled_data_loads() {
        let data = ReferenceData::bundled().expect("bundled data is valid");
        assert!(data.catalog.len() >= 30);
        assert!(data.methods.get("pole_and_line").is_some());
        assert!(data.areas.lookup("27.8").is_some());
        assert!(data.index.collisions().is_empty());
        assert_eq!(data.co2.fallback("sardina", "bottom_trawl"), 0.9);
        assert_eq!(data.co2.fallback("merluza", "unknown"), data.co2.global_average());
    }

    #[test]
    fn test_malformed_co2_reports_dataset() {
        let err = ReferenceData::from_json_strs(
            BUNDLED_SPECIES,
            BUNDLED_METHODS,
            BUNDLED_AREAS,
            "{}",
            NamePolicy::LastWins,
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("failed to parse co2_fallback.json"));
    }

    #[test]
    fn test_load_dir_missing_files() {
        let err = ReferenceData::load_dir(Path::new("/nonexistent/seafood"), NamePolicy::LastWins)
            .unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
