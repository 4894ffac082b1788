//! Seafood Sustainability Scorer
//!
//! Deterministic sustainability scoring (0-100) for seafood products from
//! partial evidence: species name, fishing method, FAO catch area,
//! certifications and production method.
//!
//! Module layout:
//! - `data`: species catalog and reference tables, JSON loading and validation
//! - `search_index`: synonym resolver and picker search over species names
//! - `metrics/`: the four signal scorers (IUCN, method, area, origin)
//! - `scorer`: score engine and the `SeafoodScorer` assessment facade
//! - `alternatives`: better-option suggestions
//! - `co2`: carbon footprint estimate with the bundled fallback figures
//! - `label`: EU label text and barcode product normalisation
//! - `explanation`: band labels and per-signal explanation lines
//! - `utils/`: normalization, display names
//! - `api_server` (feature `api`): Axum REST API
//!
//! The core holds no global state: reference data is loaded once into an
//! immutable `ReferenceData` and passed explicitly.

pub mod utils;
pub mod data;
pub mod metrics;
pub mod search_index;
pub mod label;
pub mod alternatives;
pub mod co2;
pub mod scorer;
pub mod explanation;
pub mod config;
pub mod api_server;

// Re-export commonly used types
pub use utils::{display_name, Locale};
pub use data::{CatalogError, ReferenceData, ScoreRange, SpeciesCatalog, SpeciesRecord};
pub use search_index::{NamePolicy, SpeciesIndex};
pub use label::{parse_barcode_product, parse_eu_label, ParsedLabel, ProductionMethod};
pub use alternatives::{AlternativeOption, AlternativeReason};
pub use co2::{Co2Estimate, Co2Source, Co2Table};
pub use scorer::{
    compute_score, Band, Confidence, LiveSignals, ScoreBreakdown, ScoringInput, SeafoodScorer,
    SustainabilityResult,
};
pub use explanation::explain;
pub use metrics::*;

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
