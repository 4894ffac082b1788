//! Seafood Scorer - Main coordinator for scoring seafood products
//!
//! Combines the four signal scorers into a bounded score, band and
//! confidence, and drives the full assessment of a parsed label
//! (species resolution → score → alternatives → CO₂ estimate → explanation).
//! Includes both single and parallel (Rayon) batch assessment.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::alternatives::{build_alternatives, Alternatives};
use crate::co2::Co2Estimate;
use crate::data::{CatalogError, ReferenceData, ScoreRange, SpeciesRecord};
use crate::explanation::explain;
use crate::label::{ParsedLabel, ProductionMethod};
use crate::metrics::{iucn_base, origin_modifier, IucnInput, IucnStatus};
use crate::utils::{display_name, is_supplied, Locale};

/// Coarse score classification for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Avoid,
    Think,
    Good,
    Best,
}

impl Band {
    /// avoid `[0,25]`, think `[26,50]`, good `[51,75]`, best `[76,100]`
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 76 => Band::Best,
            s if s >= 51 => Band::Good,
            s if s >= 26 => Band::Think,
            _ => Band::Avoid,
        }
    }
}

/// How many of status, method and area were known
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn from_known_signals(known: usize) -> Self {
        match known {
            0 => Confidence::Low,
            1 | 2 => Confidence::Medium,
            _ => Confidence::High,
        }
    }
}

/// Signals for one scoring call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringInput {
    pub species_id: String,
    /// `None` and unrecognized codes score like DD/NE
    #[serde(default)]
    pub iucn_status: Option<IucnInput>,
    #[serde(default)]
    pub fishing_method: Option<String>,
    #[serde(default)]
    pub fao_area: Option<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub production_method: Option<ProductionMethod>,
}

/// Score result with per-signal contributions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub iucn_base: i32,
    pub method_modifier: i32,
    pub area_modifier: i32,
    pub origin_modifier: i32,
    /// Sum of the four contributions
    pub raw_score: i32,
    /// `raw_score` clamped to the species range
    pub final_score: i32,
    pub band: Band,
    pub confidence: Confidence,
}

/// Compute the score breakdown for one set of signals
///
/// Total: unknown species clamp to `[0, 100]`, unknown signals contribute 0.
pub fn compute_score(data: &ReferenceData, input: &ScoringInput) -> ScoreBreakdown {
    let iucn_base = iucn_base(input.iucn_status.as_ref().and_then(IucnInput::status));
    let method_modifier = data.methods.modifier(input.fishing_method.as_deref());
    let area_modifier = data.areas.modifier(input.fao_area.as_deref());
    let origin_modifier = origin_modifier(&input.certifications, input.production_method);

    let raw_score = iucn_base + method_modifier + area_modifier + origin_modifier;

    let range = match data.species(&input.species_id) {
        Some(species) => species.score_range,
        None => {
            tracing::debug!(species = %input.species_id, "Unknown species, using global range");
            ScoreRange::GLOBAL
        }
    };
    let final_score = range.clamp(raw_score);

    // Supplied counts even when the value did not change the score
    let known = [
        input.iucn_status.as_ref().map_or(false, IucnInput::is_supplied),
        is_supplied(input.fishing_method.as_deref()),
        is_supplied(input.fao_area.as_deref()),
    ]
    .into_iter()
    .filter(|&known| known)
    .count();

    ScoreBreakdown {
        iucn_base,
        method_modifier,
        area_modifier,
        origin_modifier,
        raw_score,
        final_score,
        band: Band::from_score(final_score),
        confidence: Confidence::from_known_signals(known),
    }
}

/// Figures from live sources that replace catalog defaults
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LiveSignals {
    /// e.g. a Red List lookup; replaces the catalog status
    pub iucn_status: Option<IucnStatus>,
    /// kg CO₂e per kg; replaces the fallback table
    pub co2_kg_per_kg: Option<f64>,
}

/// Full assessment of one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SustainabilityResult {
    pub species_id: String,
    pub scientific_name: String,
    pub display_name: String,
    pub score: ScoreBreakdown,
    pub co2: Co2Estimate,
    pub band_label: String,
    pub band_color: String,
    pub production_method: ProductionMethod,
    pub fao_area: Option<String>,
    pub area_name: Option<String>,
    pub fishing_method: Option<String>,
    pub certifications: Vec<String>,
    /// Status actually used (override or catalog default)
    pub iucn_status: IucnStatus,
    pub alternatives: Alternatives,
    pub has_alternative: bool,
    /// "Reduce consumption" note, only when no alternative qualifies
    pub reduce_note: Option<String>,
    pub explanation: Vec<String>,
}

/// Main seafood scorer
///
/// Owns the immutable reference data; every method takes `&self`, so one
/// scorer can be shared across threads.
#[derive(Debug, Clone)]
pub struct SeafoodScorer {
    data: ReferenceData,
}

impl SeafoodScorer {
    pub fn new(data: ReferenceData) -> Self {
        Self { data }
    }

    /// Scorer over the bundled reference datasets
    pub fn bundled() -> Result<Self, CatalogError> {
        Ok(Self::new(ReferenceData::bundled()?))
    }

    pub fn data(&self) -> &ReferenceData {
        &self.data
    }

    pub fn species(&self, id: &str) -> Option<&SpeciesRecord> {
        self.data.species(id)
    }

    pub fn resolve_species_id(&self, input: &str) -> Option<&str> {
        self.data.resolve_species_id(input)
    }

    pub fn search_species(&self, query: &str) -> Vec<&SpeciesRecord> {
        self.data.search_species(query)
    }

    /// Canonical method key (exact key or EU gear code), else `"unknown"`
    pub fn resolve_method_key(&self, method: Option<&str>) -> &str {
        self.data.methods.resolve_key(method)
    }

    pub fn area_name(&self, code: Option<&str>, locale: Locale) -> String {
        self.data.areas.area_name(code, locale)
    }

    pub fn compute_score(&self, input: &ScoringInput) -> ScoreBreakdown {
        compute_score(&self.data, input)
    }

    /// Alternatives for a scored species (empty when the id is unknown)
    pub fn alternatives(
        &self,
        species_id: &str,
        final_score: i32,
        fishing_method: Option<&str>,
        production_method: Option<ProductionMethod>,
        locale: Locale,
    ) -> Alternatives {
        match self.data.species(species_id) {
            Some(species) => build_alternatives(
                &self.data,
                species,
                final_score,
                fishing_method,
                production_method,
                locale,
            ),
            None => Alternatives::new(),
        }
    }

    /// Assess a parsed label
    ///
    /// Returns `None` when the species text is missing or does not resolve.
    /// `iucn_override` (e.g. a live Red List lookup) replaces the catalog
    /// default status.
    pub fn assess(
        &self,
        label: &ParsedLabel,
        iucn_override: Option<IucnStatus>,
        locale: Locale,
    ) -> Option<SustainabilityResult> {
        let live = LiveSignals {
            iucn_status: iucn_override,
            ..Default::default()
        };
        self.assess_with(label, live, locale)
    }

    /// Assess a parsed label with every live figure the caller has
    pub fn assess_with(
        &self,
        label: &ParsedLabel,
        live: LiveSignals,
        locale: Locale,
    ) -> Option<SustainabilityResult> {
        let raw = label.species_raw.as_deref()?;
        let Some(species_id) = self.resolve_species_id(raw) else {
            tracing::debug!(input = %raw, "Species not found");
            return None;
        };
        let species = self.data.species(species_id)?;
        let iucn_status = live.iucn_status.unwrap_or(species.default_iucn_status);

        let input = ScoringInput {
            species_id: species.id.clone(),
            iucn_status: Some(iucn_status.into()),
            fishing_method: label.fishing_method.clone(),
            fao_area: label.fao_area.clone(),
            certifications: label.certifications.clone(),
            production_method: label.production_method,
        };
        let score = self.compute_score(&input);

        let alternatives = build_alternatives(
            &self.data,
            species,
            score.final_score,
            label.fishing_method.as_deref(),
            label.production_method,
            locale,
        );
        let co2 = self.data.co2.estimate(
            &species.id,
            self.resolve_method_key(label.fishing_method.as_deref()),
            live.co2_kg_per_kg,
            locale,
        );

        let has_alternative = !alternatives.is_empty();
        let reduce_note = (!has_alternative)
            .then(|| species.notes(locale).trim())
            .filter(|note| !note.is_empty())
            .map(str::to_string);

        Some(SustainabilityResult {
            species_id: species.id.clone(),
            scientific_name: species.names.scientific.clone(),
            display_name: display_name(species, locale),
            band_label: score.band.label(locale).to_string(),
            band_color: score.band.color().to_string(),
            production_method: label.production_method.unwrap_or_default(),
            area_name: label
                .fao_area
                .as_deref()
                .map(|code| self.area_name(Some(code), locale)),
            fao_area: input.fao_area,
            fishing_method: input.fishing_method,
            certifications: input.certifications,
            iucn_status,
            alternatives,
            has_alternative,
            reduce_note,
            explanation: explain(&score, locale),
            score,
            co2,
        })
    }

    /// Assess many labels in parallel, preserving input order
    pub fn assess_batch(
        &self,
        labels: &[ParsedLabel],
        locale: Locale,
    ) -> Vec<Option<SustainabilityResult>> {
        labels
            .par_iter()
            .map(|label| self.assess(label, None, locale))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alternatives::AlternativeReason;
    use crate::co2::Co2Source;
    use crate::data::test_fixtures::{reference_data, scoring_species};
    use proptest::prelude::*;

    fn scorer() -> SeafoodScorer {
        SeafoodScorer::new(reference_data(scoring_species()))
    }

    fn input(
        species_id: &str,
        iucn: Option<IucnStatus>,
        method: Option<&str>,
        area: Option<&str>,
    ) -> ScoringInput {
        ScoringInput {
            species_id: species_id.to_string(),
            iucn_status: iucn.map(IucnInput::from),
            fishing_method: method.map(str::to_string),
            fao_area: area.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_scenario_selective_gear_good_area() {
        let s = scorer();
        let b = s.compute_score(&input(
            "merluza",
            Some(IucnStatus::Lc),
            Some("pole_and_line"),
            Some("27.8"),
        ));
        assert_eq!(b.iucn_base, 50);
        assert_eq!(b.method_modifier, 15);
        assert_eq!(b.area_modifier, 5);
        assert_eq!(b.origin_modifier, 0);
        assert_eq!(b.raw_score, 70);
        assert_eq!(b.final_score, 70);
        assert_eq!(b.band, Band::Good);
        assert_eq!(b.confidence, Confidence::High);
    }

    #[test]
    fn test_scenario_clamped_to_range_min() {
        let s = scorer();
        let b = s.compute_score(&input(
            "merluza",
            Some(IucnStatus::Lc),
            Some("bottom_trawl"),
            Some("37.1"),
        ));
        assert_eq!(b.raw_score, 15);
        assert_eq!(b.final_score, 20);
        assert_eq!(b.band, Band::Avoid);
    }

    #[test]
    fn test_scenario_exactly_at_range_max() {
        let s = scorer();
        let b = s.compute_score(&input(
            "atun_rojo",
            Some(IucnStatus::En),
            Some("pole_and_line"),
            Some("27.8"),
        ));
        assert_eq!(b.raw_score, 30);
        assert_eq!(b.final_score, 30);
    }

    #[test]
    fn test_scenario_no_signals() {
        let s = scorer();
        let b = s.compute_score(&input("merluza", None, None, None));
        assert_eq!(b.iucn_base, 30);
        assert_eq!(b.raw_score, 30);
        assert_eq!(b.final_score, 30);
        assert_eq!(b.confidence, Confidence::Low);
    }

    #[test]
    fn test_scenario_msc_certification() {
        let s = scorer();
        let mut i = input("merluza", Some(IucnStatus::Lc), None, None);
        i.certifications = vec!["MSC".to_string()];
        let b = s.compute_score(&i);
        assert_eq!(b.origin_modifier, 10);
        assert_eq!(b.final_score, 60);
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(Band::from_score(0), Band::Avoid);
        assert_eq!(Band::from_score(25), Band::Avoid);
        assert_eq!(Band::from_score(26), Band::Think);
        assert_eq!(Band::from_score(50), Band::Think);
        assert_eq!(Band::from_score(51), Band::Good);
        assert_eq!(Band::from_score(75), Band::Good);
        assert_eq!(Band::from_score(76), Band::Best);
        assert_eq!(Band::from_score(100), Band::Best);
    }

    #[test]
    fn test_confidence_counts_supplied_not_recognized() {
        let s = scorer();
        let b = s.compute_score(&input(
            "merluza",
            Some(IucnStatus::Lc),
            Some("harpoon from a kayak"),
            Some("99.9"),
        ));
        assert_eq!(b.method_modifier, 0);
        assert_eq!(b.area_modifier, 0);
        assert_eq!(b.confidence, Confidence::High);

        let b = s.compute_score(&input("merluza", None, Some("pole_and_line"), Some("  ")));
        assert_eq!(b.confidence, Confidence::Medium);
    }

    #[test]
    fn test_unknown_species_uses_global_range() {
        let s = scorer();
        let mut i = input("kraken", Some(IucnStatus::Cr), Some("bottom_trawl"), Some("37.1"));
        i.certifications = vec!["IUU".to_string()];
        let b = s.compute_score(&i);
        assert_eq!(b.raw_score, -45);
        assert_eq!(b.final_score, 0);
        assert_eq!(b.band, Band::Avoid);
    }

    #[test]
    fn test_scoring_input_from_json() {
        let i: ScoringInput = serde_json::from_str(
            r#"{ "species_id": "merluza", "iucn_status": "lc", "production_method": "Farmed" }"#,
        )
        .unwrap();
        assert_eq!(i.iucn_status, Some(IucnInput::Known(IucnStatus::Lc)));
        assert_eq!(i.production_method, Some(ProductionMethod::Farmed));
        assert!(i.certifications.is_empty());

        let i: ScoringInput =
            serde_json::from_str(r#"{ "species_id": "merluza", "iucn_status": "??" }"#).unwrap();
        assert_eq!(i.iucn_status, Some(IucnInput::Unrecognized("??".to_string())));
    }

    #[test]
    fn test_unrecognized_status_counts_toward_confidence() {
        let s = scorer();
        let i: ScoringInput = serde_json::from_str(
            r#"{
                "species_id": "merluza",
                "iucn_status": "Vulnerable",
                "fishing_method": "pole_and_line",
                "fao_area": "27.8"
            }"#,
        )
        .unwrap();
        let b = s.compute_score(&i);
        assert_eq!(b.iucn_base, 30);
        assert_eq!(b.final_score, 50);
        assert_eq!(b.confidence, Confidence::High);

        let mut i = input("merluza", None, Some("pole_and_line"), Some("27.8"));
        i.iucn_status = Some(IucnInput::Unrecognized(" ".to_string()));
        assert_eq!(s.compute_score(&i).confidence, Confidence::Medium);
    }

    #[test]
    fn test_breakdown_serializes_lowercase_enums() {
        let s = scorer();
        let b = s.compute_score(&input("merluza", None, None, None));
        let json = serde_json::to_value(b).unwrap();
        assert_eq!(json["band"], "think");
        assert_eq!(json["confidence"], "low");
    }

    #[test]
    fn test_assess_label() {
        let s = scorer();
        let label = ParsedLabel {
            species_raw: Some("Merluza europea del Cantábrico".to_string()),
            fao_area: Some("27.8.c".to_string()),
            fishing_method: Some("OTB".to_string()),
            production_method: Some(ProductionMethod::Wild),
            certifications: vec![],
        };

        let result = s.assess(&label, None, Locale::Es).unwrap();
        assert_eq!(result.species_id, "merluza");
        assert_eq!(result.scientific_name, "Merluccius merluccius");
        assert_eq!(result.display_name, "Merluza");
        assert_eq!(result.iucn_status, IucnStatus::Lc);
        // 50 - 20 + 5
        assert_eq!(result.score.final_score, 35);
        assert_eq!(result.band_label, "Piénsatelo");
        assert_eq!(result.area_name.as_deref(), Some("Golfo de Vizcaya"));
        assert_eq!(result.production_method, ProductionMethod::Wild);

        // better gear (55), then abadejo (70)
        assert_eq!(result.alternatives.len(), 2);
        assert_eq!(result.alternatives[0].reason, AlternativeReason::SameSpeciesBetterMethod);
        assert_eq!(result.alternatives[1].species_id, "abadejo");
        assert!(result.has_alternative);
        assert_eq!(result.reduce_note, None);
        assert_eq!(result.explanation.len(), 4);
    }

    #[test]
    fn test_assess_with_override_and_reduce_note() {
        let s = scorer();
        let label = ParsedLabel::for_species("Atún rojo");

        let result = s.assess(&label, Some(IucnStatus::Cr), Locale::En).unwrap();
        assert_eq!(result.iucn_status, IucnStatus::Cr);
        assert_eq!(result.score.final_score, 0);
        assert_eq!(result.production_method, ProductionMethod::Unknown);
        // abadejo 70 is still an alternative
        assert!(result.has_alternative);

        let result = s.assess(&ParsedLabel::for_species("Abadejo"), None, Locale::Es).unwrap();
        assert!(result.alternatives.is_empty());
        assert_eq!(
            result.reduce_note.as_deref(),
            Some("Consume abadejo con moderación.")
        );
    }

    #[test]
    fn test_assess_co2_fallback_chain() {
        let s = scorer();

        // species figure
        let result = s.assess(&ParsedLabel::for_species("Abadejo"), None, Locale::Es).unwrap();
        assert_eq!(result.co2.value, 2.5);
        assert_eq!(result.co2.source, Co2Source::Fallback);

        // method figure, gear codes resolve to their method key
        let label = ParsedLabel {
            species_raw: Some("Merluza".to_string()),
            fishing_method: Some("OTB".to_string()),
            ..Default::default()
        };
        let result = s.assess(&label, None, Locale::Es).unwrap();
        assert_eq!(result.co2.value, 6.0);

        // global average
        let result = s.assess(&ParsedLabel::for_species("Merluza"), None, Locale::En).unwrap();
        assert_eq!(result.co2.value, 3.5);
        assert_eq!(result.co2.comparison.as_deref(), Some("8× less CO₂ than beef"));
    }

    #[test]
    fn test_assess_with_live_signals() {
        let s = scorer();
        let live = LiveSignals {
            iucn_status: Some(IucnStatus::Nt),
            co2_kg_per_kg: Some(1.5),
        };
        let result = s
            .assess_with(&ParsedLabel::for_species("Abadejo"), live, Locale::En)
            .unwrap();
        assert_eq!(result.iucn_status, IucnStatus::Nt);
        assert_eq!(result.score.iucn_base, 40);
        assert_eq!(result.co2.value, 1.5);
        assert_eq!(result.co2.source, Co2Source::Live);
        assert_eq!(result.co2.comparison.as_deref(), Some("3.0× less CO₂ than chicken"));
    }

    #[test]
    fn test_assess_not_found() {
        let s = scorer();
        assert!(s.assess(&ParsedLabel::default(), None, Locale::Es).is_none());
        assert!(s.assess(&ParsedLabel::for_species("zzzzzzzz"), None, Locale::Es).is_none());
    }

    #[test]
    fn test_assess_batch_preserves_order() {
        let s = scorer();
        let labels = vec![
            ParsedLabel::for_species("abadejo"),
            ParsedLabel::for_species("nothing like a fish here"),
            ParsedLabel::for_species("merluza"),
        ];
        let results = s.assess_batch(&labels, Locale::Es);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().map(|r| r.species_id.as_str()), Some("abadejo"));
        assert!(results[1].is_none());
        assert_eq!(results[2].as_ref().map(|r| r.species_id.as_str()), Some("merluza"));
    }

    #[test]
    fn test_deterministic() {
        let s = scorer();
        let label = ParsedLabel {
            species_raw: Some("hake".to_string()),
            fishing_method: Some("Pole and line".to_string()),
            certifications: vec!["MSC".to_string()],
            ..Default::default()
        };
        let a = s.assess(&label, None, Locale::En);
        let b = s.assess(&label, None, Locale::En);
        assert_eq!(a, b);
    }

    fn any_status() -> impl Strategy<Value = Option<IucnStatus>> {
        prop::option::of(prop::sample::select(IucnStatus::ALL.to_vec()))
    }

    fn any_method() -> impl Strategy<Value = Option<String>> {
        prop::option::of(
            prop::sample::select(vec!["bottom_trawl", "midwater_trawl", "pole_and_line", "OTB", "nasa", ""])
                .prop_map(str::to_string),
        )
    }

    fn any_area() -> impl Strategy<Value = Option<String>> {
        prop::option::of(
            prop::sample::select(vec!["27.8", "27.8.a", "37.1", "37.1.2", "99", ""]).prop_map(str::to_string),
        )
    }

    fn any_certifications() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(
            prop::sample::select(vec!["MSC", "ASC", "GlobalGAP", "IUU", "EU origin", "BRC"])
                .prop_map(str::to_string),
            0..5,
        )
    }

    proptest! {
        #[test]
        fn final_score_within_species_range(
            species in prop::sample::select(vec!["merluza", "atun_rojo", "abadejo"]),
            iucn_status in any_status(),
            fishing_method in any_method(),
            fao_area in any_area(),
            certifications in any_certifications(),
            farmed in any::<bool>(),
        ) {
            let s = scorer();
            let i = ScoringInput {
                species_id: species.to_string(),
                iucn_status: iucn_status.map(IucnInput::from),
                fishing_method,
                fao_area,
                certifications,
                production_method: farmed.then_some(ProductionMethod::Farmed),
            };
            let b = s.compute_score(&i);
            let range = s.species(species).unwrap().score_range;
            prop_assert!(range.contains(b.final_score));
            prop_assert!(ScoreRange::GLOBAL.contains(b.final_score));
            prop_assert_eq!(b.band, Band::from_score(b.final_score));
        }

        #[test]
        fn certification_order_does_not_matter(
            certifications in any_certifications(),
            rotate in 0usize..5,
        ) {
            let s = scorer();
            let mut i = input("merluza", Some(IucnStatus::Nt), Some("pole_and_line"), None);
            i.certifications = certifications.clone();
            let forward = s.compute_score(&i);

            let mut shuffled = certifications;
            shuffled.reverse();
            if !shuffled.is_empty() {
                let k = rotate % shuffled.len();
                shuffled.rotate_left(k);
            }
            i.certifications = shuffled;
            prop_assert_eq!(forward, s.compute_score(&i));
        }
    }
}
