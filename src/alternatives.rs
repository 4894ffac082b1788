//! Alternative Recommender
//!
//! Proposes up to three better options for a scored product, in this order:
//! 1. Same species caught wild, when the product is farmed (+15)
//! 2. Same species from more selective gear, when it was trawled (+20)
//! 3. The species' `goodAlternatives`, in listed order, by default score
//!
//! Hypothetical same-species scores are capped at the species' range max,
//! and every candidate must beat the current score by at least 15 points.
//! Candidates are never re-sorted by score.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::data::{ReferenceData, SpeciesRecord};
use crate::label::ProductionMethod;
use crate::metrics::is_damaging_trawl;
use crate::utils::{display_name, Locale};

pub const MAX_ALTERNATIVES: usize = 3;

/// Minimum score gain for a candidate to be suggested
pub const MIN_IMPROVEMENT: i32 = 15;

/// Assumed gain from buying the wild-caught version of a farmed product
pub const WILD_CAUGHT_BONUS: i32 = 15;

/// Assumed gain from buying a non-trawled version of a trawled product
pub const BETTER_GEAR_BONUS: i32 = 20;

pub type Alternatives = SmallVec<[AlternativeOption; MAX_ALTERNATIVES]>;

/// Why a candidate was suggested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlternativeReason {
    /// Same species, obtained with a better practice
    SameSpeciesBetterMethod,
    /// A different species that scores higher
    SameCategoryHigherScore,
}

/// One suggested substitute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeOption {
    pub species_id: String,
    pub display_name: String,
    pub score: i32,
    pub reason: AlternativeReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_method_suggestion: Option<ProductionMethod>,
}

fn wild_suffix(locale: Locale) -> &'static str {
    match locale {
        Locale::Es => "salvaje",
        Locale::En => "wild-caught",
    }
}

fn gear_suffix(locale: Locale) -> &'static str {
    match locale {
        Locale::Es => "arte más selectivo",
        Locale::En => "more selective gear",
    }
}

/// Build the ranked alternatives for a scored species
///
/// `fishing_method` is classified with exact key or gear code only, so
/// `"OTB"` counts as a bottom trawl but loose free text does not.
pub fn build_alternatives(
    data: &ReferenceData,
    species: &SpeciesRecord,
    current_score: i32,
    fishing_method: Option<&str>,
    production_method: Option<ProductionMethod>,
    locale: Locale,
) -> Alternatives {
    let mut alternatives = Alternatives::new();
    let name = display_name(species, locale);
    let max = species.score_range.max();

    let same_species = |bonus: i32, suffix: &str, alternatives: &mut Alternatives| {
        let candidate = (current_score + bonus).min(max);
        if candidate - current_score >= MIN_IMPROVEMENT {
            alternatives.push(AlternativeOption {
                species_id: species.id.clone(),
                display_name: format!("{} ({})", name, suffix),
                score: candidate,
                reason: AlternativeReason::SameSpeciesBetterMethod,
                production_method_suggestion: Some(ProductionMethod::Wild),
            });
        }
    };

    if production_method == Some(ProductionMethod::Farmed) {
        same_species(WILD_CAUGHT_BONUS, wild_suffix(locale), &mut alternatives);
    }

    if is_damaging_trawl(data.methods.resolve_key(fishing_method)) {
        same_species(BETTER_GEAR_BONUS, gear_suffix(locale), &mut alternatives);
    }

    for alt_id in &species.good_alternatives {
        if alternatives.len() == MAX_ALTERNATIVES {
            break;
        }
        let Some(alt) = data.species(alt_id) else {
            tracing::warn!(species = %species.id, alternative = %alt_id, "Alternative missing from catalog");
            continue;
        };
        if alt.default_score - current_score >= MIN_IMPROVEMENT {
            alternatives.push(AlternativeOption {
                species_id: alt.id.clone(),
                display_name: display_name(alt, locale),
                score: alt.default_score,
                reason: AlternativeReason::SameCategoryHigherScore,
                production_method_suggestion: None,
            });
        }
    }

    alternatives.truncate(MAX_ALTERNATIVES);
    alternatives
}
