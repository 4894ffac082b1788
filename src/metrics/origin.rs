//! SIGNAL 4: CERTIFICATION & ORIGIN MODIFIER
//!
//! Sums a per-certification modifier over the labels printed on the product,
//! penalizes un-certified aquaculture, then clamps the total to [-10, +10].
//!
//! Label matching is a case-insensitive substring test, so "MSC certified"
//! and "Sello MSC" both count as MSC. Each label contributes at most once
//! (first matching certification in table order).

use crate::label::ProductionMethod;

/// Known certifications and their modifiers, in matching order
pub const CERTIFICATION_MODIFIERS: &[(&str, i32)] = &[
    ("MSC", 10),
    ("ASC", 8),
    ("GlobalGAP", 5),
    ("Friend of Sea", 4),
    ("EU origin", 2),
    ("IUU", -10),
];

/// Bounds of the summed origin modifier
pub const ORIGIN_MIN: i32 = -10;
pub const ORIGIN_MAX: i32 = 10;

/// Applied to farmed products carrying no certification at all
pub const UNCERTIFIED_FARMED_PENALTY: i32 = -5;

/// Modifier of a single certification label (0 when unrecognized)
pub fn certification_modifier(label: &str) -> i32 {
    let label = label.to_lowercase();
    CERTIFICATION_MODIFIERS
        .iter()
        .find(|(name, _)| label.contains(&name.to_lowercase()))
        .map_or(0, |(_, modifier)| *modifier)
}

/// Combined certification/production-method modifier
///
/// Blank labels are ignored. Order of `certifications` never matters.
pub fn origin_modifier(
    certifications: &[String],
    production_method: Option<ProductionMethod>,
) -> i32 {
    let labels: Vec<&str> = certifications
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();

    let mut modifier: i32 = labels.iter().map(|c| certification_modifier(c)).sum();

    if production_method == Some(ProductionMethod::Farmed) && labels.is_empty() {
        modifier += UNCERTIFIED_FARMED_PENALTY;
    }

    modifier.clamp(ORIGIN_MIN, ORIGIN_MAX)
}
