//! Text Normalization Utilities
//!
//! Canonical forms shared by the synonym resolver and the signal scorers:
//! - Names: trimmed and lowercased (all name matching is case-insensitive)
//! - Method keys: names plus spaces/hyphens folded to underscores
//! - Signal presence: a value only counts as supplied when it has content

/// Normalize a species name or query for matching
///
/// `" Merluza "`, `"MERLUZA"` and `"merluza"` all normalize to `"merluza"`.
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalize free text into a fishing-method key
///
/// Each space or hyphen becomes one underscore, so `"Pole and line"` and
/// `"pole-and-line"` both become `"pole_and_line"`.
pub fn normalize_method_key(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c.is_whitespace() { '_' } else { c })
        .collect()
}

/// True when an optional signal carries non-blank content
pub fn is_supplied(value: Option<&str>) -> bool {
    value.map_or(false, |v| !v.trim().is_empty())
}

/// Trimmed content of an optional signal, `None` when blank
pub fn supplied(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Split a name into lowercase words usable by the partial index
///
/// Only words of at least `min_len` characters are kept.
pub fn index_words(name: &str, min_len: usize) -> impl Iterator<Item = String> + '_ {
    name.split_whitespace()
        .map(str::to_lowercase)
        .filter(move |w| w.chars().count() >= min_len)
}
