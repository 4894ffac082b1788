//! Synonym Index for Species Lookup
//!
//! Maps free-text species names (any locale, scientific or commercial name,
//! or the catalog id itself) to a catalog species, and ranks species for
//! interactive pickers.
//!
//! Two indexes are built once at load time:
//! - Full-name index: every normalized name variant → species, kept in
//!   catalog insertion order
//! - Word index: every word of at least 4 characters in a searchable name
//!   → species (ranking only)
//!
//! Resolution is a linear scan for its substring and fuzzy steps, which is fine
//! for a catalog of a few hundred species. A trie or n-gram index would be
//! the upgrade if the catalog grows into the thousands.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::data::{CatalogError, SpeciesCatalog};
use crate::utils::normalization::index_words;
use crate::utils::normalize_name;

/// Maximum edit distance accepted by fuzzy matching
pub const MAX_EDIT_DISTANCE: usize = 3;

/// Names and words whose length differs from the input by more than this
/// are skipped by fuzzy matching
pub const MAX_LENGTH_DIFFERENCE: usize = 5;

/// Minimum word length for the word index
pub const MIN_WORD_LEN: usize = 4;

/// Maximum edit distance for a query against a single indexed word
pub const MAX_WORD_EDIT_DISTANCE: usize = 1;

/// Result cap for `search`
pub const SEARCH_LIMIT: usize = 8;

/// Match scores used by `search`
pub const EXACT_MATCH_SCORE: u32 = 100;
pub const PREFIX_MATCH_SCORE: u32 = 80;
pub const SUBSTRING_MATCH_SCORE: u32 = 60;
const FUZZY_BASE_SCORE: u32 = 40;
const FUZZY_STEP: u32 = 10;

/// What to do when two species share an exact name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamePolicy {
    /// Later species in catalog order take the name (logged as a warning)
    #[default]
    LastWins,
    /// Refuse to build the index
    Reject,
}

/// A name claimed by more than one species
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameCollision {
    pub name: String,
    /// Species that lost the name
    pub shadowed: String,
    /// Species the name now resolves to
    pub winner: String,
}

#[derive(Debug, Clone)]
struct NameEntry {
    name: String,
    char_len: usize,
    species: usize,
}

#[derive(Debug, Clone)]
struct WordEntry {
    word: String,
    char_len: usize,
    species: usize,
}

/// Name index over a species catalog
///
/// Stores catalog positions, so it must be queried alongside the catalog it
/// was built from (see `ReferenceData`).
#[derive(Debug, Clone)]
pub struct SpeciesIndex {
    /// Full-name entries in first-insertion order
    names: Vec<NameEntry>,
    /// Normalized name → position in `names`
    exact: FxHashMap<String, usize>,
    words: Vec<WordEntry>,
    /// Per species: normalized search variants (es, en, scientific, commercial)
    search_names: Vec<Vec<String>>,
    collisions: Vec<NameCollision>,
}

impl SpeciesIndex {
    /// Build both indexes from a catalog
    pub fn build(catalog: &SpeciesCatalog, policy: NamePolicy) -> Result<Self, CatalogError> {
        let mut index = SpeciesIndex {
            names: Vec::new(),
            exact: FxHashMap::default(),
            words: Vec::new(),
            search_names: Vec::with_capacity(catalog.len()),
            collisions: Vec::new(),
        };

        for (pos, record) in catalog.iter().enumerate() {
            let mut variants: Vec<String> = Vec::new();

            for raw in record.names.variants() {
                let name = normalize_name(raw);
                if name.is_empty() {
                    continue;
                }
                index.insert_name(&name, pos, catalog, policy)?;
            }

            for raw in record.names.search_variants() {
                let name = normalize_name(raw);
                if name.is_empty() || variants.contains(&name) {
                    continue;
                }
                for word in index_words(&name, MIN_WORD_LEN) {
                    let char_len = word.chars().count();
                    index.words.push(WordEntry { word, char_len, species: pos });
                }
                variants.push(name);
            }

            // The id resolves but is not a display name, so search skips it
            let id = normalize_name(&record.id);
            index.insert_name(&id, pos, catalog, policy)?;

            index.search_names.push(variants);
        }

        for collision in &index.collisions {
            tracing::warn!(
                name = %collision.name,
                shadowed = %collision.shadowed,
                winner = %collision.winner,
                "Species name collision: later catalog entry wins"
            );
        }

        Ok(index)
    }

    fn insert_name(
        &mut self,
        name: &str,
        species: usize,
        catalog: &SpeciesCatalog,
        policy: NamePolicy,
    ) -> Result<(), CatalogError> {
        match self.exact.get(name) {
            Some(&slot) => {
                let previous = self.names[slot].species;
                if previous != species {
                    let shadowed = species_id(catalog, previous);
                    let winner = species_id(catalog, species);
                    if policy == NamePolicy::Reject {
                        return Err(CatalogError::NameCollision {
                            name: name.to_string(),
                            first: shadowed,
                            second: winner,
                        });
                    }
                    self.collisions.push(NameCollision {
                        name: name.to_string(),
                        shadowed,
                        winner,
                    });
                    // Keeps its original iteration slot, like a re-set map key
                    self.names[slot].species = species;
                }
            }
            None => {
                self.exact.insert(name.to_string(), self.names.len());
                self.names.push(NameEntry {
                    name: name.to_string(),
                    char_len: name.chars().count(),
                    species,
                });
            }
        }
        Ok(())
    }

    /// Number of distinct full names indexed
    pub fn name_count(&self) -> usize {
        self.names.len()
    }

    /// Exact-name collisions found at build time
    pub fn collisions(&self) -> &[NameCollision] {
        &self.collisions
    }

    /// Resolve free text to a catalog position
    ///
    /// 1. Blank input → `None`
    /// 2. Exact (trimmed, case-insensitive) name
    /// 3. First indexed name, in insertion order, that contains the input or is
    ///    contained in it. Short ambiguous inputs take whichever species was
    ///    indexed first, not the most specific one.
    /// 4. Closest name by edit distance (≤ 3), among names whose length is
    ///    within 5 characters of the input; ties go to the earlier name
    pub fn resolve(&self, input: &str) -> Option<usize> {
        let query = normalize_name(input);
        if query.is_empty() {
            return None;
        }

        if let Some(&slot) = self.exact.get(&query) {
            return Some(self.names[slot].species);
        }

        if let Some(entry) = self
            .names
            .iter()
            .find(|e| e.name.contains(&query) || query.contains(&e.name))
        {
            return Some(entry.species);
        }

        let query_len = query.chars().count();
        let mut best: Option<(usize, usize)> = None; // (distance, species)
        for entry in &self.names {
            if entry.char_len.abs_diff(query_len) > MAX_LENGTH_DIFFERENCE {
                continue;
            }
            let distance = strsim::levenshtein(&query, &entry.name);
            if distance <= MAX_EDIT_DISTANCE && best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, entry.species));
            }
        }

        if best.is_none() {
            tracing::debug!(input = %query, "No species matched");
        }
        best.map(|(_, species)| species)
    }

    /// Rank species for a picker, best first, at most `SEARCH_LIMIT`
    ///
    /// Each species scores its best name variant: exact 100, prefix 80,
    /// substring 60, else `40 - 10 × distance` when the edit distance to the
    /// name is at most 3. A single indexed word within one edit of the query
    /// scores the same way. Ties keep catalog order.
    pub fn search(&self, query: &str) -> Vec<usize> {
        let query = normalize_name(query);
        if query.is_empty() {
            return Vec::new();
        }

        let mut best: Vec<u32> = self
            .search_names
            .iter()
            .map(|variants| {
                variants
                    .iter()
                    .map(|name| name_match_score(&query, name))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let query_len = query.chars().count();
        for entry in &self.words {
            if entry.char_len.abs_diff(query_len) > MAX_LENGTH_DIFFERENCE {
                continue;
            }
            let distance = strsim::levenshtein(&query, &entry.word);
            if distance > MAX_WORD_EDIT_DISTANCE {
                continue;
            }
            let score = fuzzy_score(distance);
            if score > best[entry.species] {
                best[entry.species] = score;
            }
        }

        let mut ranked: Vec<(usize, u32)> = best
            .into_iter()
            .enumerate()
            .filter(|&(_, score)| score > 0)
            .collect();

        // Stable: equal scores stay in catalog order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(SEARCH_LIMIT);
        ranked.into_iter().map(|(species, _)| species).collect()
    }
}

/// Score of one normalized name against a normalized query
fn name_match_score(query: &str, name: &str) -> u32 {
    if name == query {
        EXACT_MATCH_SCORE
    } else if name.starts_with(query) {
        PREFIX_MATCH_SCORE
    } else if name.contains(query) {
        SUBSTRING_MATCH_SCORE
    } else {
        fuzzy_score(strsim::levenshtein(query, name))
    }
}

fn fuzzy_score(distance: usize) -> u32 {
    if distance > MAX_EDIT_DISTANCE {
        return 0;
    }
    FUZZY_BASE_SCORE.saturating_sub(FUZZY_STEP * distance as u32)
}

fn species_id(catalog: &SpeciesCatalog, position: usize) -> String {
    catalog
        .at(position)
        .map(|record| record.id.clone())
        .unwrap_or_default()
}
