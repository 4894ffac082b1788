//! SIGNAL 2: FISHING METHOD MODIFIER
//!
//! Scores the gear or production method used to obtain the product.
//! Bottom-contact gear is penalized, selective gear is rewarded
//! (modifiers range from -20 to +15 in the bundled table).
//!
//! **Resolution order** for a free-text input:
//!   1. Exact normalized key (`"Pole and line"` → `pole_and_line`)
//!   2. EU gear code (`OTB` → `bottom_trawl`)
//!   3. Substring of either localized display name (`"nasa"` → `trap_pot`),
//!      or the input containing a method key
//!   4. Nothing matched → modifier 0 (unknown method)

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::utils::{normalize_method_key, supplied};

/// Key reported when a method cannot be resolved
pub const UNKNOWN_METHOD: &str = "unknown";

/// EU gear codes (Regulation (EU) 1379/2013 labelling) → method key
pub const EU_GEAR_CODES: &[(&str, &str)] = &[
    ("OTB", "bottom_trawl"),
    ("PTB", "bottom_trawl"),
    ("TBB", "beam_trawl"),
    ("DRB", "dredge"),
    ("DRH", "dredge"),
    ("OTM", "midwater_trawl"),
    ("PTM", "midwater_trawl"),
    ("PS", "purse_seine"),
    ("GN", "gillnet"),
    ("GNS", "gillnet"),
    ("GND", "gillnet"),
    ("LHP", "longline_pelagic"),
    ("LL", "longline_pelagic"),
    ("LLD", "longline_demersal"),
    ("LHM", "longline_demersal"),
    ("FPO", "trap_pot"),
    ("FYK", "trap_pot"),
    ("LTL", "pole_and_line"),
    ("LLS", "hook_and_line"),
    ("LHT", "hook_and_line"),
];

/// Trawl categories for which a better-gear alternative is suggested
pub const DAMAGING_TRAWLS: [&str; 2] = ["bottom_trawl", "midwater_trawl"];

/// One catalogued gear or production method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FishingMethod {
    pub key: String,
    /// Spanish display name
    pub name: String,
    pub name_en: String,
    pub modifier: i32,
}

/// Ordered method catalogue (order drives substring matching)
#[derive(Debug, Clone)]
pub struct MethodTable {
    methods: Vec<FishingMethod>,
    by_key: FxHashMap<String, usize>,
}

impl MethodTable {
    pub fn new(methods: Vec<FishingMethod>) -> Self {
        let by_key = methods
            .iter()
            .enumerate()
            .map(|(idx, m)| (m.key.clone(), idx))
            .collect();
        Self { methods, by_key }
    }

    /// Parse the method catalogue from its JSON array form
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        let methods: Vec<FishingMethod> = serde_json::from_str(json)?;
        Ok(Self::new(methods))
    }

    pub fn get(&self, key: &str) -> Option<&FishingMethod> {
        self.by_key.get(key).map(|&idx| &self.methods[idx])
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Modifier for a raw method signal (0 when absent or unrecognized)
    pub fn modifier(&self, method: Option<&str>) -> i32 {
        supplied(method)
            .and_then(|raw| self.match_method(raw))
            .map_or(0, |m| m.modifier)
    }

    /// Canonical key via exact key or gear code only, else `"unknown"`
    ///
    /// Deliberately skips the substring step: used where a confident
    /// classification matters (alternative suggestions, label echo).
    pub fn resolve_key<'a>(&'a self, method: Option<&str>) -> &'a str {
        let Some(raw) = supplied(method) else {
            return UNKNOWN_METHOD;
        };
        self.exact_or_gear_code(raw)
            .map_or(UNKNOWN_METHOD, |m| m.key.as_str())
    }

    /// Full resolution chain (exact key, gear code, display-name substring)
    pub fn match_method(&self, raw: &str) -> Option<&FishingMethod> {
        self.exact_or_gear_code(raw)
            .or_else(|| self.substring_match(raw))
    }

    fn exact_or_gear_code(&self, raw: &str) -> Option<&FishingMethod> {
        let key = normalize_method_key(raw);
        if let Some(method) = self.get(&key) {
            return Some(method);
        }

        gear_code_to_method(raw).and_then(|key| self.get(key))
    }

    fn substring_match(&self, raw: &str) -> Option<&FishingMethod> {
        let text = raw.trim().to_lowercase();
        let key = normalize_method_key(raw);

        self.methods.iter().find(|m| {
            m.name.to_lowercase().contains(&text)
                || m.name_en.to_lowercase().contains(&text)
                || key.contains(m.key.as_str())
        })
    }
}

/// Look up an EU gear code (case-insensitive)
pub fn gear_code_to_method(code: &str) -> Option<&'static str> {
    let code = code.trim().to_uppercase();
    EU_GEAR_CODES
        .iter()
        .find(|(gear, _)| *gear == code)
        .map(|(_, key)| *key)
}

/// True for the trawl categories that trigger a better-gear suggestion
pub fn is_damaging_trawl(key: &str) -> bool {
    DAMAGING_TRAWLS.contains(&key)
}
