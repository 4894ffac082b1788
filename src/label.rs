//! Label Normalisation
//!
//! Turns raw product evidence into a `ParsedLabel`, the input of the
//! assessment pipeline:
//! - EU fish label text (OCR output, pasted text, manual entry)
//! - Open Food Facts style barcode product objects
//!
//! Extraction is keyword and pattern based. Every field is independently
//! optional and an unparseable label simply yields an empty `ParsedLabel`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// How the product was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ProductionMethod {
    Wild,
    Farmed,
    #[default]
    Unknown,
}

impl ProductionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductionMethod::Wild => "wild",
            ProductionMethod::Farmed => "farmed",
            ProductionMethod::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProductionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive; anything unrecognized is `Unknown`
impl FromStr for ProductionMethod {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "wild" => ProductionMethod::Wild,
            "farmed" => ProductionMethod::Farmed,
            _ => ProductionMethod::Unknown,
        })
    }
}

impl From<String> for ProductionMethod {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(method) => method,
            Err(never) => match never {},
        }
    }
}

/// Normalized evidence extracted from one product
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedLabel {
    /// Free-text species name, resolved later against the catalog
    pub species_raw: Option<String>,
    /// FAO area code, e.g. `"27.8"`
    pub fao_area: Option<String>,
    /// Method key or free text
    pub fishing_method: Option<String>,
    pub production_method: Option<ProductionMethod>,
    pub certifications: Vec<String>,
}

impl ParsedLabel {
    /// Label carrying only a species name
    pub fn for_species(species: impl Into<String>) -> Self {
        Self {
            species_raw: Some(species.into()),
            ..Default::default()
        }
    }
}

static FAO_AREA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:FAO\s*)?(?:zona|area|catch area)?\s*(\d{2}(?:\.\d+)*)")
        .expect("FAO area regex is valid")
});

static ORIGIN_AREA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:FAO\s*)?(\d{2}(?:\.\d+)*)").expect("origin area regex is valid")
});

static SEGMENT_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\n,;]+").expect("segment regex is valid"));

/// Label keyword → method key, first hit wins
const METHOD_KEYWORDS: &[(&str, &str)] = &[
    ("arrastre", "bottom_trawl"),
    ("trawl", "bottom_trawl"),
    ("palangre", "longline_pelagic"),
    ("longline", "longline_pelagic"),
    ("cerco", "purse_seine"),
    ("purse seine", "purse_seine"),
    ("anzuelo", "hook_and_line"),
    ("hook and line", "hook_and_line"),
    ("caña", "pole_and_line"),
    ("pole and line", "pole_and_line"),
    ("nasa", "trap_pot"),
    ("trap", "trap_pot"),
    ("pot", "trap_pot"),
    ("draga", "dredge"),
    ("dredge", "dredge"),
    ("acuicultura", "aquaculture_standard"),
    ("aquaculture", "aquaculture_standard"),
    ("cultivo", "aquaculture_standard"),
];

const FARMED_KEYWORDS: &[&str] = &["acuicultura", "aquaculture", "cultivado", "criado"];
const WILD_KEYWORDS: &[&str] = &["salvaje", "silvestre", "wild", "capturado"];

/// Certification marks looked for on labels
pub const LABEL_CERTIFICATIONS: &[&str] = &["MSC", "ASC", "GlobalGAP", "Friend of Sea", "BRC", "IFS"];

/// Extract signals from EU fish label text
pub fn parse_eu_label(text: &str) -> ParsedLabel {
    let lower = text.to_lowercase();
    let upper = text.to_uppercase();

    let fao_area = FAO_AREA_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    let fishing_method = METHOD_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, key)| key.to_string());

    let production_method = if FARMED_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Some(ProductionMethod::Farmed)
    } else if WILD_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Some(ProductionMethod::Wild)
    } else {
        None
    };

    let certifications = LABEL_CERTIFICATIONS
        .iter()
        .filter(|cert| upper.contains(&cert.to_uppercase()))
        .map(|cert| cert.to_string())
        .collect();

    let species_raw = SEGMENT_SPLIT_RE
        .split(text)
        .map(str::trim)
        .find(|segment| !segment.is_empty())
        .map(str::to_string);

    ParsedLabel {
        species_raw,
        fao_area,
        fishing_method,
        production_method,
        certifications,
    }
}

/// Map an Open Food Facts product object to a label
///
/// Species text comes from `species`, `product_name` or `product_name_es`
/// (first non-empty); the FAO area from `origin` or `origins`.
pub fn parse_barcode_product(product: &Value) -> ParsedLabel {
    let field = |name: &str| {
        product
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };

    let species_raw = field("species")
        .or_else(|| field("product_name"))
        .or_else(|| field("product_name_es"))
        .map(str::to_string);

    let fao_area = field("origin")
        .or_else(|| field("origins"))
        .and_then(|origin| ORIGIN_AREA_RE.captures(origin))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    ParsedLabel {
        species_raw,
        fao_area,
        ..Default::default()
    }
}
