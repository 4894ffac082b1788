//! SIGNAL 1: IUCN CONSERVATION STATUS (BASE SCORE)
//!
//! Maps the IUCN Red List category of a species to the base of its
//! sustainability score. Every other signal is a signed modifier on top of it.
//!
//! | Status | Base |
//! |--------|------|
//! | LC     | 50   |
//! | NT     | 40   |
//! | VU     | 25   |
//! | EN     | 10   |
//! | CR, EX | 0    |
//! | DD, NE | 30   |
//!
//! A missing status scores like DD/NE: moderate risk, not an extreme.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Base score used when no status is known
pub const UNKNOWN_STATUS_BASE: i32 = 30;

/// IUCN Red List category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IucnStatus {
    /// Least Concern
    Lc,
    /// Near Threatened
    Nt,
    /// Vulnerable
    Vu,
    /// Endangered
    En,
    /// Critically Endangered
    Cr,
    /// Extinct
    Ex,
    /// Data Deficient
    Dd,
    /// Not Evaluated
    Ne,
}

impl IucnStatus {
    pub const ALL: [IucnStatus; 8] = [
        IucnStatus::Lc,
        IucnStatus::Nt,
        IucnStatus::Vu,
        IucnStatus::En,
        IucnStatus::Cr,
        IucnStatus::Ex,
        IucnStatus::Dd,
        IucnStatus::Ne,
    ];

    /// Two-letter Red List code
    pub fn code(&self) -> &'static str {
        match self {
            IucnStatus::Lc => "LC",
            IucnStatus::Nt => "NT",
            IucnStatus::Vu => "VU",
            IucnStatus::En => "EN",
            IucnStatus::Cr => "CR",
            IucnStatus::Ex => "EX",
            IucnStatus::Dd => "DD",
            IucnStatus::Ne => "NE",
        }
    }

    /// Base score contribution of this status
    pub fn base_score(&self) -> i32 {
        match self {
            IucnStatus::Lc => 50,
            IucnStatus::Nt => 40,
            IucnStatus::Vu => 25,
            IucnStatus::En => 10,
            IucnStatus::Cr | IucnStatus::Ex => 0,
            IucnStatus::Dd | IucnStatus::Ne => UNKNOWN_STATUS_BASE,
        }
    }

    /// Parse a status code leniently (trimmed, case-insensitive)
    ///
    /// Returns `None` for blank or unrecognized input.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl fmt::Display for IucnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for IucnStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        IucnStatus::ALL
            .into_iter()
            .find(|status| status.code() == code)
            .ok_or_else(|| format!("unknown IUCN status '{}'", s.trim()))
    }
}

/// Serde helper for request fields: blank or unrecognized codes become `None`
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<IucnStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(IucnStatus::parse))
}

/// A status as a caller supplied it
///
/// Text that is not a Red List code is kept rather than dropped: it scores
/// like a missing status but still counts as a supplied signal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IucnInput {
    Known(IucnStatus),
    Unrecognized(String),
}

impl IucnInput {
    pub fn status(&self) -> Option<IucnStatus> {
        match self {
            IucnInput::Known(status) => Some(*status),
            IucnInput::Unrecognized(_) => None,
        }
    }

    /// Non-blank, whether or not it was recognized
    pub fn is_supplied(&self) -> bool {
        match self {
            IucnInput::Known(_) => true,
            IucnInput::Unrecognized(raw) => !raw.trim().is_empty(),
        }
    }
}

impl From<IucnStatus> for IucnInput {
    fn from(status: IucnStatus) -> Self {
        IucnInput::Known(status)
    }
}

impl From<String> for IucnInput {
    fn from(raw: String) -> Self {
        match IucnStatus::parse(&raw) {
            Some(status) => IucnInput::Known(status),
            None => IucnInput::Unrecognized(raw),
        }
    }
}

impl From<IucnInput> for String {
    fn from(input: IucnInput) -> Self {
        match input {
            IucnInput::Known(status) => status.code().to_string(),
            IucnInput::Unrecognized(raw) => raw,
        }
    }
}

/// Base score for an optional status
pub fn iucn_base(status: Option<IucnStatus>) -> i32 {
    status.map_or(UNKNOWN_STATUS_BASE, |s| s.base_score())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_scores() {
        assert_eq!(iucn_base(Some(IucnStatus::Lc)), 50);
        assert_eq!(iucn_base(Some(IucnStatus::Nt)), 40);
        assert_eq!(iucn_base(Some(IucnStatus::Vu)), 25);
        assert_eq!(iucn_base(Some(IucnStatus::En)), 10);
        assert_eq!(iucn_base(Some(IucnStatus::Cr)), 0);
        assert_eq!(iucn_base(Some(IucnStatus::Ex)), 0);
        assert_eq!(iucn_base(Some(IucnStatus::Dd)), 30);
        assert_eq!(iucn_base(Some(IucnStatus::Ne)), 30);
    }

    #[test]
    fn test_missing_status_defaults_to_moderate() {
        assert_eq!(iucn_base(None), UNKNOWN_STATUS_BASE);
        assert_eq!(iucn_base(None), 30);
    }

    #[test]
    fn test_parse() {
        assert_eq!(IucnStatus::parse("lc"), Some(IucnStatus::Lc));
        assert_eq!(IucnStatus::parse(" EN "), Some(IucnStatus::En));
        assert_eq!(IucnStatus::parse("Endangered"), None);
        assert_eq!(IucnStatus::parse(""), None);
    }

    #[test]
    fn test_serde_uses_red_list_codes() {
        let json = serde_json::to_string(&IucnStatus::Cr).unwrap();
        assert_eq!(json, "\"CR\"");
        let parsed: IucnStatus = serde_json::from_str("\"NT\"").unwrap();
        assert_eq!(parsed, IucnStatus::Nt);
    }

    #[test]
    fn test_lenient_field() {
        #[derive(Deserialize)]
        struct Request {
            #[serde(default, deserialize_with = "deserialize_lenient")]
            status: Option<IucnStatus>,
        }

        let parse = |json: &str| serde_json::from_str::<Request>(json).unwrap().status;
        assert_eq!(parse(r#"{"status": "vu"}"#), Some(IucnStatus::Vu));
        assert_eq!(parse(r#"{"status": "Vulnerable"}"#), None);
        assert_eq!(parse(r#"{"status": null}"#), None);
        assert_eq!(parse(r#"{}"#), None);
    }

    #[test]
    fn test_input_keeps_unrecognized_text() {
        let parse = |json: &str| serde_json::from_str::<IucnInput>(json).unwrap();

        let known = parse(r#""vu""#);
        assert_eq!(known, IucnInput::Known(IucnStatus::Vu));
        assert_eq!(known.status(), Some(IucnStatus::Vu));
        assert!(known.is_supplied());

        let free_text = parse(r#""Vulnerable""#);
        assert_eq!(free_text.status(), None);
        assert!(free_text.is_supplied());
        assert_eq!(iucn_base(free_text.status()), UNKNOWN_STATUS_BASE);

        assert!(!parse(r#""  ""#).is_supplied());
        assert_eq!(serde_json::to_string(&known).unwrap(), "\"VU\"");
    }
}
