//! Explanation text for score breakdowns
//!
//! Band labels and colours for display, plus one human-readable line per
//! signal so a user can see where the score came from.

use crate::scorer::{Band, ScoreBreakdown};
use crate::utils::Locale;

impl Band {
    /// User-facing band label
    pub fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Band::Best, Locale::Es) => "Mejor opción",
            (Band::Good, Locale::Es) => "Buena opción",
            (Band::Think, Locale::Es) => "Piénsatelo",
            (Band::Avoid, Locale::Es) => "Evitar",
            (Band::Best, Locale::En) => "Best choice",
            (Band::Good, Locale::En) => "Good choice",
            (Band::Think, Locale::En) => "Think twice",
            (Band::Avoid, Locale::En) => "Avoid",
        }
    }

    /// Display colour (hex)
    pub fn color(&self) -> &'static str {
        match self {
            Band::Best => "#106c72",
            Band::Good => "#80b8a2",
            Band::Think => "#b97f5f",
            Band::Avoid => "#ef4444",
        }
    }
}

/// One line per signal, then a note when the species range clamped the score
pub fn explain(breakdown: &ScoreBreakdown, locale: Locale) -> Vec<String> {
    let (iucn, method, area, origin) = match locale {
        Locale::Es => (
            "Base por estado de conservación",
            "Método de pesca",
            "Zona de captura",
            "Certificaciones y origen",
        ),
        Locale::En => (
            "Conservation status base",
            "Fishing method",
            "Catch area",
            "Certifications and origin",
        ),
    };

    let mut lines = vec![
        format!("{}: {}", iucn, breakdown.iucn_base),
        format!("{}: {:+}", method, breakdown.method_modifier),
        format!("{}: {:+}", area, breakdown.area_modifier),
        format!("{}: {:+}", origin, breakdown.origin_modifier),
    ];

    if breakdown.final_score != breakdown.raw_score {
        let note = match locale {
            Locale::Es => "Puntuación ajustada al rango de la especie",
            Locale::En => "Score limited to the species range",
        };
        lines.push(format!(
            "{}: {} → {}",
            note, breakdown.raw_score, breakdown.final_score
        ));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::Confidence;

    fn breakdown(raw: i32, final_score: i32) -> ScoreBreakdown {
        ScoreBreakdown {
            iucn_base: 50,
            method_modifier: -20,
            area_modifier: -15,
            origin_modifier: 0,
            raw_score: raw,
            final_score,
            band: Band::from_score(final_score),
            confidence: Confidence::High,
        }
    }

    #[test]
    fn test_band_labels() {
        assert_eq!(Band::Best.label(Locale::Es), "Mejor opción");
        assert_eq!(Band::Think.label(Locale::En), "Think twice");
        assert_eq!(Band::Avoid.color(), "#ef4444");
        assert_eq!(Band::Good.color(), "#80b8a2");
    }

    #[test]
    fn test_explain_lines() {
        let lines = explain(&breakdown(15, 15), Locale::En);
        assert_eq!(
            lines,
            vec![
                "Conservation status base: 50",
                "Fishing method: -20",
                "Catch area: -15",
                "Certifications and origin: +0",
            ]
        );
    }

    #[test]
    fn test_explain_clamp_note() {
        let lines = explain(&breakdown(15, 20), Locale::Es);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[4], "Puntuación ajustada al rango de la especie: 15 → 20");
    }
}
