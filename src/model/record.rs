use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where a record's counters came from.
///
/// Most sources carry a plain label, but the manually-curated spreadsheet
/// provides one attribution string per locale. The variant is resolved
/// explicitly at render time rather than by inspecting the value's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attribution {
    Plain(String),
    Localized(BTreeMap<String, String>),
}

impl Attribution {
    /// Create a plain attribution from a static label.
    #[must_use]
    pub fn plain(label: impl Into<String>) -> Self {
        Self::Plain(label.into())
    }

    /// Resolve the attribution text for a locale.
    ///
    /// A plain attribution applies to every locale; a localized one yields the
    /// empty string for locales it has no entry for.
    #[must_use]
    pub fn for_locale(&self, locale: &str) -> &str {
        match self {
            Self::Plain(text) => text,
            Self::Localized(by_locale) => by_locale.get(locale).map_or("", String::as_str),
        }
    }
}

impl fmt::Display for Attribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(text) => f.write_str(text),
            Self::Localized(by_locale) => {
                // Prefer the English label for diagnostics, fall back to any entry
                let text = by_locale
                    .get("en")
                    .or_else(|| by_locale.values().next())
                    .map_or("", String::as_str);
                f.write_str(text)
            }
        }
    }
}

/// Population-relative density metrics, computed during enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Densities {
    /// Confirmed cases per 100k of population, rounded to two decimals.
    pub confirmed_per_100k: f64,

    /// Deaths per 1000 confirmed cases, rounded to two decimals.
    pub deaths_per_1000_confirmed: f64,

    /// Recovered per 1000 confirmed cases, rounded to a whole number.
    pub recovered_per_1000_confirmed: f64,

    /// Active cases per 100k of population, rounded to two decimals.
    pub active_per_100k: f64,
}

/// Discretized severity of each density metric, each one of
/// 0, 0.2, 0.4, 0.6, 0.8, or 1.0. Map consumers render color intensity
/// directly off these values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityBuckets {
    pub confirmed: f64,
    pub recovered: f64,
    pub deaths: f64,
    pub active: f64,
}

/// One reconciled per-country record.
///
/// `population`, `densities`, and `severity` stay `None` until enrichment, and
/// remain `None` for countries without a usable population figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    /// Canonical country code, the merge key.
    pub code: String,

    /// Country title per locale, taken from the reference table.
    pub titles: BTreeMap<String, String>,

    pub confirmed: u64,
    pub deaths: u64,
    pub recovered: u64,

    /// `max(confirmed - deaths - recovered, 0)`, maintained by the builder and
    /// recomputed whenever the merge raises a counter.
    pub active: u64,

    pub latest_update: Option<String>,
    pub source: Attribution,

    pub population: Option<u64>,
    pub densities: Option<Densities>,
    pub severity: Option<SeverityBuckets>,
}

impl CountryRecord {
    /// `true` when every counter is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.confirmed == 0 && self.deaths == 0 && self.recovered == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_attribution_applies_to_every_locale() {
        let source = Attribution::plain("JHU CSSE");
        assert_eq!(source.for_locale("en"), "JHU CSSE");
        assert_eq!(source.for_locale("ru"), "JHU CSSE");
    }

    #[test]
    fn localized_attribution_resolves_per_locale() {
        let source = Attribution::Localized(BTreeMap::from([
            ("en".to_string(), "Ministry of Health".to_string()),
            ("ru".to_string(), "Минздрав".to_string()),
        ]));

        assert_eq!(source.for_locale("en"), "Ministry of Health");
        assert_eq!(source.for_locale("ru"), "Минздрав");
        assert_eq!(source.for_locale("de"), "");
    }

    #[test]
    fn attribution_serializes_without_a_tag() {
        let plain = serde_json::to_value(Attribution::plain("Worldometer")).unwrap();
        assert_eq!(plain, serde_json::json!("Worldometer"));

        let localized = serde_json::to_value(Attribution::Localized(BTreeMap::from([(
            "en".to_string(),
            "Manual".to_string(),
        )])))
        .unwrap();
        assert_eq!(localized, serde_json::json!({"en": "Manual"}));
    }
}
