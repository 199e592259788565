use crate::identity::Normalizer;
use crate::model::{CountryRecord, MergedDataset};
use crate::sources::{RawCaseRow, RawCount};

/// Log target for the record builder
const LOG_TARGET: &str = "   builder";

/// Permissively coerce a raw count into a number.
///
/// Native integers pass through unchanged. Text is trimmed, thousands-separator
/// commas are stripped, and the remainder is parsed as a non-negative integer;
/// anything empty or unparsable yields 0. Never fails — a source serving
/// garbage in a numeric column must not take the run down.
#[must_use]
pub fn parse_count(raw: &RawCount) -> u64 {
    match raw {
        RawCount::Int(value) => *value,
        RawCount::Text(text) => {
            let cleaned = text.trim().replace(',', "");
            if cleaned.is_empty() {
                return 0;
            }
            cleaned.parse().unwrap_or(0)
        }
    }
}

/// Turns raw source rows into typed, identity-resolved country records.
#[derive(Debug, Clone, Copy)]
pub struct RecordBuilder<'a> {
    normalizer: Normalizer<'a>,
}

impl<'a> RecordBuilder<'a> {
    #[must_use]
    pub const fn new(normalizer: Normalizer<'a>) -> Self {
        Self { normalizer }
    }

    #[must_use]
    pub const fn normalizer(&self) -> &Normalizer<'a> {
        &self.normalizer
    }

    /// Build a canonical record from a raw row, or reject it if the name does
    /// not resolve to a known country.
    ///
    /// Rejection is expected and non-fatal; the unmatched name is logged with
    /// its originating source and the row is discarded.
    #[must_use]
    pub fn build(&self, row: &RawCaseRow) -> Option<CountryRecord> {
        let Some(code) = self.normalizer.normalize(&row.name) else {
            if !row.name.is_empty() {
                log::info!(target: LOG_TARGET, "'{}' from {} not found in the country registry", row.name, row.source);
            }
            return None;
        };

        let confirmed = parse_count(&row.confirmed);
        let deaths = parse_count(&row.deaths);
        let recovered = parse_count(&row.recovered);

        Some(CountryRecord {
            code: code.to_string(),
            titles: self
                .normalizer
                .registry_titles(code)
                .cloned()
                .unwrap_or_default(),
            confirmed,
            deaths,
            recovered,
            active: confirmed.saturating_sub(deaths.saturating_add(recovered)),
            latest_update: row.latest_update.clone(),
            source: row.source.clone(),
            population: None,
            densities: None,
            severity: None,
        })
    }

    /// Build one source's record set: a per-country map with unresolvable rows
    /// dropped. Later rows for the same code win within a single source.
    #[must_use]
    pub fn build_set(&self, rows: impl IntoIterator<Item = RawCaseRow>) -> MergedDataset {
        let mut set = MergedDataset::new();
        for row in rows {
            if let Some(record) = self.build(&row) {
                let _ = set.insert(record.code.clone(), record);
            }
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{AliasTable, CountryRegistry};
    use crate::model::Attribution;
    use std::collections::BTreeMap;

    fn registry() -> CountryRegistry {
        let mut registry = CountryRegistry::default();
        registry.insert(
            "USA",
            "United States of America",
            BTreeMap::from([("en".to_string(), "United States of America".to_string())]),
        );
        registry
    }

    fn row(name: &str, confirmed: RawCount, deaths: RawCount, recovered: RawCount) -> RawCaseRow {
        RawCaseRow {
            name: name.to_string(),
            confirmed,
            deaths,
            recovered,
            latest_update: Some("2020/04/01, 12:00:00".to_string()),
            source: Attribution::plain("JHU CSSE"),
        }
    }

    #[test]
    fn parse_count_is_permissive() {
        assert_eq!(parse_count(&RawCount::from("1,234")), 1234);
        assert_eq!(parse_count(&RawCount::from("  42 ")), 42);
        assert_eq!(parse_count(&RawCount::from("")), 0);
        assert_eq!(parse_count(&RawCount::from("abc")), 0);
        assert_eq!(parse_count(&RawCount::from("-5")), 0);
        assert_eq!(parse_count(&RawCount::from(7u64)), 7);
    }

    #[test]
    fn builds_a_record_through_the_alias_table() {
        let aliases = AliasTable::builtin();
        let registry = registry();
        let builder = RecordBuilder::new(Normalizer::new(&aliases, &registry));

        let record = builder
            .build(&row("US", RawCount::from(10u64), RawCount::from(2u64), RawCount::from(3u64)))
            .unwrap();

        assert_eq!(record.code, "USA");
        assert_eq!(record.titles.get("en").unwrap(), "United States of America");
        assert_eq!(record.confirmed, 10);
        assert_eq!(record.active, 5);
        assert!(record.population.is_none());
        assert!(record.densities.is_none());
    }

    #[test]
    fn active_is_clamped_at_zero() {
        let aliases = AliasTable::builtin();
        let registry = registry();
        let builder = RecordBuilder::new(Normalizer::new(&aliases, &registry));

        // inconsistent source totals must never produce a negative active figure
        let record = builder
            .build(&row("US", RawCount::from(2u64), RawCount::from(2u64), RawCount::from(3u64)))
            .unwrap();

        assert_eq!(record.active, 0);
    }

    #[test]
    fn unrecognized_names_are_rejected() {
        let aliases = AliasTable::builtin();
        let registry = registry();
        let builder = RecordBuilder::new(Normalizer::new(&aliases, &registry));

        assert!(
            builder
                .build(&row("Atlantis", RawCount::from(1u64), RawCount::from(0u64), RawCount::from(0u64)))
                .is_none()
        );
    }

    #[test]
    fn build_set_keys_by_code() {
        let aliases = AliasTable::builtin();
        let registry = registry();
        let builder = RecordBuilder::new(Normalizer::new(&aliases, &registry));

        let set = builder.build_set(vec![
            row("US", RawCount::from(5u64), RawCount::from(0u64), RawCount::from(0u64)),
            row("Nowhere", RawCount::from(9u64), RawCount::from(0u64), RawCount::from(0u64)),
        ]);

        assert_eq!(set.len(), 1);
        assert_eq!(set.get("USA").unwrap().confirmed, 5);
    }
}
