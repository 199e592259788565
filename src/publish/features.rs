use crate::geo::GeometryTable;
use crate::model::{CountryRecord, MergedDataset};
use serde::Serialize;

/// Log target for feature rendering
const LOG_TARGET: &str = "  features";

/// One country's entry in a published locale dataset.
#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: String,
    pub properties: Properties,
    pub geometry: serde_json::Value,
}

/// The property bag map consumers render from. Field names are the wire
/// format and must not change: `cd`/`dd`/`rd`/`ad` are the four densities,
/// `co`/`do`/`ro`/`ao` their severity buckets.
#[derive(Debug, Clone, Serialize)]
pub struct Properties {
    pub name: String,
    pub latest_update: Option<String>,
    pub confirmed: u64,
    pub deaths: u64,
    pub recovered: u64,
    pub active: u64,
    pub population: u64,
    pub source: String,

    #[serde(rename = "cd")]
    pub confirmed_density: f64,
    #[serde(rename = "dd")]
    pub deaths_density: f64,
    #[serde(rename = "rd")]
    pub recovered_density: f64,
    #[serde(rename = "ad")]
    pub active_density: f64,

    #[serde(rename = "co")]
    pub confirmed_severity: f64,
    #[serde(rename = "do")]
    pub deaths_severity: f64,
    #[serde(rename = "ro")]
    pub recovered_severity: f64,
    #[serde(rename = "ao")]
    pub active_severity: f64,
}

/// Render the merged dataset into one locale's feature array.
///
/// A record is included only if it reports any burden or carries an update
/// timestamp; silent all-zero records would just paint the map gray. Records
/// without an outline or without a title in the requested locale are logged
/// and skipped.
#[must_use]
pub fn build_features(dataset: &MergedDataset, geometries: &GeometryTable, locale: &str) -> Vec<Feature> {
    let mut features = Vec::with_capacity(dataset.len());

    for (code, record) in dataset {
        let Some(country_geometry) = geometries.get(code) else {
            log::error!(target: LOG_TARGET, "! Country GeoJSON not found: {code}");
            continue;
        };

        let Some(name) = record.titles.get(locale) else {
            log::info!(target: LOG_TARGET, "- Translation not found: {code}");
            continue;
        };

        if !worth_publishing(record) {
            continue;
        }

        features.push(Feature {
            kind: "Feature",
            id: code.clone(),
            properties: properties(record, name, locale),
            geometry: country_geometry.geometry.clone(),
        });
    }

    features
}

const fn worth_publishing(record: &CountryRecord) -> bool {
    !record.is_empty() || record.latest_update.is_some()
}

fn properties(record: &CountryRecord, name: &str, locale: &str) -> Properties {
    let densities = record.densities.as_ref();
    let severity = record.severity.as_ref();

    Properties {
        name: name.to_string(),
        latest_update: record.latest_update.clone(),
        confirmed: record.confirmed,
        deaths: record.deaths,
        recovered: record.recovered,
        active: record.active,
        population: record.population.unwrap_or(0),
        source: record.source.for_locale(locale).to_string(),
        confirmed_density: densities.map_or(0.0, |d| d.confirmed_per_100k),
        deaths_density: densities.map_or(0.0, |d| d.deaths_per_1000_confirmed),
        recovered_density: densities.map_or(0.0, |d| d.recovered_per_1000_confirmed),
        active_density: densities.map_or(0.0, |d| d.active_per_100k),
        confirmed_severity: severity.map_or(0.0, |s| s.confirmed),
        deaths_severity: severity.map_or(0.0, |s| s.deaths),
        recovered_severity: severity.map_or(0.0, |s| s.recovered),
        active_severity: severity.map_or(0.0, |s| s.active),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::CountryGeometry;
    use crate::model::{Attribution, Densities, SeverityBuckets};
    use std::collections::{BTreeMap, HashMap};

    fn record(code: &str, confirmed: u64) -> CountryRecord {
        CountryRecord {
            code: code.to_string(),
            titles: BTreeMap::from([
                ("en".to_string(), format!("{code} en")),
                ("ru".to_string(), format!("{code} ru")),
            ]),
            confirmed,
            deaths: 0,
            recovered: 0,
            active: confirmed,
            latest_update: None,
            source: Attribution::plain("JHU CSSE"),
            population: None,
            densities: None,
            severity: None,
        }
    }

    fn geometries(codes: &[&str]) -> GeometryTable {
        codes
            .iter()
            .map(|code| {
                (
                    (*code).to_string(),
                    CountryGeometry {
                        title: (*code).to_string(),
                        geometry: serde_json::json!({"type": "Polygon", "coordinates": []}),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn renders_the_wire_format() {
        let mut rec = record("FRA", 120);
        rec.latest_update = Some("2020/04/01, 12:00:00".to_string());
        rec.population = Some(65_273);
        rec.densities = Some(Densities {
            confirmed_per_100k: 0.18,
            deaths_per_1000_confirmed: 0.0,
            recovered_per_1000_confirmed: 0.0,
            active_per_100k: 0.18,
        });
        rec.severity = Some(SeverityBuckets {
            confirmed: 0.2,
            recovered: 0.0,
            deaths: 0.0,
            active: 0.2,
        });

        let dataset = MergedDataset::from([("FRA".to_string(), rec)]);
        let features = build_features(&dataset, &geometries(&["FRA"]), "en");
        assert_eq!(features.len(), 1);

        let value = serde_json::to_value(&features[0]).unwrap();
        assert_eq!(value["type"], "Feature");
        assert_eq!(value["id"], "FRA");
        assert_eq!(value["properties"]["name"], "FRA en");
        assert_eq!(value["properties"]["source"], "JHU CSSE");
        assert_eq!(value["properties"]["cd"], 0.18);
        assert_eq!(value["properties"]["co"], 0.2);
        // the deaths bucket keeps its reserved-word wire name
        assert_eq!(value["properties"]["do"], 0.0);
        assert_eq!(value["properties"]["population"], 65_273);
    }

    #[test]
    fn all_zero_records_without_updates_are_excluded() {
        let dataset = MergedDataset::from([("FRA".to_string(), record("FRA", 0))]);
        assert!(build_features(&dataset, &geometries(&["FRA"]), "en").is_empty());

        // but a zero record with a timestamp is still published
        let mut rec = record("FRA", 0);
        rec.latest_update = Some("2020/04/01, 12:00:00".to_string());
        let dataset = MergedDataset::from([("FRA".to_string(), rec)]);
        assert_eq!(build_features(&dataset, &geometries(&["FRA"]), "en").len(), 1);
    }

    #[test]
    fn records_without_geometry_or_title_are_skipped() {
        let dataset = MergedDataset::from([("FRA".to_string(), record("FRA", 5))]);
        assert!(build_features(&dataset, &geometries(&[]), "en").is_empty());
        assert!(build_features(&dataset, &geometries(&["FRA"]), "de").is_empty());
    }

    #[test]
    fn attribution_is_resolved_per_locale() {
        let mut rec = record("FRA", 5);
        rec.source = Attribution::Localized(BTreeMap::from([
            ("en".to_string(), "Manual (en)".to_string()),
            ("ru".to_string(), "Manual (ru)".to_string()),
        ]));
        let dataset = MergedDataset::from([("FRA".to_string(), rec)]);

        let en = build_features(&dataset, &geometries(&["FRA"]), "en");
        let ru = build_features(&dataset, &geometries(&["FRA"]), "ru");
        assert_eq!(en[0].properties.source, "Manual (en)");
        assert_eq!(ru[0].properties.source, "Manual (ru)");
    }
}
